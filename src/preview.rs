//! Live preview of the glyph run.
//!
//! Every input change sanitizes the text and rebuilds the preview from
//! scratch. Building the list of glyphs to show is a pure function; writing
//! it somewhere visible is left to a [PreviewSurface].

use crate::resolver::GlyphResolver;
use crate::token::{glyph_sequence, sanitize, tokenize, Glyph};

/// One image in the preview strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewGlyph {
    pub glyph: Glyph,
    pub locator: String,
}

/// The glyphs to show for already-sanitized `text`, in reading order
pub fn preview_glyphs(text: &str, resolver: &GlyphResolver) -> Vec<PreviewGlyph> {
    glyph_sequence(&tokenize(text))
        .into_iter()
        .map(|glyph| PreviewGlyph {
            glyph,
            locator: resolver.resolve(glyph),
        })
        .collect()
}

/// Somewhere a preview can be shown. Implementations replace whatever they
/// showed before with `glyphs`.
pub trait PreviewSurface {
    fn replace(&mut self, text: &str, glyphs: &[PreviewGlyph]);
}

/// Owns the current input and keeps a surface in sync with it
pub struct PreviewController<P> {
    resolver: GlyphResolver,
    surface: P,
    text: String,
    glyphs: Vec<PreviewGlyph>,
}

impl<P: PreviewSurface> PreviewController<P> {
    pub fn new(resolver: GlyphResolver, surface: P) -> PreviewController<P> {
        PreviewController {
            resolver,
            surface,
            text: String::new(),
            glyphs: Vec::new(),
        }
    }

    /// Handle an input change: sanitize, rebuild and redraw. Returns the
    /// sanitized text, which callers should write back into the input.
    pub fn on_input(&mut self, raw: &str) -> &str {
        self.text = sanitize(raw);
        self.glyphs = preview_glyphs(&self.text, &self.resolver);
        self.surface.replace(&self.text, &self.glyphs);
        &self.text
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn glyphs(&self) -> &[PreviewGlyph] {
        &self.glyphs
    }

    /// Export only makes sense once there is at least one glyph to place
    pub fn can_export(&self) -> bool {
        !self.glyphs.is_empty()
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }
}

/// Writes each preview as one line: the sanitized text followed by the glyph
/// locators
pub struct TextSurface<W> {
    out: W,
}

impl<W: std::io::Write> TextSurface<W> {
    pub fn new(out: W) -> TextSurface<W> {
        TextSurface { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: std::io::Write> PreviewSurface for TextSurface<W> {
    fn replace(&mut self, text: &str, glyphs: &[PreviewGlyph]) {
        let locators: Vec<&str> = glyphs.iter().map(|g| g.locator.as_str()).collect();
        if let Err(e) = writeln!(self.out, "{text:?}: {}", locators.join(" ")) {
            log::warn!("failed to write preview: {e}");
        }
    }
}
