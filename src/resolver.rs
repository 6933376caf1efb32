use crate::token::Glyph;

/// Where the reference glyph set is published
pub const DEFAULT_GLYPH_BASE: &str = "https://tiboprive.github.io/SKC/";

/// Maps glyphs to the locators of their pre-rendered images:
/// `{base}/{CHAR}.svg` for letters, `{base}/WS.svg` for a word space and
/// `{base}/LS.svg` for an inter-letter space.
///
/// The base may be a URL or a directory on disk; a separating `/` is added
/// if the base does not already end in one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphResolver {
    base: String,
    extension: String,
}

impl Default for GlyphResolver {
    fn default() -> Self {
        GlyphResolver::new(DEFAULT_GLYPH_BASE)
    }
}

impl GlyphResolver {
    pub fn new<S: ToString>(base: S) -> GlyphResolver {
        let mut base = base.to_string();
        if !base.is_empty() && !base.ends_with('/') {
            base.push('/');
        }
        GlyphResolver {
            base,
            extension: "svg".to_string(),
        }
    }

    /// Use a different file extension for every glyph, e.g. `png`
    pub fn with_extension<S: ToString>(mut self, extension: S) -> GlyphResolver {
        self.extension = extension.to_string();
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn resolve(&self, glyph: Glyph) -> String {
        let stem = match glyph {
            Glyph::Letter(ch) => ch.to_string(),
            Glyph::WordSpace => "WS".to_string(),
            Glyph::LetterSpace => "LS".to_string(),
        };
        format!("{}{}.{}", self.base, stem, self.extension)
    }

    pub fn resolve_all(&self, glyphs: &[Glyph]) -> Vec<String> {
        glyphs.iter().map(|glyph| self.resolve(*glyph)).collect()
    }
}
