//! Composing the two page layers: the background, stretched to fill the page,
//! and the text run, centred on the layout anchor.
//!
//! Placement is split from drawing. [plan_run] is a pure function of glyph
//! widths and geometry, so the centring rules can be checked without any
//! image I/O:
//!
//! ```
//! use glyph_plate::compose::plan_run;
//! use glyph_plate::geometry::LayoutGeometry;
//! use glyph_plate::Px;
//!
//! let geometry = LayoutGeometry::default();
//! let run = plan_run(&[Px(30.0), Px(10.0), Px(20.0)], &geometry).expect("non-empty run");
//! assert_eq!(run.total_width, Px(60.0));
//! assert_eq!(run.placements.len(), 3);
//! ```

use crate::geometry::LayoutGeometry;
use crate::glyph::{load_and_measure_all, GlyphImage};
use crate::layer::{Layer, PixelRect};
use crate::resolver::GlyphResolver;
use crate::source::ResourceSource;
use crate::token::{glyph_sequence, CharToken};
use crate::units::Px;
use crate::RenderError;

/// Where every glyph of a run goes on the text layer
#[derive(Debug, Clone, PartialEq)]
pub struct RunLayout {
    /// Sum of every glyph width; the same value used for centring
    pub total_width: Px,
    /// Left edge of the first glyph
    pub start_x: Px,
    /// Top edge shared by every glyph
    pub top: Px,
    /// One rectangle per glyph, in sequence order
    pub placements: Vec<PixelRect>,
}

/// Lay out a run of glyphs with the given widths left to right, centred
/// horizontally on the anchor and with every glyph vertically centred on the
/// anchor's baseline. Fails with [RenderError::EmptyInput] for an empty run.
pub fn plan_run(widths: &[Px], geometry: &LayoutGeometry) -> Result<RunLayout, RenderError> {
    if widths.is_empty() {
        return Err(RenderError::EmptyInput);
    }

    let (anchor_x, anchor_y) = geometry.anchor_px();
    let height = geometry.glyph_height_px();

    let total_width: Px = widths.iter().copied().sum();
    let start_x = anchor_x - total_width / 2.0;
    let top = anchor_y - height / 2.0;

    let mut x = start_x;
    let placements = widths
        .iter()
        .map(|&width| {
            let rect = PixelRect {
                x,
                y: top,
                width,
                height,
            };
            x += width;
            rect
        })
        .collect();

    Ok(RunLayout {
        total_width,
        start_x,
        top,
        placements,
    })
}

/// A composited text layer and the layout it was drawn with
#[derive(Debug)]
pub struct TextLayer {
    pub layer: Layer,
    pub run: RunLayout,
    /// The locators that were drawn, in placement order
    pub locators: Vec<String>,
}

/// Resolve, fetch, measure and draw `tokens` onto a fresh transparent layer
/// the size of the page. Every glyph is fetched anew; nothing is cached
/// between calls.
pub async fn compose_text_layer<S: ResourceSource>(
    tokens: &[CharToken],
    geometry: &LayoutGeometry,
    resolver: &GlyphResolver,
    source: &S,
) -> Result<TextLayer, RenderError> {
    let glyphs = glyph_sequence(tokens);
    if glyphs.is_empty() {
        return Err(RenderError::EmptyInput);
    }

    let locators = resolver.resolve_all(&glyphs);
    let measured = load_and_measure_all(source, &locators, geometry).await?;

    let widths: Vec<Px> = measured.iter().map(|glyph| glyph.width).collect();
    let run = plan_run(&widths, geometry)?;

    let (width, height) = geometry.page_size_px();
    let mut layer = Layer::new(width, height)?;
    for (glyph, rect) in measured.iter().zip(run.placements.iter()) {
        layer.draw(&glyph.image, *rect)?;
    }

    log::debug!(
        "composed {} glyphs, run width {} starting at {}",
        measured.len(),
        run.total_width,
        run.start_x
    );

    Ok(TextLayer {
        layer,
        run,
        locators,
    })
}

/// Fetch the background image and stretch it over a layer of exactly
/// `width` × `height` pixels. The image's aspect ratio is not preserved.
pub async fn compose_background_layer<S: ResourceSource>(
    locator: &str,
    width: u32,
    height: u32,
    source: &S,
) -> Result<Layer, RenderError> {
    let data = source.fetch(locator).await?;
    let image = GlyphImage::decode(locator, &data)?;

    let mut layer = Layer::new(width, height)?;
    layer.draw(
        &image,
        PixelRect {
            x: Px(0.0),
            y: Px(0.0),
            width: Px(width as f32),
            height: Px(height as f32),
        },
    )?;
    Ok(layer)
}
