//! Decoding glyph images and measuring their on-canvas width.

use crate::geometry::LayoutGeometry;
use crate::source::{fetch_all, ResourceSource};
use crate::units::*;
use crate::RenderError;
use image::RgbaImage;
use std::sync::Arc;
use usvg::Tree;

/// A decoded image, either vector markup or a bitmap
#[derive(Clone)]
pub enum ImageKind {
    Svg(Arc<Tree>),
    Raster(Arc<RgbaImage>),
}

/// A decoded image together with its intrinsic size
#[derive(Clone)]
pub struct GlyphImage {
    pub kind: ImageKind,
    pub width: f32,
    pub height: f32,
}

impl std::fmt::Debug for GlyphImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            ImageKind::Svg(_) => "svg",
            ImageKind::Raster(_) => "raster",
        };
        f.debug_struct("GlyphImage")
            .field("kind", &kind)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Whether the bytes look like XML / SVG markup rather than a bitmap
fn is_markup(data: &[u8]) -> bool {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    data.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'<')
}

impl GlyphImage {
    /// Decode raw bytes. SVG markup goes through usvg, anything else through
    /// the image crate. `locator` is only used for error reporting.
    pub fn decode(locator: &str, data: &[u8]) -> Result<GlyphImage, RenderError> {
        let image = if is_markup(data) {
            Self::decode_svg(locator, data)?
        } else {
            Self::decode_raster(locator, data)?
        };

        if !(image.width > 0.0 && image.height > 0.0) {
            return Err(RenderError::decode(
                locator,
                format!("image has no area ({}x{})", image.width, image.height),
            ));
        }

        Ok(image)
    }

    fn decode_svg(locator: &str, data: &[u8]) -> Result<GlyphImage, RenderError> {
        let opts = usvg::Options {
            ..Default::default()
        };
        let tree = Tree::from_data(data, &opts).map_err(|e| RenderError::decode(locator, e))?;
        let size = tree.size();

        Ok(GlyphImage {
            width: size.width(),
            height: size.height(),
            kind: ImageKind::Svg(Arc::new(tree)),
        })
    }

    fn decode_raster(locator: &str, data: &[u8]) -> Result<GlyphImage, RenderError> {
        let image = image::load_from_memory(data)
            .map_err(|e| RenderError::decode(locator, e))?
            .to_rgba8();

        Ok(GlyphImage {
            width: image.width() as f32,
            height: image.height() as f32,
            kind: ImageKind::Raster(Arc::new(image)),
        })
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }
}

/// The on-canvas width of an image drawn at `target_height`:
/// `(intrinsic width / intrinsic height) * target height * pixel ratio`
pub fn scaled_width(
    intrinsic_width: f32,
    intrinsic_height: f32,
    target_height: Mm,
    px_per_mm: f32,
) -> Px {
    Px(intrinsic_width / intrinsic_height * *target_height * px_per_mm)
}

/// A glyph ready to be placed: its image and the width it occupies on the
/// text layer
#[derive(Debug, Clone)]
pub struct MeasuredGlyph {
    pub locator: String,
    pub image: GlyphImage,
    pub width: Px,
}

impl MeasuredGlyph {
    pub fn measure(
        locator: &str,
        data: &[u8],
        target_height: Mm,
        px_per_mm: f32,
    ) -> Result<MeasuredGlyph, RenderError> {
        let image = GlyphImage::decode(locator, data)?;
        let width = scaled_width(image.width, image.height, target_height, px_per_mm);
        log::debug!(
            "measured {locator}: {}x{} -> {width}",
            image.width,
            image.height
        );

        Ok(MeasuredGlyph {
            locator: locator.to_string(),
            image,
            width,
        })
    }
}

/// Fetch and measure a single glyph
pub async fn load_and_measure<S: ResourceSource>(
    source: &S,
    locator: &str,
    target_height: Mm,
    px_per_mm: f32,
) -> Result<MeasuredGlyph, RenderError> {
    let data = source.fetch(locator).await?;
    MeasuredGlyph::measure(locator, &data, target_height, px_per_mm)
}

/// Fetch every glyph concurrently, then decode and measure them in sequence
/// order. The returned glyphs are in the same order as `locators`.
pub async fn load_and_measure_all<S: ResourceSource>(
    source: &S,
    locators: &[String],
    geometry: &LayoutGeometry,
) -> Result<Vec<MeasuredGlyph>, RenderError> {
    let bodies = fetch_all(source, locators).await?;
    locators
        .iter()
        .zip(bodies)
        .map(|(locator, data)| {
            MeasuredGlyph::measure(locator, &data, geometry.glyph_height, geometry.px_per_mm)
        })
        .collect()
}
