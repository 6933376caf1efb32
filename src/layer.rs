//! Full-page raster layers.

use crate::glyph::{GlyphImage, ImageKind};
use crate::units::Px;
use crate::RenderError;
use image::RgbaImage;
use tiny_skia::{ColorU8, FilterQuality, IntSize, Pixmap, PixmapPaint, Transform};

/// A placement on a layer, in pixels, with the origin at the top-left
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PixelRect {
    pub x: Px,
    pub y: Px,
    pub width: Px,
    pub height: Px,
}

impl PixelRect {
    pub fn right(&self) -> Px {
        self.x + self.width
    }

    /// The transform that maps an image of intrinsic size `width` × `height`
    /// onto this rectangle, ignoring the image's aspect ratio
    fn stretch(&self, width: f32, height: f32) -> Transform {
        Transform::from_row(
            *self.width / width,
            0.0,
            0.0,
            *self.height / height,
            *self.x,
            *self.y,
        )
    }
}

/// A transparent RGBA raster covering the whole page
pub struct Layer {
    pixmap: Pixmap,
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Layer {
    /// Allocate a fully transparent layer
    pub fn new(width: u32, height: u32) -> Result<Layer, RenderError> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RenderError::ExportUnavailable(format!("cannot allocate a {width}x{height} layer"))
        })?;
        Ok(Layer { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Draw `image` stretched to fill `rect`. Parts outside the layer are
    /// clipped.
    pub fn draw(&mut self, image: &GlyphImage, rect: PixelRect) -> Result<(), RenderError> {
        let transform = rect.stretch(image.width, image.height);
        match &image.kind {
            ImageKind::Svg(tree) => {
                resvg::render(tree, transform, &mut self.pixmap.as_mut());
            }
            ImageKind::Raster(bitmap) => {
                let source = pixmap_from_rgba(bitmap)?;
                let paint = PixmapPaint {
                    quality: FilterQuality::Bicubic,
                    ..Default::default()
                };
                self.pixmap
                    .draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
            }
        }
        Ok(())
    }

    /// Un-premultiplied RGBA value of a single pixel, if it lies on the layer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        // tiny-skia only bounds-checks the flattened index
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    /// Split the layer into packed 8-bit RGB samples and a matching 8-bit
    /// alpha channel, both un-premultiplied and in row-major order
    pub fn to_rgb_and_alpha(&self) -> (Vec<u8>, Vec<u8>) {
        let pixels = self.pixmap.pixels();
        let mut rgb = Vec::with_capacity(pixels.len() * 3);
        let mut alpha = Vec::with_capacity(pixels.len());
        for pixel in pixels {
            let c = pixel.demultiply();
            rgb.extend_from_slice(&[c.red(), c.green(), c.blue()]);
            alpha.push(c.alpha());
        }
        (rgb, alpha)
    }

    /// Whether any pixel of the layer is transparent
    pub fn has_transparency(&self) -> bool {
        self.pixmap.pixels().iter().any(|p| p.alpha() < u8::MAX)
    }
}

fn pixmap_from_rgba(image: &RgbaImage) -> Result<Pixmap, RenderError> {
    let size = IntSize::from_wh(image.width(), image.height()).ok_or_else(|| {
        RenderError::ExportUnavailable("cannot rasterise an empty bitmap".to_string())
    })?;
    let mut pixmap = Pixmap::new(size.width(), size.height()).ok_or_else(|| {
        RenderError::ExportUnavailable(format!(
            "cannot allocate a {}x{} bitmap",
            size.width(),
            size.height()
        ))
    })?;

    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::tests::svg;

    #[test]
    fn new_layers_are_transparent() {
        let layer = Layer::new(4, 2).expect("can allocate");
        assert_eq!((layer.width(), layer.height()), (4, 2));
        assert_eq!(layer.pixel(0, 0), Some([0, 0, 0, 0]));
        assert!(layer.has_transparency());
        assert_eq!(layer.pixel(4, 0), None);
    }

    #[test]
    fn off_layer_pixels_do_not_wrap_to_the_next_row() {
        let image = GlyphImage::decode("dot.svg", svg(1, 1).as_bytes()).expect("valid svg");
        let mut layer = Layer::new(4, 2).expect("can allocate");
        layer
            .draw(
                &image,
                PixelRect {
                    x: Px(0.0),
                    y: Px(1.0),
                    width: Px(1.0),
                    height: Px(1.0),
                },
            )
            .expect("can draw");

        let [_, _, _, alpha] = layer.pixel(0, 1).expect("pixel on layer");
        assert!(alpha > 200);
        assert_eq!(layer.pixel(3, 0), Some([0, 0, 0, 0]));
        assert_eq!(layer.pixel(4, 0), None);
        assert_eq!(layer.pixel(0, 2), None);
        assert_eq!(layer.pixel(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn zero_sized_layer_is_unavailable() {
        assert!(matches!(
            Layer::new(0, 10),
            Err(RenderError::ExportUnavailable(_))
        ));
    }

    #[test]
    fn svg_is_stretched_into_its_rect() {
        let image = GlyphImage::decode("box.svg", svg(10, 10).as_bytes()).expect("valid svg");
        let mut layer = Layer::new(40, 20).expect("can allocate");
        layer
            .draw(
                &image,
                PixelRect {
                    x: Px(10.0),
                    y: Px(5.0),
                    width: Px(20.0),
                    height: Px(10.0),
                },
            )
            .expect("can draw");

        assert_eq!(layer.pixel(20, 10), Some([0, 0, 0, 255]));
        assert_eq!(layer.pixel(2, 2), Some([0, 0, 0, 0]));
        assert_eq!(layer.pixel(35, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn raster_is_stretched_to_fill() {
        let mut bitmap = RgbaImage::new(2, 2);
        for pixel in bitmap.pixels_mut() {
            *pixel = image::Rgba([255, 0, 0, 255]);
        }
        let image = GlyphImage {
            width: 2.0,
            height: 2.0,
            kind: ImageKind::Raster(std::sync::Arc::new(bitmap)),
        };

        let mut layer = Layer::new(8, 4).expect("can allocate");
        layer
            .draw(
                &image,
                PixelRect {
                    x: Px(0.0),
                    y: Px(0.0),
                    width: Px(8.0),
                    height: Px(4.0),
                },
            )
            .expect("can draw");

        let [r, g, b, a] = layer.pixel(4, 2).expect("pixel on layer");
        assert!(r > 250 && g < 5 && b < 5 && a > 250);

        let (rgb, alpha) = layer.to_rgb_and_alpha();
        assert_eq!(rgb.len(), 8 * 4 * 3);
        assert_eq!(alpha.len(), 8 * 4);
        assert!(alpha.iter().all(|a| *a > 250));
    }
}
