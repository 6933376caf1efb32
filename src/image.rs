use crate::layer::Layer;
use crate::refs::{ObjectReferences, RefType};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};

/// A raster image ready to be embedded in a PDF: packed 8-bit RGB samples
/// plus an optional 8-bit alpha channel that becomes the image's soft mask
pub struct Image {
    pub width: u32,
    pub height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

struct EncodeOutput {
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    /// Capture a layer. Fully opaque layers are embedded without a soft mask
    pub fn from_layer(layer: &Layer) -> Image {
        let (rgb, alpha) = layer.to_rgb_and_alpha();
        let alpha = layer.has_transparency().then_some(alpha);
        Image {
            width: layer.width(),
            height: layer.height(),
            rgb,
            alpha,
        }
    }

    pub fn has_mask(&self) -> bool {
        self.alpha.is_some()
    }

    fn encode(&self) -> EncodeOutput {
        let level = CompressionLevel::DefaultLevel as u8;
        let mask = self
            .alpha
            .as_ref()
            .map(|alphas| compress_to_vec_zlib(alphas, level));
        let bytes = compress_to_vec_zlib(&self.rgb, level);
        EncodeOutput { bytes, mask }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(image_index));
        let encoded = self.encode();

        let mask_id = encoded
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));

        let mut image = writer.image_xobject(id, encoded.bytes.as_slice());
        image.filter(Filter::FlateDecode);
        image.width(self.width as i32);
        image.height(self.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        // add a transparency mask if we have one
        if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask.as_ref()) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}
