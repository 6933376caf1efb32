//! The fixed physical layout of a plate.
//!
//! All lengths are specified in millimetres and converted to raster pixels
//! using a single pixel density. The defaults reproduce the reference plate:
//!
//! ```
//! use glyph_plate::geometry::LayoutGeometry;
//!
//! let geometry = LayoutGeometry::default();
//! geometry.validate().expect("default geometry is valid");
//! assert_eq!(geometry.page_size_px(), (789, 219));
//! ```

use crate::units::*;
use crate::RenderError;
use serde::Deserialize;

/// Page size as (width, height). Pages are always specified width first;
/// the plate is a landscape strip, so width > height for the default.
pub type PageSize = (Mm, Mm);

/// The reference plate: 208.7 × 57.7 mm
pub const PLATE: PageSize = (Mm(208.7), Mm(57.7));

/// Pixel density used for rasterising layers, 96 DPI
pub const DEFAULT_PX_PER_MM: f32 = 96.0 / MM_PER_INCH;

/// Immutable layout configuration handed to every stage of the pipeline
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutGeometry {
    pub page_width: Mm,
    pub page_height: Mm,
    /// Horizontal point the text run is centred on. This is deliberately not
    /// the page centre
    pub anchor_x: Mm,
    /// Vertical point every glyph is centred on
    pub anchor_y: Mm,
    pub glyph_height: Mm,
    pub px_per_mm: f32,
}

impl Default for LayoutGeometry {
    fn default() -> Self {
        LayoutGeometry {
            page_width: PLATE.0,
            page_height: PLATE.1,
            anchor_x: Mm(127.2),
            anchor_y: Mm(28.8),
            glyph_height: Mm(12.0),
            px_per_mm: DEFAULT_PX_PER_MM,
        }
    }
}

impl LayoutGeometry {
    /// Check the geometry invariants: every length is finite and positive,
    /// the anchor lies within the page, and a glyph fits within the page height
    pub fn validate(&self) -> Result<(), RenderError> {
        let lengths = [
            ("page width", self.page_width),
            ("page height", self.page_height),
            ("glyph height", self.glyph_height),
        ];
        for (name, length) in lengths {
            if !length.is_finite() || *length <= 0.0 {
                return Err(RenderError::InvalidGeometry(format!(
                    "{name} must be positive, got {length}"
                )));
            }
        }

        if !self.px_per_mm.is_finite() || self.px_per_mm <= 0.0 {
            return Err(RenderError::InvalidGeometry(format!(
                "pixel ratio must be positive, got {}",
                self.px_per_mm
            )));
        }

        if !(0.0..=*self.page_width).contains(&*self.anchor_x) {
            return Err(RenderError::InvalidGeometry(format!(
                "horizontal anchor {} lies outside the page width {}",
                self.anchor_x, self.page_width
            )));
        }
        if !(0.0..=*self.page_height).contains(&*self.anchor_y) {
            return Err(RenderError::InvalidGeometry(format!(
                "vertical anchor {} lies outside the page height {}",
                self.anchor_y, self.page_height
            )));
        }

        if self.glyph_height >= self.page_height {
            return Err(RenderError::InvalidGeometry(format!(
                "glyph height {} must be less than the page height {}",
                self.glyph_height, self.page_height
            )));
        }

        Ok(())
    }

    /// Pixel dimensions of a full-page layer
    pub fn page_size_px(&self) -> (u32, u32) {
        (
            self.page_width.to_px_ceil(self.px_per_mm),
            self.page_height.to_px_ceil(self.px_per_mm),
        )
    }

    /// Page dimensions in PDF points, width first
    pub fn page_size_pt(&self) -> (Pt, Pt) {
        (self.page_width.into(), self.page_height.into())
    }

    pub fn anchor_px(&self) -> (Px, Px) {
        (
            self.anchor_x.to_px(self.px_per_mm),
            self.anchor_y.to_px(self.px_per_mm),
        )
    }

    pub fn glyph_height_px(&self) -> Px {
        self.glyph_height.to_px(self.px_per_mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_the_reference_plate() {
        let geometry = LayoutGeometry::default();
        assert!(geometry.validate().is_ok());
        assert_eq!(geometry.page_width, Mm(208.7));
        assert_eq!(geometry.page_height, Mm(57.7));

        let (w, h) = geometry.page_size_pt();
        assert!(w > h, "plate pages are landscape, width first");
    }

    #[test]
    fn anchor_outside_page_is_rejected() {
        let geometry = LayoutGeometry {
            anchor_x: Mm(300.0),
            ..Default::default()
        };
        assert!(matches!(
            geometry.validate(),
            Err(RenderError::InvalidGeometry(_))
        ));

        let geometry = LayoutGeometry {
            anchor_y: Mm(-1.0),
            ..Default::default()
        };
        assert!(matches!(
            geometry.validate(),
            Err(RenderError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn glyph_taller_than_page_is_rejected() {
        let geometry = LayoutGeometry {
            glyph_height: Mm(57.7),
            ..Default::default()
        };
        assert!(matches!(
            geometry.validate(),
            Err(RenderError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn non_positive_ratio_is_rejected() {
        let geometry = LayoutGeometry {
            px_per_mm: 0.0,
            ..Default::default()
        };
        assert!(geometry.validate().is_err());

        let geometry = LayoutGeometry {
            px_per_mm: f32::NAN,
            ..Default::default()
        };
        assert!(geometry.validate().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let geometry: LayoutGeometry =
            serde_json::from_str(r#"{ "anchor_x": 104.35, "px_per_mm": 10.0 }"#)
                .expect("valid geometry json");
        assert_eq!(geometry.anchor_x, Mm(104.35));
        assert_eq!(geometry.px_per_mm, 10.0);
        assert_eq!(geometry.page_width, PLATE.0);
        assert_eq!(geometry.page_size_px(), (2087, 577));
    }
}
