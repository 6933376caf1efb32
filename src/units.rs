//! Length units used throughout the crate.
//!
//! Three coordinate spaces meet when building a plate:
//!
//! - [`Mm`]: physical lengths, the space the layout geometry is specified in
//! - [`Px`]: raster lengths on a composited layer
//! - [`Pt`]: PDF user-space lengths (1/72 of an inch)
//!
//! Keeping them as distinct types stops a millimetre value from ever being
//! written into a PDF content stream unconverted.

use derive_more::{Add, AddAssign, Deref, Display, From, Into, Sub, SubAssign, Sum};
use std::ops::{Div, Mul};
use serde::Deserialize;

/// Millimetres per inch
pub const MM_PER_INCH: f32 = 25.4;

/// PDF points per inch
pub const PT_PER_INCH: f32 = 72.0;

/// A physical length in millimetres
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Sum,
    From,
    Into,
    Deref,
    Display,
    Deserialize,
)]
#[display("{_0}mm")]
#[serde(transparent)]
pub struct Mm(pub f32);

/// A length in PDF points
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Sum,
    From,
    Into,
    Deref,
    Display,
)]
#[display("{_0}pt")]
pub struct Pt(pub f32);

/// A length in raster pixels. Fractional values are meaningful: glyph
/// placements are anti-aliased, not snapped to the pixel grid
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Sum,
    From,
    Into,
    Deref,
    Display,
)]
#[display("{_0}px")]
pub struct Px(pub f32);

macro_rules! scalar_ops {
    ($($unit:ident),*) => {
        $(
            impl Mul<f32> for $unit {
                type Output = $unit;

                fn mul(self, rhs: f32) -> $unit {
                    $unit(self.0 * rhs)
                }
            }

            impl Div<f32> for $unit {
                type Output = $unit;

                fn div(self, rhs: f32) -> $unit {
                    $unit(self.0 / rhs)
                }
            }
        )*
    };
}

scalar_ops!(Mm, Pt, Px);

impl Mm {
    /// Convert to raster pixels given a pixel density
    pub fn to_px(self, px_per_mm: f32) -> Px {
        Px(self.0 * px_per_mm)
    }

    /// The number of whole pixels needed to cover this length
    pub fn to_px_ceil(self, px_per_mm: f32) -> u32 {
        (self.0 * px_per_mm).ceil() as u32
    }
}

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Self {
        Pt(mm.0 * PT_PER_INCH / MM_PER_INCH)
    }
}

impl From<Pt> for Mm {
    fn from(pt: Pt) -> Self {
        Mm(pt.0 * MM_PER_INCH / PT_PER_INCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mm_to_pt_matches_inch_definition() {
        let pt: Pt = Mm(25.4).into();
        assert!((pt.0 - 72.0).abs() < 1e-4);

        let back: Mm = pt.into();
        assert!((back.0 - 25.4).abs() < 1e-4);
    }

    #[test]
    fn pixel_cover_rounds_up() {
        let ratio = 96.0 / MM_PER_INCH;
        assert_eq!(Mm(208.7).to_px_ceil(ratio), 789);
        assert_eq!(Mm(57.7).to_px_ceil(ratio), 219);
    }

    #[test]
    fn lengths_sum_like_numbers() {
        let total: Px = [Px(1.5), Px(2.0), Px(0.5)].into_iter().sum();
        assert_eq!(total, Px(4.0));
        assert_eq!(total / 2.0, Px(2.0));
        assert_eq!(Px(3.0) * 2.0, Px(6.0));
    }
}
