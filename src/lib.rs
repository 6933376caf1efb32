//! Lays out a row of pre-rendered letter glyphs over a background image and
//! flattens both into a fixed-size, print-ready PDF.
//!
//! The pipeline, leaf first:
//!
//! - [token]: sanitize input and expand it into the glyphs to draw
//! - [resolver]: map each glyph to the locator of its image
//! - [source] and [glyph]: fetch, decode and measure glyph images
//! - [compose]: centre the run on the layout anchor and rasterise both layers
//! - [export]: assemble the two layers into a single-page PDF
//!
//! [preview] provides the keystroke-driven preview that runs alongside.

pub mod compose;

mod config;
pub use config::*;

mod document;
pub use document::*;

pub mod export;

pub mod geometry;

pub mod glyph;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

pub mod layer;

mod page;
pub use page::*;

pub mod preview;

mod rect;
pub use rect::*;

pub(crate) mod refs;

pub mod resolver;

pub mod source;

pub mod token;

mod units;
pub use units::*;

mod error;
pub use error::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;
