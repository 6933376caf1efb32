//! Turning composited layers into a finished PDF, and the end-to-end export
//! pipeline that drives it.

use crate::compose::{compose_background_layer, compose_text_layer};
use crate::document::Document;
use crate::geometry::LayoutGeometry;
use crate::image::Image;
use crate::info::Info;
use crate::layer::Layer;
use crate::page::Page;
use crate::resolver::GlyphResolver;
use crate::source::ResourceSource;
use crate::token::{sanitize, tokenize};
use crate::RenderError;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The file name the reference tool saved its output under
pub const DEFAULT_OUTPUT: &str = "layout.pdf";

/// Build a single-page PDF sized to the physical page, with `background`
/// then `text` each stretched over the full page. Later placements paint on
/// top, so the text overlays the background.
pub fn export_document(
    background: &Layer,
    text: &Layer,
    geometry: &LayoutGeometry,
    info: Option<Info>,
) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::default();
    if let Some(info) = info {
        doc.set_info(info);
    }

    let background = doc.add_image(Image::from_layer(background));
    let text = doc.add_image(Image::from_layer(text));

    let mut page = Page::new(geometry.page_size_pt());
    page.add_full_page_image(background);
    page.add_full_page_image(text);
    doc.add_page(page);

    doc.render()
}

/// Guards against overlapping exports: `Idle → Exporting → Idle`.
///
/// Cloned controllers share the same state.
#[derive(Debug, Default, Clone)]
pub struct ExportController {
    exporting: Arc<AtomicBool>,
}

/// Holds the controller in the `Exporting` state until dropped
#[derive(Debug)]
pub struct ExportGuard {
    exporting: Arc<AtomicBool>,
}

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.exporting.store(false, Ordering::Release);
    }
}

impl ExportController {
    pub fn new() -> ExportController {
        ExportController::default()
    }

    /// Move to `Exporting`, or fail with [RenderError::ExportInProgress] if
    /// another export still holds its guard
    pub fn begin(&self) -> Result<ExportGuard, RenderError> {
        self.exporting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                log::warn!("export rejected: another export is still running");
                RenderError::ExportInProgress
            })?;
        Ok(ExportGuard {
            exporting: self.exporting.clone(),
        })
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }
}

/// Everything needed to turn text into a plate
pub struct Exporter<S> {
    pub geometry: LayoutGeometry,
    pub resolver: GlyphResolver,
    /// Locator of the background image
    pub background: String,
    source: S,
    controller: ExportController,
}

impl<S: ResourceSource> Exporter<S> {
    pub fn new<B: ToString>(
        geometry: LayoutGeometry,
        resolver: GlyphResolver,
        background: B,
        source: S,
    ) -> Exporter<S> {
        Exporter {
            geometry,
            resolver,
            background: background.to_string(),
            source,
            controller: ExportController::new(),
        }
    }

    /// Share an existing controller, so that several exporters reject each
    /// other's overlapping runs
    pub fn with_controller(mut self, controller: ExportController) -> Exporter<S> {
        self.controller = controller;
        self
    }

    pub fn controller(&self) -> &ExportController {
        &self.controller
    }

    /// Sanitize `raw`, compose both layers and render the PDF. Any failure
    /// aborts the whole export; an empty input fails before anything is
    /// fetched.
    pub async fn export(&self, raw: &str) -> Result<Vec<u8>, RenderError> {
        let _guard = self.controller.begin()?;
        self.geometry.validate()?;

        let text = sanitize(raw);
        let tokens = tokenize(&text);
        if tokens.is_empty() {
            return Err(RenderError::EmptyInput);
        }

        let (width, height) = self.geometry.page_size_px();
        let background =
            compose_background_layer(&self.background, width, height, &self.source).await?;
        let text_layer =
            compose_text_layer(&tokens, &self.geometry, &self.resolver, &self.source).await?;

        let info = Info::for_plate(&text, self.resolver.base());
        let bytes = export_document(&background, &text_layer.layer, &self.geometry, Some(info))?;

        log::info!(
            "exported \"{text}\": {} glyphs, {} bytes",
            text_layer.locators.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Export and save to `path`. The file is only created once the whole
    /// document has been rendered, so a failed export leaves nothing behind.
    pub async fn export_to_file<P: AsRef<Path>>(
        &self,
        raw: &str,
        path: P,
    ) -> Result<(), RenderError> {
        let bytes = self.export(raw).await?;
        tokio::fs::write(path.as_ref(), bytes).await?;
        log::info!("saved {}", path.as_ref().display());
        Ok(())
    }
}
