use crate::image::Image;
use crate::info::Info;
use crate::page::Page;
use crate::refs::{ObjectReferences, RefType};
use crate::RenderError;
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Pdf, Ref};

#[derive(Default)]
/// A document is the main object that stores all the contents of the PDF
/// then renders it out with a call to [Document::render]
pub struct Document {
    pub info: Option<Info>,
    pub pages: Vec<Page>,
    pub images: Arena<Image>,
}

impl Document {
    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document, returning its index
    pub fn add_page(&mut self, page: Page) -> usize {
        self.pages.push(page);
        self.pages.len() - 1
    }

    /// Add an image to the document structure. Images are stored "globally" within the
    /// document, such that any page can refer to them by the returned id.
    pub fn add_image(&mut self, image: Image) -> Id<Image> {
        self.images.alloc(image)
    }

    /// Render the document to PDF bytes, resolving every object reference.
    pub fn render(self) -> Result<Vec<u8>, RenderError> {
        let Document {
            info,
            pages,
            images,
        } = self;

        if pages.is_empty() {
            return Err(RenderError::ExportUnavailable(
                "a document needs at least one page".into(),
            ));
        }

        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        for (i, image) in images.iter() {
            image.write(&mut refs, i.index(), &mut writer);
        }

        for (page_index, page) in pages.iter().enumerate() {
            page.write(&mut refs, page_index, &images, &mut writer)?;
        }

        let page_refs: Vec<Ref> = (0..pages.len())
            .filter_map(|i| refs.get(RefType::Page(i)))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        Ok(writer.finish())
    }
}
