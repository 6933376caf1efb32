use crate::image::Image;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::*;
use crate::RenderError;
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Name, Pdf};
use std::io::Write;

/// An image placed on a page. The image is stretched to fill `position`
#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image_id: Id<Image>,
    pub position: Rect,
}

/// A single page: its size and the images painted on it, in painting order
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    pub contents: Vec<ImageLayout>,
}

impl Page {
    /// Create an empty page of the given size, in points
    pub fn new(size: (Pt, Pt)) -> Page {
        Page {
            media_box: Rect::from_size(size.0, size.1),
            contents: Vec::default(),
        }
    }

    /// Paint an image over everything added before it
    pub fn add_image(&mut self, image: ImageLayout) {
        self.contents.push(image);
    }

    /// Paint an image over the entire page
    pub fn add_full_page_image(&mut self, image_id: Id<Image>) {
        self.add_image(ImageLayout {
            image_id,
            position: self.media_box,
        });
    }

    #[allow(clippy::write_with_newline)]
    fn render(&self) -> Result<Vec<u8>, std::io::Error> {
        let mut content: Vec<u8> = Vec::default();

        for image in self.contents.iter() {
            write!(&mut content, "q\n")?;
            write!(
                &mut content,
                "{} 0 0 {} {} {} cm\n",
                *image.position.width(),
                *image.position.height(),
                *image.position.x1,
                *image.position.y1
            )?;
            write!(&mut content, "/I{} Do\n", image.image_id.index())?;
            write!(&mut content, "Q\n")?;
        }

        Ok(content)
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        images: &Arena<Image>,
        writer: &mut Pdf,
    ) -> Result<(), RenderError> {
        let id = refs.gen(RefType::Page(page_index));
        let content_id = refs.gen(RefType::ContentForPage(page_index));
        let tree_id = refs
            .get(RefType::PageTree)
            .ok_or_else(|| RenderError::ExportUnavailable("page tree was not allocated".into()))?;

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.parent(tree_id);

        let mut resources = page.resources();
        let mut resource_xobjects = resources.x_objects();
        for (i, _) in images.iter() {
            let image_ref = refs.get(RefType::Image(i.index())).ok_or_else(|| {
                RenderError::ExportUnavailable(format!("image {} was not written", i.index()))
            })?;
            resource_xobjects.pair(Name(format!("I{}", i.index()).as_bytes()), image_ref);
        }
        resource_xobjects.finish();
        resources.finish();

        page.contents(content_id);
        page.finish();

        let rendered = self.render()?;
        writer.stream(content_id, rendered.as_slice());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_render_in_painting_order() {
        let mut images: Arena<Image> = Arena::new();
        let layer = crate::layer::Layer::new(1, 1).expect("can allocate");
        let first = images.alloc(Image::from_layer(&layer));
        let second = images.alloc(Image::from_layer(&layer));

        let mut page = Page::new((Pt(100.0), Pt(50.0)));
        page.add_full_page_image(first);
        page.add_full_page_image(second);

        let rendered = String::from_utf8(page.render().expect("renders")).expect("ascii");
        assert_eq!(
            rendered,
            "q\n100 0 0 50 0 0 cm\n/I0 Do\nQ\nq\n100 0 0 50 0 0 cm\n/I1 Do\nQ\n"
        );
    }
}
