use crate::refs::{ObjectReferences, RefType};
use pdf_writer::{Date as PDate, Pdf, TextStr};

/// Metadata written into the plate's document information dictionary
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Info {
    /// The sanitized text the plate was rendered from
    pub title: Option<String>,
    /// Where the glyph images were taken from
    pub subject: Option<String>,
}

impl Info {
    /// Create a new info block, with all metadata set to [None]
    pub fn new() -> Info {
        Info::default()
    }

    /// Describe a plate rendered from `text` with glyphs found under
    /// `glyph_base`
    pub fn for_plate(text: &str, glyph_base: &str) -> Info {
        Info {
            title: Some(text.to_string()),
            subject: Some(format!("glyphs from {glyph_base}")),
        }
    }

    /// Set the title of the info block, modifying `self`
    pub fn title<S: ToString>(&mut self, title: S) -> &mut Self {
        self.title = Some(title.to_string());
        self
    }

    /// Set the subject of the info block, modifying `self`
    pub fn subject<S: ToString>(&mut self, subject: S) -> &mut Self {
        self.subject = Some(subject.to_string());
        self
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let id = refs.gen(RefType::Info);
        let mut info = writer.document_info(id);

        if let Some(title) = &self.title {
            info.title(TextStr(title.as_str()));
        }
        if let Some(subject) = &self.subject {
            info.subject(TextStr(subject.as_str()));
        }
        info.creator(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )));
        info.creation_date(creation_date(chrono::Local::now()));
    }
}

/// A PDF date for `now`, keeping its local UTC offset
fn creation_date(now: chrono::DateTime<chrono::Local>) -> PDate {
    use chrono::{Datelike, Offset, Timelike};

    let offset = now.offset().fix().local_minus_utc();
    let offset_hours = offset / 3600;
    let offset_minutes = ((offset % 3600) / 60).abs();

    PDate::new(now.year() as u16)
        .month(now.month() as u8)
        .day(now.day() as u8)
        .hour(now.hour() as u8)
        .minute(now.minute() as u8)
        .second(now.second() as u8)
        .utc_offset_hour(offset_hours as i8)
        .utc_offset_minute(offset_minutes as u8)
}
