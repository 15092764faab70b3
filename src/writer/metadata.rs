//! Document information dictionary.

use chrono::{DateTime, FixedOffset, Local};

use crate::object::{Dict, Object};

/// Producer stamped on new documents.
pub const PRODUCER: &str = "pdf_scribe";

/// Document-level metadata written to the `/Info` dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfMetadata {
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Document keywords
    pub keywords: Option<String>,
    /// Application that created the original content
    pub creator: Option<String>,
    /// Application that produced the PDF
    pub producer: Option<String>,
    /// Creation timestamp
    pub creation_date: Option<DateTime<FixedOffset>>,
    /// Last modification timestamp
    pub modification_date: Option<DateTime<FixedOffset>>,
}

impl Default for PdfMetadata {
    fn default() -> Self {
        let now = Local::now().fixed_offset();
        Self {
            title: None,
            author: None,
            subject: None,
            keywords: None,
            creator: None,
            producer: Some(PRODUCER.to_string()),
            creation_date: Some(now),
            modification_date: Some(now),
        }
    }
}

impl PdfMetadata {
    /// Metadata stamped with the current time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata with no entries at all.
    pub fn empty() -> Self {
        Self {
            title: None,
            author: None,
            subject: None,
            keywords: None,
            creator: None,
            producer: None,
            creation_date: None,
            modification_date: None,
        }
    }

    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set document subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set document keywords.
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    /// Set creator application.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    pub fn with_creation_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.creation_date = Some(date);
        self
    }

    pub fn with_modification_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.modification_date = Some(date);
        self
    }

    /// Build the `/Info` dictionary; absent fields are left out.
    pub fn to_info_dict(&self) -> Dict {
        let mut dict = Dict::new();
        let texts = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Keywords", &self.keywords),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
        ];
        for (key, value) in texts {
            if let Some(value) = value {
                dict.insert(key.to_string(), Object::text_string(value));
            }
        }
        if let Some(date) = &self.creation_date {
            dict.insert("CreationDate".to_string(), Object::text_string(&format_pdf_date(date)));
        }
        if let Some(date) = &self.modification_date {
            dict.insert("ModDate".to_string(), Object::text_string(&format_pdf_date(date)));
        }
        dict
    }
}

/// Format a timestamp as a PDF date string (ISO 32000-1 §7.9.4).
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use pdf_scribe::writer::format_pdf_date;
///
/// let tz = FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap();
/// let date = tz.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
/// assert_eq!(format_pdf_date(&date), "D:20240309140500-05'30'");
/// ```
pub fn format_pdf_date(date: &DateTime<FixedOffset>) -> String {
    let offset = date.offset().local_minus_utc();
    let sign = if offset < 0 { '-' } else { '+' };
    let minutes = offset.abs() / 60;
    format!(
        "D:{}{}{:02}'{:02}'",
        date.format("%Y%m%d%H%M%S"),
        sign,
        minutes / 60,
        minutes % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_date() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2023, 12, 31, 23, 59, 58)
            .unwrap()
    }

    #[test]
    fn test_format_positive_offset() {
        assert_eq!(format_pdf_date(&fixed_date()), "D:20231231235958+01'00'");
    }

    #[test]
    fn test_format_utc() {
        let date = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2020, 1, 2, 3, 4, 5)
            .unwrap();
        assert_eq!(format_pdf_date(&date), "D:20200102030405+00'00'");
    }

    #[test]
    fn test_default_stamps_producer_and_dates() {
        let meta = PdfMetadata::new();
        assert_eq!(meta.producer.as_deref(), Some(PRODUCER));
        assert!(meta.creation_date.is_some());
        assert_eq!(meta.creation_date, meta.modification_date);
    }

    #[test]
    fn test_info_dict_entries() {
        let meta = PdfMetadata::empty()
            .with_title("Report")
            .with_creation_date(fixed_date());
        let dict = meta.to_info_dict();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("Title"), Some(&Object::text_string("Report")));
        assert_eq!(
            dict.get("CreationDate"),
            Some(&Object::text_string("D:20231231235958+01'00'"))
        );
    }

    #[test]
    fn test_non_ascii_title_is_utf16() {
        let meta = PdfMetadata::empty().with_title("Grüße");
        match meta.to_info_dict().get("Title") {
            Some(Object::String(bytes)) => assert_eq!(&bytes[..2], &[0xFE, 0xFF]),
            other => panic!("unexpected title {:?}", other),
        }
    }
}
