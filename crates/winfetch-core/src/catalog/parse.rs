//! products.xml parsing.
//!
//! Every `File` element at any depth is one record, in document order. Only
//! direct children of `File` are read; a missing or empty child leaves the
//! field unset, which disqualifies the record at match time but never fails
//! the parse. Text is stored as written: `" en-us "` is not `"en-us"`.

use crate::error::WinfetchError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// One `File` entry of the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductRecord {
    pub language_code: Option<String>,
    pub edition: Option<String>,
    pub architecture: Option<String>,
    /// Download URL of the image.
    pub file_path: Option<String>,
    /// Declared size in bytes.
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
enum Field {
    LanguageCode,
    Edition,
    Architecture,
    FilePath,
    Size,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Field> {
        match tag {
            b"LanguageCode" => Some(Field::LanguageCode),
            b"Edition" => Some(Field::Edition),
            b"Architecture" => Some(Field::Architecture),
            b"FilePath" => Some(Field::FilePath),
            b"Size" => Some(Field::Size),
            _ => None,
        }
    }

    fn assign(self, record: &mut ProductRecord, text: &str) {
        if text.is_empty() {
            return;
        }
        match self {
            Field::LanguageCode => record.language_code = Some(text.to_string()),
            Field::Edition => record.edition = Some(text.to_string()),
            Field::Architecture => record.architecture = Some(text.to_string()),
            Field::FilePath => record.file_path = Some(text.to_string()),
            Field::Size => record.size = text.trim().parse::<u64>().ok(),
        }
    }
}

fn malformed(err: impl std::fmt::Display) -> WinfetchError {
    WinfetchError::DocumentNotExtractable {
        reason: format!("products.xml is not well-formed: {err}"),
    }
}

/// Parses a products document into records, in document order.
pub fn parse_products(document: &str) -> Result<Vec<ProductRecord>, WinfetchError> {
    let mut reader = Reader::from_str(document);

    let mut records = Vec::new();
    let mut depth = 0usize;
    // Depth of the open `File` element and the record being filled.
    let mut open: Option<(usize, ProductRecord)> = None;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => {
                depth += 1;
                match open.as_ref().map(|(d, _)| *d) {
                    None if e.local_name().as_ref() == b"File" => {
                        open = Some((depth, ProductRecord::default()));
                    }
                    Some(file_depth) if depth == file_depth + 1 => {
                        field = Field::from_tag(e.local_name().as_ref());
                        text.clear();
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if open.is_none() && e.local_name().as_ref() == b"File" {
                    records.push(ProductRecord::default());
                }
            }
            Event::Text(t) => {
                if field.is_some() {
                    text.push_str(&t.unescape().map_err(malformed)?);
                }
            }
            Event::CData(c) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(_) => {
                if let Some(file_depth) = open.as_ref().map(|(d, _)| *d) {
                    if depth == file_depth + 1 {
                        if let (Some(f), Some((_, record))) = (field.take(), open.as_mut()) {
                            f.assign(record, &text);
                        }
                    } else if depth == file_depth {
                        if let Some((_, record)) = open.take() {
                            records.push(record);
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    tracing::debug!(count = records.len(), "parsed catalog records");
    Ok(records)
}
