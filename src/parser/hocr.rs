//! Minimal hOCR reader: pulls `ocrx_word` elements and their `title`
//! metadata out of Tesseract's XHTML output.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use crate::core::model::{Page, Word};

#[derive(Debug, Error)]
pub enum HocrError {
    #[error("malformed hOCR markup: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("no ocr_page element found")]
    NoPage,
}

struct OpenWord {
    title: String,
    text: String,
    depth: usize,
}

fn has_class(element: &BytesStart, class: &str) -> bool {
    element.attributes().flatten().any(|attr| {
        attr.key.as_ref() == b"class"
            && String::from_utf8_lossy(&attr.value)
                .split_whitespace()
                .any(|c| c == class)
    })
}

fn title_of(element: &BytesStart) -> String {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"title")
        .map(|attr| {
            let raw = String::from_utf8_lossy(&attr.value);
            html_escape::decode_html_entities(&raw).into_owned()
        })
        .unwrap_or_default()
}

/// Parses one hOCR document. Word text keeps entity references escaped so
/// the reference-word normalizer sees exactly what the OCR engine wrote.
pub fn parse_hocr(content: &str) -> Result<Page, HocrError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);
    reader.config_mut().check_end_names = false;

    let mut page = Page::default();
    let mut seen_page = false;
    let mut open: Option<OpenWord> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if let Some(word) = open.as_mut() {
                    word.depth += 1;
                } else if has_class(&e, "ocrx_word") {
                    open = Some(OpenWord {
                        title: title_of(&e),
                        text: String::new(),
                        depth: 1,
                    });
                } else if has_class(&e, "ocr_page") {
                    seen_page = true;
                    page.metadata = Some(title_of(&e));
                }
            }
            Event::Empty(e) => {
                if open.is_none() && has_class(&e, "ocrx_word") {
                    page.words.push(Word::new("", title_of(&e)));
                } else if open.is_none() && has_class(&e, "ocr_page") {
                    seen_page = true;
                    page.metadata = Some(title_of(&e));
                }
            }
            Event::Text(e) => {
                if let Some(word) = open.as_mut() {
                    word.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::CData(e) => {
                if let Some(word) = open.as_mut() {
                    word.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::GeneralRef(e) => {
                if let Some(word) = open.as_mut() {
                    word.text.push('&');
                    word.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                    word.text.push(';');
                }
            }
            Event::End(_) => {
                if let Some(word) = open.as_mut() {
                    word.depth -= 1;
                    if word.depth == 0 {
                        if let Some(done) = open.take() {
                            page.words
                                .push(Word::new(done.text.trim(), done.title));
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_page {
        return Err(HocrError::NoPage);
    }
    Ok(page)
}
