use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use pretty_assertions::assert_eq;

use dictstruct::core::letter_rule::LetterRuleKind;
use dictstruct::core::model::{DiagnosticKind, PageRef};
use dictstruct::export::{Exporter, JsonExporter};
use dictstruct::parser::{HocrDirectory, PageSource};
use dictstruct::pipeline::{build_sections, PipelineConfig};

fn temp_input_dir(prefix: &str) -> PathBuf {
    let mut out = std::env::temp_dir();
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    out.push(format!("{prefix}-{}-{now}", std::process::id()));
    fs::create_dir_all(&out).unwrap();
    out
}

fn hocr(words: &[(&str, [i32; 4])]) -> String {
    let spans: String = words
        .iter()
        .enumerate()
        .map(|(i, (text, b))| {
            format!(
                "<span class='ocrx_word' id='word_1_{}' title='bbox {} {} {} {}; x_wconf 90'>{}</span>\n",
                i + 1,
                b[0],
                b[1],
                b[2],
                b[3],
                text
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title></title></head>
<body>
<div class='ocr_page' id='page_1' title='image "scan.png"; bbox 0 0 3200 4600; ppageno 0'>
<span class='ocr_line' id='line_1_1' title='bbox 0 0 3200 4600'>
{spans}</span>
</div>
</body>
</html>
"#
    )
}

fn title(letter: &str) -> String {
    hocr(&[(letter, [1500, 420, 1650, 580]), ("Lorem", [200, 1200, 420, 1260])])
}

fn index(first: &str, last: &str) -> String {
    hocr(&[
        (first, [150, 90, 420, 140]),
        ("123", [1550, 90, 1650, 140]),
        (last, [2650, 90, 2980, 140]),
        ("body", [150, 900, 300, 950]),
    ])
}

fn write_book(dir: &PathBuf, pages: &[String]) {
    for (i, content) in pages.iter().enumerate() {
        fs::write(dir.join(format!("page{}.hocr", i + 1)), content).unwrap();
    }
}

/// Full run over a directory whose numbering crosses 9 -> 10.
#[test]
fn test_reconstructs_book_from_directory() -> Result<()> {
    let dir = temp_input_dir("dictstruct-book");
    let mut pages = vec![
        title("A"),
        index("Aachen", "Abend"),
        index("abfahren", "azurblau"),
    ];
    // Missed title page for B: the tracker has to infer it.
    pages.push(index("&#8222;Bach", "Bussard."));
    pages.push(index("-bahn", "bunt"));
    pages.push(hocr(&[("XVII", [150, 90, 400, 140])]));
    pages.push(title("C"));
    pages.push(index("Cafe", "Chor"));
    pages.push(index("-chen", "City"));
    pages.push(title("D"));
    write_book(&dir, &pages);
    fs::write(dir.join("notes.txt"), "not a page")?;

    let source = HocrDirectory::open(&dir)?;
    assert_eq!(source.page_count(), 10);
    assert_eq!(source.page_name(9), "page10.hocr");

    let config = PipelineConfig::new(dir.clone());
    let result = build_sections(&config)?;

    let summary: Vec<_> = result
        .sections
        .iter()
        .map(|s| (s.label.as_str(), s.page, s.references.len()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("A", PageRef::Known(0), 2),
            ("B", PageRef::Unknown, 2),
            ("C", PageRef::Known(6), 2),
            ("D", PageRef::Known(9), 0),
        ]
    );
    assert_eq!(result.sections[1].references[0].words, vec!["Bach", "Bussard"]);

    let kinds: Vec<_> = result.diagnostics.iter().map(|d| (d.page_idx, d.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            (3, DiagnosticKind::LetterMismatch),
            (5, DiagnosticKind::UnclassifiedPage),
        ]
    );
    assert_eq!(result.pages_processed, 10);

    let out = dir.join("out");
    JsonExporter::new(out.clone()).export(&result)?;
    let json = fs::read_to_string(out.join("sections.json"))?;
    assert!(json.contains("\"letter_mismatch\""));

    let _ = fs::remove_dir_all(&dir);
    Ok(())
}

/// Custom regions and page range flow through the directory pipeline.
#[test]
fn test_page_range_and_regions() -> Result<()> {
    let dir = temp_input_dir("dictstruct-range");
    write_book(
        &dir,
        &[
            hocr(&[("Vorwort", [1500, 420, 1800, 580])]),
            title("M"),
            index("Maat", "Mythos"),
            index("Nabe", "Nymphe"),
        ],
    );

    let mut config = PipelineConfig::new(dir.clone());
    config.start_page = 1;
    config.end_page = Some(3);
    config.letter_rule = LetterRuleKind::Successor;
    let result = build_sections(&config)?;

    assert_eq!(result.pages_processed, 2);
    assert_eq!(result.sections.len(), 1);
    assert_eq!(result.sections[0].label, "M");
    assert_eq!(result.sections[0].page, PageRef::Known(1));
    assert_eq!(result.sections[0].references[0].page_idx, 2);
    assert!(result.diagnostics.is_empty());

    let _ = fs::remove_dir_all(&dir);
    Ok(())
}

/// A page that cannot be parsed stops the run without partial output.
#[test]
fn test_unreadable_page_is_fatal() -> Result<()> {
    let dir = temp_input_dir("dictstruct-broken");
    write_book(
        &dir,
        &[title("A"), "<div class='ocr_page'><span class=".to_string()],
    );

    let config = PipelineConfig::new(dir.clone());
    let err = build_sections(&config).unwrap_err();
    assert!(format!("{err:#}").contains("page2.hocr"));

    let _ = fs::remove_dir_all(&dir);
    Ok(())
}

#[test]
fn test_missing_input_directory() {
    let config = PipelineConfig::new(PathBuf::from("/no/such/dictstruct/input"));
    assert!(build_sections(&config).is_err());
}
