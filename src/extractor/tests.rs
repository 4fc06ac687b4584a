use super::*;
use lopdf::content::{Content, Operation};
use lopdf::{Object, Stream, dictionary};
use tempfile::TempDir;

/// Build a PDF with one text line per page; an empty string gives a page without text
fn build_pdf(page_texts: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in page_texts {
        let operations = if text.is_empty() {
            Vec::new()
        } else {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content should encode"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).expect("page count fits");
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("pdf should save");
    bytes
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("{:?} not found in {:?}", needle, haystack))
}

#[test]
fn empty_batch() {
    let extracted = extract_text(&[]).expect("extraction should succeed");
    assert_eq!(extracted, ExtractedText::default());
}

#[test]
fn preserves_file_and_page_order() {
    let documents = vec![
        PdfDocument::new("first.pdf", build_pdf(&["Alpha one", "Alpha two"])),
        PdfDocument::new("second.pdf", build_pdf(&["Beta one", "Beta two"])),
    ];

    let extracted = extract_text(&documents).expect("extraction should succeed");
    let text = &extracted.text;

    assert!(extracted.warnings.is_empty());
    assert!(position(text, "Alpha one") < position(text, "Alpha two"));
    assert!(position(text, "Alpha two") < position(text, "Beta one"));
    assert!(position(text, "Beta one") < position(text, "Beta two"));
}

#[test]
fn files_are_joined_without_separator() {
    let first = PdfDocument::new("first.pdf", build_pdf(&["Alpha"]));
    let second = PdfDocument::new("second.pdf", build_pdf(&["Beta"]));

    let alone_first = extract_text(std::slice::from_ref(&first)).expect("extracts");
    let alone_second = extract_text(std::slice::from_ref(&second)).expect("extracts");
    let together = extract_text(&[first, second]).expect("extracts");

    assert_eq!(
        together.text,
        format!("{}{}", alone_first.text, alone_second.text)
    );
}

#[test]
fn image_only_file_warns_once_and_adds_nothing() {
    let good = PdfDocument::new("paper.pdf", build_pdf(&["Findings"]));
    let scanned = PdfDocument::new("scan.pdf", build_pdf(&["", ""]));

    let alone = extract_text(std::slice::from_ref(&good)).expect("extracts");
    let extracted = extract_text(&[scanned, good]).expect("extracts");

    assert_eq!(
        extracted.warnings,
        vec![ExtractionWarning::NoText {
            file_name: "scan.pdf".to_string()
        }]
    );
    assert_eq!(extracted.text, alone.text);
}

#[test]
fn page_without_text_is_skipped_silently() {
    let documents = vec![PdfDocument::new(
        "mixed.pdf",
        build_pdf(&["Cover", "", "Body"]),
    )];

    let extracted = extract_text(&documents).expect("extraction should succeed");
    assert!(extracted.warnings.is_empty());
    assert!(position(&extracted.text, "Cover") < position(&extracted.text, "Body"));
}

#[test]
fn corrupt_file_is_an_error() {
    let documents = vec![
        PdfDocument::new("good.pdf", build_pdf(&["Fine"])),
        PdfDocument::new("broken.pdf", b"definitely not a pdf".to_vec()),
    ];

    match extract_text(&documents) {
        Err(PdfChatError::Extraction { file_name, .. }) => assert_eq!(file_name, "broken.pdf"),
        other => panic!("expected extraction error, got {:?}", other),
    }
}

#[test]
fn warning_message_names_the_file() {
    let warning = ExtractionWarning::NoText {
        file_name: "scan.pdf".to_string(),
    };
    assert_eq!(
        warning.to_string(),
        "No text could be extracted from scan.pdf. Consider using OCR."
    );
}

#[test]
fn document_from_path() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("report.pdf");
    std::fs::write(&path, build_pdf(&["Quarterly"])).expect("should write pdf");

    let document = PdfDocument::from_path(&path).expect("should read pdf");
    assert_eq!(document.file_name, "report.pdf");

    let extracted = extract_text(&[document]).expect("extraction should succeed");
    assert!(extracted.text.contains("Quarterly"));
}

#[test]
fn missing_path_is_an_io_error() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let result = PdfDocument::from_path(&temp_dir.path().join("absent.pdf"));
    assert!(matches!(result, Err(PdfChatError::Io(_))));
}
