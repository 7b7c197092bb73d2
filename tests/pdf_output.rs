mod common;

use std::fs;

use rayon::prelude::*;
use resume_pdf::{FontSet, convert_markdown_to_pdf, convert_str_to_pdf, output_file_name, pdf};

#[test]
fn fixtures_convert_to_pdf() {
    let _ = env_logger::builder().is_test(true).try_init();
    let fonts = FontSet::default();
    let fixtures = common::discover_fixtures().expect("discover fixtures");
    assert!(!fixtures.is_empty());

    for fixture in &fixtures {
        let output = common::output_path(fixture);
        fs::create_dir_all(output.parent().unwrap()).unwrap();
        convert_markdown_to_pdf(fixture, &output, &fonts)
            .unwrap_or_else(|e| panic!("{}: {e}", fixture.display()));
        let bytes = fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"%PDF-"), "{}", output.display());
        assert_eq!(common::count_pages(&bytes), 1, "{}", fixture.display());
    }
}

#[test]
fn contact_links_become_uri_annotations() {
    let bytes = convert_str_to_pdf(&common::fixture("jane_doe"), &common::options(), &FontSet::default()).unwrap();
    assert!(common::contains(&bytes, b"/Subtype /Link"));
    assert!(common::contains(&bytes, b"(mailto:jane@x.com)"));
    assert!(common::contains(&bytes, b"(https://linkedin.com/in/jane)"));
    assert!(common::contains(&bytes, b"/BaseFont /Helvetica-Bold"));
}

#[test]
fn page_count_matches_layout() {
    let text = common::long_resume(10, 6);
    let fonts = FontSet::default();
    let doc = resume_pdf::layout_resume(&text, &common::options(), &fonts).unwrap();
    assert!(doc.page_count() > 1);
    let bytes = pdf::write(&doc, &fonts).unwrap();
    assert_eq!(common::count_pages(&bytes), doc.page_count());
}

#[test]
fn empty_input_still_produces_a_page() {
    let bytes = convert_str_to_pdf("", &common::options(), &FontSet::default()).unwrap();
    assert_eq!(common::count_pages(&bytes), 1);
}

#[test]
fn parallel_conversions_are_identical() {
    let text = common::long_resume(6, 4);
    let outputs: Vec<Vec<u8>> = (0..8)
        .into_par_iter()
        .map(|_| convert_str_to_pdf(&text, &common::options(), &FontSet::default()).unwrap())
        .collect();
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn download_names() {
    assert_eq!(output_file_name(Some("cv.docx")), "cv_modified.pdf");
    assert_eq!(output_file_name(Some("jane.doe.v2.txt")), "jane.doe.v2_modified.pdf");
    assert_eq!(output_file_name(Some("notes")), "notes_modified.pdf");
    assert_eq!(output_file_name(Some(".profile")), "_modified.pdf");
    assert_eq!(output_file_name(Some("  ")), resume_pdf::DEFAULT_OUTPUT_NAME);
    assert_eq!(output_file_name(None), "optimized-faang-resume.pdf");
}
