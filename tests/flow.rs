mod common;

use resume_pdf::Error;
use resume_pdf::fonts::{FontMetrics, PT_TO_MM};
use resume_pdf::layout::flow::wrap;
use resume_pdf::markdown::inline::tokenize;
use resume_pdf::model::StyledSegment;
use resume_pdf::FontSet;

#[test]
fn tokenize_pairs_bold_delimiters() {
    let segments = tokenize("Cut costs by **40%** in Q3");
    let bold: Vec<&str> = segments
        .iter()
        .filter(|s| s.bold)
        .map(|s| s.text.as_str())
        .collect();
    assert_eq!(bold, ["40%"]);
    let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(joined, "Cut costs by 40% in Q3");
}

#[test]
fn tokenize_keeps_unpaired_delimiter_literal() {
    let segments = tokenize("a **b** c ** d");
    let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(joined, "a b c ** d");
    assert!(segments.iter().filter(|s| s.bold).all(|s| s.text == "b"));
}

#[test]
fn tokenize_cases() {
    let cases: &[(&str, &[(&str, bool)])] = &[
        ("plain text", &[("plain", false), (" ", false), ("text", false)]),
        ("**all bold**", &[("all", true), (" ", true), ("bold", true)]),
        ("***a***", &[("*a", true), ("*", false)]),
        ("a****b", &[("a", false), ("b", false)]),
        ("tail **", &[("tail", false), (" ", false), ("**", false)]),
        (
            "**a** b **c",
            &[("a", true), (" ", false), ("b", false), (" ", false), ("**c", false)],
        ),
        ("", &[]),
    ];
    for (input, expected) in cases {
        let segments = tokenize(input);
        let got: Vec<(&str, bool)> = segments.iter().map(|s| (s.text.as_str(), s.bold)).collect();
        assert_eq!(got.as_slice(), *expected, "{input:?}");
    }
}

#[test]
fn lines_never_exceed_max_width() {
    let text = "Designed and operated a multi-region **Kafka** deployment handling \
                billions of events per day while keeping p99 latency under ten milliseconds.";
    let metric = common::average_metric();
    for max_width in [20.0, 45.0, 80.0, 170.0] {
        let lines = wrap(&tokenize(text), max_width, 10.0, 5.0, &metric).unwrap();
        assert!(!lines.is_empty());
        for line in &lines {
            assert!(
                line.width <= max_width + 1e-3 || line.segments.len() == 1,
                "line {:?} is {}mm wide, max {max_width}",
                line.text(),
                line.width
            );
        }
        // No word is lost or duplicated.
        let words: Vec<String> = lines.iter().flat_map(|l| l.segments.iter().map(|s| s.text.clone())).collect();
        assert_eq!(words.concat(), text.replace("**", "").split_whitespace().collect::<String>());
    }
}

#[test]
fn overlong_word_stays_on_one_line() {
    let segments = tokenize("Pneumonoultramicroscopicsilicovolcanoconiosis");
    let lines = wrap(&segments, 10.0, 10.0, 5.0, &common::METRIC).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].segments.len(), 1);
    assert!(lines[0].width > 10.0);

    let lines = wrap(&tokenize("ok Pneumonoultramicroscopicsilicovolcanoconiosis ok"), 10.0, 10.0, 5.0, &common::METRIC)
        .unwrap();
    let texts: Vec<String> = lines.iter().map(|l| l.text()).collect();
    assert_eq!(texts, ["ok", "Pneumonoultramicroscopicsilicovolcanoconiosis", "ok"]);
}

#[test]
fn glued_punctuation_wraps_with_its_word() {
    // 2mm per character at 10pt: "aaa" = 6, space = 2, "bb" = 4, "," = 2.
    for max_width in [11.0, 13.0] {
        let lines = wrap(&tokenize("aaa **bb**,"), max_width, 10.0, 5.0, &common::METRIC).unwrap();
        let texts: Vec<String> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, ["aaa", "bb,"], "max width {max_width}");
        assert_eq!(lines[1].segments[0].x_offset, 0.0);
        assert_eq!(lines[1].segments[1].x_offset, 4.0);
    }
}

#[test]
fn space_takes_style_of_the_whitespace() {
    let bold_wide = |text: &str, bold: bool, size: f32| -> Result<f32, Error> {
        let per_char = if bold { 3.0 } else { 1.0 };
        Ok(text.chars().count() as f32 * per_char * size / 10.0)
    };
    let segments = vec![
        StyledSegment::new("a", false),
        StyledSegment::new(" ", true),
        StyledSegment::new("b", false),
    ];
    let lines = wrap(&segments, 100.0, 10.0, 5.0, &bold_wide).unwrap();
    assert_eq!(lines[0].segments[1].x_offset, 4.0);
}

#[test]
fn empty_input_yields_no_lines() {
    assert!(wrap(&[], 100.0, 10.0, 5.0, &common::METRIC).unwrap().is_empty());
    assert!(wrap(&tokenize("   "), 100.0, 10.0, 5.0, &common::METRIC).unwrap().is_empty());
}

#[test]
fn measurement_failure_propagates() {
    let broken = |text: &str, _bold: bool, font_size: f32| -> Result<f32, Error> {
        Err(Error::Measure {
            text: text.to_string(),
            font_size,
            reason: "no metrics".into(),
        })
    };
    let err = wrap(&tokenize("hello world"), 100.0, 10.0, 5.0, &broken).unwrap_err();
    assert!(matches!(err, Error::Measure { ref text, .. } if text == "hello"));
}

#[test]
fn builtin_metrics_reject_bad_font_sizes() {
    let fonts = FontSet::default();
    assert!(matches!(fonts.text_width("x", false, f32::NAN), Err(Error::Measure { .. })));
    assert!(matches!(fonts.text_width("x", true, 0.0), Err(Error::Measure { .. })));

    let regular = fonts.text_width("Resume", false, 10.0).unwrap();
    let bold = fonts.text_width("Resume", true, 10.0).unwrap();
    assert!(bold > regular);
    // Same input, same width.
    assert_eq!(regular, fonts.text_width("Resume", false, 10.0).unwrap());
}

#[test]
fn builtin_metrics_match_what_winansi_can_draw() {
    let fonts = FontSet::default();
    let per_1000 = |units: f32| units * 10.0 / 1000.0 * PT_TO_MM;
    let approx = |a: f32, b: f32| (a - b).abs() < 1e-4;

    assert!(approx(fonts.text_width("É", false, 10.0).unwrap(), per_1000(667.0)));
    assert!(approx(fonts.text_width("ß", false, 10.0).unwrap(), per_1000(611.0)));
    assert!(approx(fonts.text_width("é", true, 10.0).unwrap(), per_1000(556.0)));
    assert!(approx(fonts.text_width("ö", true, 10.0).unwrap(), per_1000(611.0)));
    assert!(approx(fonts.text_width("•", false, 10.0).unwrap(), per_1000(350.0)));
    // Not drawable in WinAnsi, so it takes no space.
    assert_eq!(fonts.text_width("漢", false, 10.0).unwrap(), 0.0);
    assert!(approx(
        fonts.text_width("José 漢", false, 10.0).unwrap(),
        fonts.text_width("José ", false, 10.0).unwrap()
    ));
}
