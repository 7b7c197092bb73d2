use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use resume_pdf::fonts::{FontMetrics, PT_TO_MM};
use resume_pdf::{Error, LayoutOptions};

/// Every character advances `factor` mm per point of font size.
pub struct FixedWidth(pub f32);

impl FontMetrics for FixedWidth {
    fn text_width(&self, text: &str, _bold: bool, font_size: f32) -> Result<f32, Error> {
        Ok(text.chars().count() as f32 * font_size * self.0)
    }
}

/// 0.2mm per point: 2mm per character at 10pt, so 85 characters fill a line.
pub const METRIC: FixedWidth = FixedWidth(0.2);

/// Roughly Helvetica-sized, for realistic wrapping.
pub fn average_metric() -> FixedWidth {
    FixedWidth(0.5 * PT_TO_MM)
}

pub fn options() -> LayoutOptions {
    LayoutOptions::default()
}

pub fn fixture(name: &str) -> String {
    let path = Path::new("tests/fixtures").join(format!("{name}.md"));
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

/// All `.md` resumes under tests/fixtures, sorted by name. Filter with RESUME_PDF_CASE.
pub fn discover_fixtures() -> io::Result<Vec<PathBuf>> {
    let case_filter = std::env::var("RESUME_PDF_CASE").ok();
    let mut fixtures: Vec<PathBuf> = fs::read_dir("tests/fixtures")?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
        .filter(|p| match &case_filter {
            Some(case) => p.file_stem().is_some_and(|s| s == case.as_str()),
            None => true,
        })
        .collect();
    fixtures.sort();
    Ok(fixtures)
}

/// Output path: tests/output/<case>.pdf
pub fn output_path(fixture: &Path) -> PathBuf {
    let case = fixture.file_stem().unwrap().to_string_lossy();
    PathBuf::from("tests/output").join(format!("{case}.pdf"))
}

/// A resume with `sections` experience sections of `bullets` bullets each.
pub fn long_resume(sections: usize, bullets: usize) -> String {
    let mut text = String::from("# Sam Taylor\nPlatform Engineer\nsam@example.com | github.com/samt\n");
    for s in 0..sections {
        text.push_str("## EXPERIENCE\n");
        text.push_str(&format!("### Engineer at Company {s} | 20{:02} - 20{:02}\n", s % 100, (s + 1) % 100));
        for b in 0..bullets {
            text.push_str(&format!(
                "- Delivered project {b} for team {s}, improving **throughput** and reliability across several regions and services.\n"
            ));
        }
        text.push('\n');
    }
    text
}

pub fn count_pages(pdf: &[u8]) -> usize {
    let needle = b"/Type /Page";
    pdf.windows(needle.len() + 1)
        .filter(|w| &w[..needle.len()] == needle && w[needle.len()] != b's')
        .count()
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
