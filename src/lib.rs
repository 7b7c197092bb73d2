mod error;
pub mod fonts;
pub mod layout;
pub mod markdown;
pub mod model;
pub mod pdf;
pub mod preview;

pub use error::Error;
pub use fonts::{FontMetrics, FontSet};
pub use layout::LayoutOptions;
pub use model::{Block, Document, DrawOp, PageGeometry};

use std::path::Path;
use std::sync::LazyLock;
use std::time::Instant;

use regex::Regex;

/// File name used when the input has no usable name.
pub const DEFAULT_OUTPUT_NAME: &str = "optimized-faang-resume.pdf";

static EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[^/.]+$").expect("valid regex"));

/// Download name for a converted file: `<name without extension>_modified.pdf`.
pub fn output_file_name(input_name: Option<&str>) -> String {
    match input_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("{}_modified.pdf", EXTENSION.replace(name, "")),
        None => DEFAULT_OUTPUT_NAME.to_string(),
    }
}

/// Classify and lay out resume text without producing PDF bytes.
pub fn layout_resume(
    text: &str,
    options: &LayoutOptions,
    metrics: &dyn FontMetrics,
) -> Result<Document, Error> {
    let blocks = markdown::parse(text);
    layout::render(&blocks, options, metrics)
}

pub fn convert_str_to_pdf(
    text: &str,
    options: &LayoutOptions,
    fonts: &FontSet,
) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();

    let blocks = markdown::parse(text);
    let t_parse = t0.elapsed();

    let doc = layout::render(&blocks, options, fonts)?;
    let t_layout = t0.elapsed();

    let bytes = pdf::write(&doc, fonts)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, layout={:.1}ms, pdf={:.1}ms, total={:.1}ms ({} blocks, {} pages, {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_layout - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        blocks.len(),
        doc.page_count(),
        bytes.len(),
    );

    Ok(bytes)
}

pub fn convert_markdown_to_pdf(input: &Path, output: &Path, fonts: &FontSet) -> Result<(), Error> {
    let text = std::fs::read_to_string(input)?;
    let bytes = convert_str_to_pdf(&text, &LayoutOptions::default(), fonts)?;
    std::fs::write(output, &bytes).map_err(Error::Io)?;
    Ok(())
}
