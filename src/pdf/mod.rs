use std::collections::HashSet;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::error::Error;
use crate::fonts::{FontEntry, FontSet, PT_TO_MM, register_font};
use crate::model::{DrawOp, Document};

/// Millimetres to points.
fn pt(v: f32) -> f32 {
    v / PT_TO_MM
}

/// Per-page drawing state while emitting one content stream.
struct PageWriter<'a> {
    content: Content,
    page_height: f32, // points
    regular: &'a FontEntry,
    bold: &'a FontEntry,
    in_text: bool,
    td: (f32, f32),
    font: Option<(bool, f32)>,
}

impl<'a> PageWriter<'a> {
    fn new(page_height: f32, regular: &'a FontEntry, bold: &'a FontEntry) -> Self {
        Self {
            content: Content::new(),
            page_height,
            regular,
            bold,
            in_text: false,
            td: (0.0, 0.0),
            font: None,
        }
    }

    fn text(&mut self, x: f32, y: f32, text: &str, bold: bool, font_size: f32) {
        if !self.in_text {
            self.content.begin_text();
            self.in_text = true;
            self.td = (0.0, 0.0);
            self.font = None;
        }
        if self.font != Some((bold, font_size)) {
            let entry = if bold { self.bold } else { self.regular };
            self.content.set_font(Name(entry.pdf_name.as_bytes()), font_size);
            self.font = Some((bold, font_size));
        }
        let (px, py) = (pt(x), self.page_height - pt(y));
        self.content.next_line(px - self.td.0, py - self.td.1);
        self.td = (px, py);

        let entry = if bold { self.bold } else { self.regular };
        self.content.show(Str(&entry.encode(text)));
    }

    fn rule(&mut self, x1: f32, x2: f32, y: f32, thickness: f32) {
        self.end_text();
        let py = self.page_height - pt(y);
        self.content.set_stroke_gray(0.0);
        self.content.set_line_width(pt(thickness));
        self.content.move_to(pt(x1), py);
        self.content.line_to(pt(x2), py);
        self.content.stroke();
    }

    fn end_text(&mut self) {
        if self.in_text {
            self.content.end_text();
            self.in_text = false;
        }
    }

    /// Close the stream and return it zlib-compressed.
    fn finish(mut self) -> Vec<u8> {
        self.end_text();
        let raw = self.content.finish();
        miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6)
    }
}

fn used_chars(doc: &Document, bold: bool) -> HashSet<char> {
    let mut chars: HashSet<char> = doc
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, bold: b, .. } if *b == bold => Some(text.chars()),
            _ => None,
        })
        .flatten()
        .collect();
    chars.insert(' ');
    chars
}

/// Serialize a laid-out document to PDF bytes.
pub fn write(doc: &Document, fonts: &FontSet) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    if doc.pages.is_empty() {
        return Err(Error::Pdf("document has no pages".into()));
    }

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    let regular = register_font(
        &mut pdf,
        fonts.source(false),
        false,
        "F1".to_string(),
        &mut alloc,
        &used_chars(doc, false),
    );
    let bold = register_font(
        &mut pdf,
        fonts.source(true),
        true,
        "F2".to_string(),
        &mut alloc,
        &used_chars(doc, true),
    );
    let t_fonts = t0.elapsed();

    let page_width = pt(doc.geometry.width);
    let page_height = pt(doc.geometry.height);
    let n = doc.pages.len();

    let mut writers: Vec<PageWriter> = (0..n)
        .map(|_| PageWriter::new(page_height, &regular, &bold))
        .collect();
    let mut page_links: Vec<Vec<(Rect, &str)>> = vec![Vec::new(); n];

    for op in &doc.ops {
        let idx = (op.page() as usize).saturating_sub(1);
        let Some(writer) = writers.get_mut(idx) else {
            return Err(Error::Pdf(format!("draw op on page {} of {n}", op.page())));
        };
        match op {
            DrawOp::Text { x, y, text, bold, font_size, .. } => {
                writer.text(*x, *y, text, *bold, *font_size);
            }
            DrawOp::Rule { x1, x2, y, thickness, .. } => {
                writer.rule(*x1, *x2, *y, *thickness);
            }
            DrawOp::Link { x, y, width, height, url, .. } => {
                let rect = Rect::new(
                    pt(*x),
                    page_height - pt(y + height),
                    pt(x + width),
                    page_height - pt(*y),
                );
                page_links[idx].push((rect, url.as_str()));
            }
        }
    }

    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    let page_annot_refs: Vec<Vec<Ref>> = page_links
        .iter()
        .map(|links| {
            links
                .iter()
                .map(|&(rect, url)| {
                    let annot_ref = alloc();
                    let mut annot = pdf.annotation(annot_ref);
                    annot
                        .subtype(pdf_writer::types::AnnotationType::Link)
                        .rect(rect)
                        .border(0.0, 0.0, 0.0, None);
                    annot
                        .action()
                        .action_type(pdf_writer::types::ActionType::Uri)
                        .uri(Str(url.as_bytes()));
                    annot_ref
                })
                .collect()
        })
        .collect();

    for (i, writer) in writers.into_iter().enumerate() {
        let compressed = writer.finish();
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, page_width, page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        if !page_annot_refs[i].is_empty() {
            page.annotations(page_annot_refs[i].iter().copied());
        }
        let mut resources = page.resources();
        let mut font_dict = resources.fonts();
        for entry in [&regular, &bold] {
            font_dict.pair(Name(entry.pdf_name.as_bytes()), entry.font_ref);
        }
    }

    log::info!(
        "PDF: {n} pages, {} ops; fonts={:.1}ms, total={:.1}ms",
        doc.ops.len(),
        t_fonts.as_secs_f64() * 1000.0,
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(pdf.finish())
}
