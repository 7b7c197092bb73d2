//! HTML rendering of classified blocks, for checking classification in a browser.

use std::fmt::Write;

use crate::markdown::contact;
use crate::markdown::inline::tokenize;
use crate::model::Block;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escaped inline text with `**bold**` spans as `<strong>`.
fn inline_html(text: &str) -> String {
    let mut out = String::new();
    for segment in tokenize(text) {
        if segment.bold {
            let _ = write!(out, "<strong>{}</strong>", escape(&segment.text));
        } else {
            out.push_str(&escape(&segment.text));
        }
    }
    out
}

fn contact_html(text: &str) -> String {
    contact::split_parts(text)
        .into_iter()
        .map(|part| match part.link {
            Some(href) => format!("<a href=\"{}\">{}</a>", escape(&href), escape(&part.text)),
            None => escape(&part.text),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Render blocks as a standalone HTML fragment. Consecutive bullets share one list.
pub fn render_html(blocks: &[Block]) -> String {
    let mut html = String::from("<div class=\"resume\">\n");
    let mut in_list = false;

    for block in blocks {
        let is_bullet = matches!(block, Block::Bullet(_));
        if in_list && !is_bullet {
            html.push_str("</ul>\n");
            in_list = false;
        }
        match block {
            Block::Name(text) => {
                let _ = writeln!(html, "<h1>{}</h1>", escape(text));
            }
            Block::Headline(text) => {
                let _ = writeln!(html, "<p class=\"headline\"><strong>{}</strong></p>", escape(text));
            }
            Block::ContactLine(text) => {
                let _ = writeln!(html, "<p class=\"contact\">{}</p>", contact_html(text));
            }
            Block::SectionHeader(title) => {
                let _ = writeln!(html, "<h2>{}</h2>", escape(title));
            }
            Block::SubsectionHeader { left, right } => {
                let _ = match right {
                    Some(date) => writeln!(
                        html,
                        "<h3>{} <span class=\"date\">{}</span></h3>",
                        escape(left),
                        escape(date)
                    ),
                    None => writeln!(html, "<h3>{}</h3>", escape(left)),
                };
            }
            Block::Bullet(text) => {
                if !in_list {
                    html.push_str("<ul>\n");
                    in_list = true;
                }
                let _ = writeln!(html, "<li>{}</li>", inline_html(text));
            }
            Block::Paragraph(text) => {
                let _ = writeln!(html, "<p>{}</p>", inline_html(text));
            }
            Block::Blank => {}
        }
    }
    if in_list {
        html.push_str("</ul>\n");
    }
    html.push_str("</div>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<a & b>"), "&lt;a &amp; b&gt;");
    }

    #[test]
    fn bold_runs_become_strong() {
        assert_eq!(inline_html("Led **Rust** work"), "Led <strong>Rust</strong> work");
    }
}
