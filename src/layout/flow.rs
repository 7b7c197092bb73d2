use crate::error::Error;
use crate::fonts::FontMetrics;
use crate::markdown::inline::word_runs;
use crate::model::{PlacedSegment, StyledSegment, WrappedLine};

fn finish_line(chunks: &mut Vec<PlacedSegment>, font_size: f32, line_height: f32) -> WrappedLine {
    let width = chunks.last().map(|c| c.x_offset + c.width).unwrap_or(0.0);
    WrappedLine {
        segments: std::mem::take(chunks),
        font_size,
        width,
        line_height,
    }
}

/// Greedy word wrap of styled segments into lines no wider than `max_width`.
///
/// Words are never split. A word that is wider than `max_width` on its own is
/// placed alone on a line and overflows. Adjacent segments without whitespace
/// between them form one word ("**bold**," keeps the comma against the word);
/// whitespace becomes a single space measured in the style of that whitespace.
pub fn wrap(
    segments: &[StyledSegment],
    max_width: f32,
    font_size: f32,
    line_height: f32,
    metrics: &dyn FontMetrics,
) -> Result<Vec<WrappedLine>, Error> {
    let mut lines: Vec<WrappedLine> = Vec::new();
    let mut current: Vec<PlacedSegment> = Vec::new();
    let mut current_x: f32 = 0.0;
    let mut pending_space: Option<f32> = None;
    // Index in `current` where the word being built starts.
    let mut word_start = 0usize;

    for segment in segments {
        for (run, is_ws) in word_runs(&segment.text) {
            if is_ws {
                if !current.is_empty() && pending_space.is_none() {
                    pending_space = Some(metrics.text_width(" ", segment.bold, font_size)?);
                }
                continue;
            }

            let run_w = metrics.text_width(run, segment.bold, font_size)?;
            let starts_word = current.is_empty() || pending_space.is_some();
            let proposed_x = current_x + pending_space.take().unwrap_or(0.0);
            if starts_word {
                word_start = current.len();
            }

            if proposed_x + run_w > max_width && word_start > 0 {
                // Carry the whole word, including glued pieces already placed.
                let mut carried = current.split_off(word_start);
                lines.push(finish_line(&mut current, font_size, line_height));
                let shift = carried.first().map(|c| c.x_offset).unwrap_or(proposed_x);
                for piece in &mut carried {
                    piece.x_offset -= shift;
                }
                current_x = if starts_word { 0.0 } else { proposed_x - shift };
                current = carried;
                word_start = 0;
            } else {
                current_x = proposed_x;
            }

            current.push(PlacedSegment {
                text: run.to_string(),
                bold: segment.bold,
                link: segment.link.clone(),
                x_offset: current_x,
                width: run_w,
            });
            current_x += run_w;
        }
    }

    if !current.is_empty() {
        lines.push(finish_line(&mut current, font_size, line_height));
    }
    Ok(lines)
}
