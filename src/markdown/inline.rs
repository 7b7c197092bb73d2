use crate::model::StyledSegment;

const BOLD_DELIMITER: &str = "**";

/// Split `text` into styled segments on `**` delimiters.
///
/// Delimiters pair up left to right; with an odd count the last one is kept as
/// literal text. Words and whitespace runs become separate segments, so the
/// concatenated segment texts equal the input minus the paired delimiters.
pub fn tokenize(text: &str) -> Vec<StyledSegment> {
    let delimiters: Vec<usize> = text
        .match_indices(BOLD_DELIMITER)
        .map(|(pos, _)| pos)
        .collect();
    let paired = delimiters.len() - delimiters.len() % 2;

    let mut segments = Vec::new();
    let mut bold = false;
    let mut start = 0;
    for &pos in &delimiters[..paired] {
        push_runs(&mut segments, &text[start..pos], bold);
        bold = !bold;
        start = pos + BOLD_DELIMITER.len();
    }
    push_runs(&mut segments, &text[start..], bold);
    segments
}

fn push_runs(segments: &mut Vec<StyledSegment>, text: &str, bold: bool) {
    segments.extend(word_runs(text).map(|(run, _)| StyledSegment::new(run, bold)));
}

/// Alternating runs of non-whitespace and whitespace, with a flag that is true
/// for whitespace runs.
pub(crate) fn word_runs(text: &str) -> impl Iterator<Item = (&str, bool)> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let is_ws = first.is_whitespace();
        let end = rest
            .char_indices()
            .find(|&(_, c)| c.is_whitespace() != is_ws)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some((run, is_ws))
    })
}
