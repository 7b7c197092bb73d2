use std::sync::LazyLock;

use regex::Regex;

const MAX_CONTACT_CHARS: usize = 200;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._-]+@[a-zA-Z0-9._-]+\.[a-zA-Z0-9._-]+").expect("valid regex")
});

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://\S+|www\.\S+|linkedin\.com/\S+|github\.com/\S+").expect("valid regex")
});

#[derive(Clone, Debug, PartialEq)]
pub struct ContactPart {
    pub text: String,
    pub link: Option<String>,
}

/// Lines with an email address or a LinkedIn/GitHub reference.
pub fn is_contact_like(line: &str) -> bool {
    if line.chars().count() >= MAX_CONTACT_CHARS {
        return false;
    }
    let lower = line.to_lowercase();
    line.contains('@') || lower.contains("linkedin.com") || lower.contains("github.com")
}

/// Bullet glyphs become `|` separators, dashes become `-`, any other non-ASCII
/// character becomes a space; separators are normalised to ` | `.
pub fn normalize(line: &str) -> String {
    let ascii: String = line
        .chars()
        .map(|c| match c {
            '•' | '●' | '▪' => '|',
            '\u{2013}' | '\u{2014}' => '-',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => ' ',
        })
        .collect();
    ascii
        .split('|')
        .map(|part| part.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Link target for one contact part: `mailto:` for an email, otherwise the
/// first URL-looking span with `https://` added when no scheme is present.
pub fn link_target(part: &str) -> Option<String> {
    if let Some(email) = EMAIL.find(part) {
        return Some(format!("mailto:{}", email.as_str()));
    }
    URL.find(part).map(|m| {
        let url = m.as_str();
        if url.to_ascii_lowercase().starts_with("http") {
            url.to_string()
        } else {
            format!("https://{url}")
        }
    })
}

pub fn split_parts(text: &str) -> Vec<ContactPart> {
    text.split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| ContactPart {
            text: part.to_string(),
            link: link_target(part),
        })
        .collect()
}
