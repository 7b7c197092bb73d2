//! Line classification for the resume markdown dialect.
//!
//! Each raw line is classified on its own, with three flags of running state
//! threaded through by value. The rules form an ordered table; the first rule
//! that accepts a line decides its block.

pub mod contact;
pub mod inline;

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::Block;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassifierState {
    pub name_emitted: bool,
    pub first_section_seen: bool,
    pub skipping_section: bool,
}

/// Outcome of one rule: the block to emit (`None` drops the line) and the next state.
pub type Verdict = (Option<Block>, ClassifierState);

type Rule = fn(&str, ClassifierState) -> Option<Verdict>;

/// Section names recognised without a `##` marker.
pub const SECTION_NAMES: &[&str] = &[
    "EXPERIENCE",
    "PROFESSIONAL EXPERIENCE",
    "WORK EXPERIENCE",
    "SUMMARY",
    "PROFILE SUMMARY",
    "PROFESSIONAL SUMMARY",
    "OBJECTIVE",
    "CAREER OBJECTIVE",
    "PROJECTS",
    "SKILLS",
    "TECHNICAL SKILLS",
    "EDUCATION",
    "CERTIFICATIONS",
    "ACHIEVEMENTS",
];

const SUMMARY_ALIASES: &[&str] = &[
    "PROFESSIONAL SUMMARY",
    "PROFILE SUMMARY",
    "OBJECTIVE",
    "CAREER OBJECTIVE",
];

/// Sections whose header and body are left out of the output.
pub const SUPPRESSED_SECTIONS: &[&str] = &["LANGUAGES"];

/// Inline labels that get bolded wherever they appear.
const INLINE_LABELS: &[&str] = &[
    "Programming Languages:",
    "Frameworks and Libraries:",
    "Machine Learning & AI Techniques:",
    "Soft Skills:",
];

const SUMMARY_FALLBACK_MAX_CHARS: usize = 50;
const SUMMARY_FALLBACK_MAX_WORDS: usize = 3;

static CONTACT_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^contact information:*$").expect("valid regex"));

// A colon or whitespace must follow, so `linkedin.com/in/...` is left alone.
static LINKEDIN_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^linkedin(?::+\s*|\s+)").expect("valid regex"));

static INLINE_LABEL_PATTERNS: LazyLock<Vec<(Regex, Regex)>> = LazyLock::new(|| {
    INLINE_LABELS
        .iter()
        .map(|label| {
            let escaped = regex::escape(label);
            (
                Regex::new(&format!("(?i){escaped}")).expect("valid regex"),
                Regex::new(&format!(r"(?i)\*\*{escaped}")).expect("valid regex"),
            )
        })
        .collect()
});

static RULES: &[(&str, Rule)] = &[
    ("contact-label", contact_label),
    ("suppressed-section", suppressed_section),
    ("section-header", section_header),
    ("summary-fallback", summary_fallback),
    ("skipped-body", skipped_body),
    ("contact-line", contact_line),
    ("name", name),
    ("headline", headline),
    ("subsection-header", subsection_header),
    ("bullet", bullet),
    ("bold-line", bold_line),
];

/// Classify one line given the running state. Returns the block for the line,
/// if any, and the state to use for the next line.
pub fn classify(line: &str, state: ClassifierState) -> Verdict {
    let line = line.trim();
    if line.is_empty() {
        return (Some(Block::Blank), state);
    }
    let line = prepare(line);
    if line.is_empty() {
        return (None, state);
    }

    RULES
        .iter()
        .find_map(|(rule_name, rule)| {
            rule(&line, state).inspect(|(block, _)| {
                log::trace!("{rule_name}: {line:?} → {block:?}");
            })
        })
        .unwrap_or_else(|| (Some(Block::Paragraph(line.into_owned())), state))
}

/// Strip a leading `LinkedIn:` label and bold the known inline labels.
fn prepare(line: &str) -> Cow<'_, str> {
    let mut line = match LINKEDIN_LABEL.find(line) {
        Some(m) => Cow::Borrowed(line[m.end()..].trim_start()),
        None => Cow::Borrowed(line),
    };
    for (label, bolded) in INLINE_LABEL_PATTERNS.iter() {
        if label.is_match(&line) && !bolded.is_match(&line) {
            line = Cow::Owned(label.replace_all(&line, "**$0**").into_owned());
        }
    }
    line
}

fn letters_upper(line: &str) -> String {
    line.chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Header text with markup removed: no `*`, `:` or `#`, single spaces, uppercase.
pub fn clean_header(line: &str) -> String {
    line.chars()
        .filter(|c| !matches!(c, '*' | ':' | '#'))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn canonical_section(cleaned: String) -> String {
    if SUMMARY_ALIASES.contains(&cleaned.as_str()) {
        "SUMMARY".to_string()
    } else {
        cleaned
    }
}

fn enter_section(header: String, state: ClassifierState) -> Verdict {
    let next = ClassifierState {
        first_section_seen: true,
        skipping_section: false,
        ..state
    };
    (Some(Block::SectionHeader(header)), next)
}

fn strip_bold(text: &str) -> String {
    text.replace("**", "").trim().to_string()
}

fn bullet_body(line: &str) -> Option<&str> {
    let mut chars = line.chars();
    let body = match chars.next()? {
        '-' | '•' => chars.as_str(),
        '*' if !line.starts_with("**") => chars.as_str(),
        _ => return None,
    };
    let body = body.trim_start();
    (!body.is_empty()).then_some(body)
}

fn contact_label(line: &str, state: ClassifierState) -> Option<Verdict> {
    CONTACT_LABEL.is_match(line).then_some((None, state))
}

fn suppressed_section(line: &str, state: ClassifierState) -> Option<Verdict> {
    let letters = letters_upper(line);
    SUPPRESSED_SECTIONS.contains(&letters.as_str()).then(|| {
        let next = ClassifierState {
            skipping_section: true,
            ..state
        };
        (None, next)
    })
}

fn section_header(line: &str, state: ClassifierState) -> Option<Verdict> {
    let cleaned = clean_header(line);
    if cleaned.is_empty() {
        return None;
    }
    let is_heading = line.starts_with("## ");
    if !is_heading && !SECTION_NAMES.contains(&cleaned.as_str()) {
        return None;
    }
    Some(enter_section(canonical_section(cleaned), state))
}

/// Short header-like lines ending in SUMMARY or OBJECTIVE ("Executive Summary",
/// "My Objective:") count as the summary header. Body text never matches.
fn summary_fallback(line: &str, state: ClassifierState) -> Option<Verdict> {
    if line.chars().count() >= SUMMARY_FALLBACK_MAX_CHARS
        || line.contains('|')
        || line.starts_with("###")
        || bullet_body(line).is_some()
        || contact::is_contact_like(line)
    {
        return None;
    }
    let cleaned = clean_header(line);
    let words: Vec<&str> = cleaned.split(' ').collect();
    let last = *words.last()?;
    (words.len() <= SUMMARY_FALLBACK_MAX_WORDS && matches!(last, "SUMMARY" | "OBJECTIVE"))
        .then(|| enter_section("SUMMARY".to_string(), state))
}

fn skipped_body(_line: &str, state: ClassifierState) -> Option<Verdict> {
    state.skipping_section.then_some((None, state))
}

fn contact_line(line: &str, state: ClassifierState) -> Option<Verdict> {
    contact::is_contact_like(line)
        .then(|| (Some(Block::ContactLine(contact::normalize(line))), state))
}

fn name(line: &str, state: ClassifierState) -> Option<Verdict> {
    if state.name_emitted {
        return None;
    }
    let text = strip_bold(line.trim_start_matches('#'));
    if text.is_empty() {
        return Some((None, state));
    }
    let next = ClassifierState {
        name_emitted: true,
        ..state
    };
    Some((Some(Block::Name(text)), next))
}

fn headline(line: &str, state: ClassifierState) -> Option<Verdict> {
    if state.first_section_seen {
        return None;
    }
    let text = strip_bold(line.trim_start_matches('#'));
    Some(((!text.is_empty()).then_some(Block::Headline(text)), state))
}

fn subsection_header(line: &str, state: ClassifierState) -> Option<Verdict> {
    let rest = line.strip_prefix("### ")?;
    let block = match rest.split_once('|') {
        Some((left, right)) => {
            let right = strip_bold(right);
            Block::SubsectionHeader {
                left: strip_bold(left),
                right: (!right.is_empty()).then_some(right),
            }
        }
        None => Block::SubsectionHeader {
            left: strip_bold(rest),
            right: None,
        },
    };
    Some((Some(block), state))
}

fn bullet(line: &str, state: ClassifierState) -> Option<Verdict> {
    bullet_body(line).map(|body| (Some(Block::Bullet(body.to_string())), state))
}

fn bold_line(line: &str, state: ClassifierState) -> Option<Verdict> {
    if line.len() < 4 || !line.starts_with("**") || !line.ends_with("**") {
        return None;
    }
    let inner = strip_bold(line);
    if inner.is_empty() {
        return Some((None, state));
    }
    Some((Some(Block::Paragraph(format!("**{inner}**"))), state))
}

/// Feeds lines through the classifier in order, collecting the emitted blocks.
#[derive(Default)]
pub struct SectionNormalizer {
    state: ClassifierState,
    blocks: Vec<Block>,
}

impl SectionNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) {
        let (block, next) = classify(line, self.state);
        self.state = next;
        if let Some(block) = block {
            self.blocks.push(block);
        }
    }

    pub fn state(&self) -> ClassifierState {
        self.state
    }

    pub fn finish(self) -> Vec<Block> {
        self.blocks
    }
}

pub fn parse(text: &str) -> Vec<Block> {
    let mut normalizer = SectionNormalizer::new();
    for line in text.lines() {
        normalizer.push_line(line);
    }
    let blocks = normalizer.finish();
    log::debug!("Classified {} lines into {} blocks", text.lines().count(), blocks.len());
    blocks
}

/// Write blocks back out in the input dialect. Parsing the result yields the
/// same blocks again.
pub fn to_markdown(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|block| match block {
            Block::Name(t) => format!("# {t}"),
            Block::Headline(t) | Block::ContactLine(t) | Block::Paragraph(t) => t.clone(),
            Block::SectionHeader(t) => format!("## {t}"),
            Block::SubsectionHeader { left, right: Some(r) } => format!("### {left} | {r}"),
            Block::SubsectionHeader { left, right: None } => format!("### {left}"),
            Block::Bullet(t) => format!("- {t}"),
            Block::Blank => String::new(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
