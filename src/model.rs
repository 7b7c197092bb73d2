/// One classified unit of resume input.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Name(String),
    /// The line(s) between the name and the first section header.
    Headline(String),
    /// Canonical, uppercased section name (e.g. `SUMMARY`).
    SectionHeader(String),
    /// `### Title | Date`; the right part is right-aligned on the same baseline.
    SubsectionHeader {
        left: String,
        right: Option<String>,
    },
    Bullet(String),
    ContactLine(String),
    /// Body text; may contain `**bold**` markup.
    Paragraph(String),
    Blank,
}

impl Block {
    /// Visible text of the block with emphasis delimiters removed.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Name(t)
            | Block::Headline(t)
            | Block::SectionHeader(t)
            | Block::Bullet(t)
            | Block::ContactLine(t)
            | Block::Paragraph(t) => t.replace("**", ""),
            Block::SubsectionHeader { left, right } => match right {
                Some(r) => format!("{left} {r}"),
                None => left.clone(),
            },
            Block::Blank => String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StyledSegment {
    pub text: String,
    pub bold: bool,
    /// Hyperlink target; only contact lines set this.
    pub link: Option<String>,
}

impl StyledSegment {
    pub fn new(text: impl Into<String>, bold: bool) -> Self {
        Self {
            text: text.into(),
            bold,
            link: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedSegment {
    pub text: String,
    pub bold: bool,
    pub link: Option<String>,
    pub x_offset: f32, // relative to line start, mm
    pub width: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WrappedLine {
    pub segments: Vec<PlacedSegment>,
    pub font_size: f32, // points
    pub width: f32,     // total advance, mm
    pub line_height: f32,
}

impl WrappedLine {
    /// Line text with a space wherever placed segments leave a gap.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut end: Option<f32> = None;
        for segment in &self.segments {
            if let Some(prev_end) = end
                && segment.x_offset > prev_end + 1e-4
            {
                out.push(' ');
            }
            out.push_str(&segment.text);
            end = Some(segment.x_offset + segment.width);
        }
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Alignment {
    Left,
    Center,
}

/// Page size and margins in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Default for PageGeometry {
    /// A4 portrait with 20mm margins.
    fn default() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin: 20.0,
        }
    }
}

impl PageGeometry {
    pub fn printable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn printable_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }

    /// Lowest y a block may extend to.
    pub fn printable_bottom(&self) -> f32 {
        self.height - self.margin
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Page {
    pub index: u32, // 1-based
    pub cursor_y: f32,
}

/// A drawing primitive in page coordinates (mm, origin top-left, y = baseline for text).
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text {
        page: u32,
        x: f32,
        y: f32,
        text: String,
        bold: bool,
        font_size: f32,
    },
    Rule {
        page: u32,
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
    },
    Link {
        page: u32,
        x: f32,
        y: f32, // top edge
        width: f32,
        height: f32,
        url: String,
    },
}

impl DrawOp {
    pub fn page(&self) -> u32 {
        match self {
            DrawOp::Text { page, .. } | DrawOp::Rule { page, .. } | DrawOp::Link { page, .. } => {
                *page
            }
        }
    }
}

#[derive(Debug)]
pub struct Document {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
    pub ops: Vec<DrawOp>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn ops_on_page(&self, page: u32) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(move |op| op.page() == page)
    }

    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Link { url, .. } => Some(url.as_str()),
            _ => None,
        })
    }

    /// All text runs in emission order.
    pub fn text_runs(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
