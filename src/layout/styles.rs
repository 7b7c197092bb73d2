use crate::model::{Alignment, Block};

/// Gap added for an empty source line.
pub const BLANK_GAP: f32 = 2.0;
/// Offset of a section header's rule below the header baseline.
pub const RULE_OFFSET: f32 = 2.0;
pub const RULE_THICKNESS: f32 = 0.5;
/// Indent of bullet text from the bullet glyph.
pub const BULLET_INDENT: f32 = 5.0;
pub const BULLET_GLYPH: &str = "•";
/// Minimum gap between a subsection title and its right-aligned date.
pub const SUBSECTION_GAP: f32 = 3.0;
/// Link rectangles span from `ascent` above the baseline to `descent` below it,
/// as fractions of the font size.
pub const LINK_ASCENT: f32 = 0.8;
pub const LINK_DESCENT: f32 = 0.2;

/// Typography for one block kind. Lengths in mm, font size in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleProfile {
    pub font_size: f32,
    pub bold: bool,
    pub alignment: Alignment,
    /// Space that must remain on the page before the block starts.
    pub keep_height: f32,
    pub space_before: f32,
    /// Cursor advance per wrapped line.
    pub line_advance: f32,
    /// Cursor advance after the last line, when it differs from `line_advance`.
    pub last_line_advance: f32,
    pub indent: f32,
}

const BODY: StyleProfile = StyleProfile {
    font_size: 10.0,
    bold: false,
    alignment: Alignment::Left,
    keep_height: 5.0,
    space_before: 0.0,
    line_advance: 5.0,
    last_line_advance: 5.0,
    indent: 0.0,
};

pub const NAME: StyleProfile = StyleProfile {
    font_size: 22.0,
    bold: true,
    alignment: Alignment::Center,
    keep_height: 15.0,
    line_advance: 6.0,
    last_line_advance: 6.0,
    ..BODY
};

pub const HEADLINE: StyleProfile = StyleProfile {
    font_size: 11.0,
    bold: true,
    alignment: Alignment::Center,
    keep_height: 6.0,
    line_advance: 6.0,
    last_line_advance: 6.0,
    ..BODY
};

pub const CONTACT: StyleProfile = StyleProfile {
    alignment: Alignment::Center,
    ..BODY
};

pub const SECTION_HEADER: StyleProfile = StyleProfile {
    font_size: 11.0,
    bold: true,
    keep_height: 15.0,
    last_line_advance: 8.0,
    ..BODY
};

pub const SUBSECTION_HEADER: StyleProfile = StyleProfile {
    font_size: 10.5,
    bold: true,
    keep_height: 8.0,
    space_before: 2.0,
    ..BODY
};

pub const BULLET: StyleProfile = StyleProfile {
    font_size: 9.5,
    indent: BULLET_INDENT,
    ..BODY
};

pub const PARAGRAPH: StyleProfile = BODY;

/// Style for a block; `None` for blocks that draw nothing.
pub fn profile_for(block: &Block) -> Option<StyleProfile> {
    Some(match block {
        Block::Name(_) => NAME,
        Block::Headline(_) => HEADLINE,
        Block::ContactLine(_) => CONTACT,
        Block::SectionHeader(_) => SECTION_HEADER,
        Block::SubsectionHeader { .. } => SUBSECTION_HEADER,
        Block::Bullet(_) => BULLET,
        Block::Paragraph(_) => PARAGRAPH,
        Block::Blank => return None,
    })
}
