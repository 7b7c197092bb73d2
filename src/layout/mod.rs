//! Places classified blocks on fixed-size pages.

pub mod flow;
pub mod pages;
pub mod styles;

use crate::error::Error;
use crate::fonts::{FontMetrics, PT_TO_MM};
use crate::markdown::contact;
use crate::markdown::inline::tokenize;
use crate::model::{Alignment, Block, DrawOp, Document, PageGeometry, StyledSegment, WrappedLine};

use flow::wrap;
use pages::{Paginator, Placement};
use styles::{StyleProfile, profile_for};

#[derive(Clone, Copy, Debug, Default)]
pub struct LayoutOptions {
    pub geometry: PageGeometry,
}

/// Lay out `blocks` in order and return the finished document.
pub fn render(
    blocks: &[Block],
    options: &LayoutOptions,
    metrics: &dyn FontMetrics,
) -> Result<Document, Error> {
    let geometry = options.geometry;
    let mut renderer = Renderer {
        geometry,
        metrics,
        pages: Paginator::new(geometry),
        ops: Vec::new(),
    };
    for block in blocks {
        renderer.block(block)?;
    }
    Ok(Document {
        geometry,
        pages: renderer.pages.finish(),
        ops: renderer.ops,
    })
}

struct Renderer<'a> {
    geometry: PageGeometry,
    metrics: &'a dyn FontMetrics,
    pages: Paginator,
    ops: Vec<DrawOp>,
}

/// Tokenize `text`, forcing bold when the block style is bold.
fn styled(text: &str, profile: &StyleProfile) -> Vec<StyledSegment> {
    let mut segments = tokenize(text);
    if profile.bold {
        for segment in &mut segments {
            segment.bold = true;
        }
    }
    segments
}

fn contact_segments(text: &str) -> Vec<StyledSegment> {
    let mut segments = Vec::new();
    for (i, part) in contact::split_parts(text).into_iter().enumerate() {
        if i > 0 {
            segments.push(StyledSegment::new(" ", false));
            segments.push(StyledSegment::new("|", false));
            segments.push(StyledSegment::new(" ", false));
        }
        if part.link.is_none() && contact::is_contact_like(&part.text) {
            log::warn!("No link target recognized in contact part {:?}", part.text);
        }
        segments.push(StyledSegment {
            text: part.text,
            bold: false,
            link: part.link,
        });
    }
    segments
}

impl Renderer<'_> {
    fn block(&mut self, block: &Block) -> Result<(), Error> {
        let Some(profile) = profile_for(block) else {
            self.pages.advance(styles::BLANK_GAP);
            return Ok(());
        };
        self.pages.ensure(profile.keep_height);
        self.pages.advance(profile.space_before);
        let start_page = self.pages.page();

        match block {
            Block::Name(text) | Block::Headline(text) | Block::Paragraph(text) => {
                self.text_block(styled(text, &profile), &profile)?;
            }
            Block::ContactLine(text) => {
                self.text_block(contact_segments(text), &profile)?;
            }
            Block::SectionHeader(title) => {
                if let Some(last) = self.text_block(styled(title, &profile), &profile)? {
                    self.ops.push(DrawOp::Rule {
                        page: last.page,
                        x1: self.geometry.margin,
                        x2: self.geometry.width - self.geometry.margin,
                        y: last.y + styles::RULE_OFFSET,
                        thickness: styles::RULE_THICKNESS,
                    });
                }
            }
            Block::SubsectionHeader { left, right } => {
                self.subsection(left, right.as_deref(), &profile)?;
            }
            Block::Bullet(text) => {
                self.bullet(text, &profile)?;
            }
            Block::Blank => {}
        }

        if self.pages.page() != start_page {
            log::debug!("{block:?} continued onto page {}", self.pages.page());
        }
        Ok(())
    }

    /// Wrap and place a block's text at the profile's indent and alignment.
    /// Returns the placement of the last line.
    fn text_block(
        &mut self,
        segments: Vec<StyledSegment>,
        profile: &StyleProfile,
    ) -> Result<Option<Placement>, Error> {
        let x = self.geometry.margin + profile.indent;
        let width = self.geometry.printable_width() - profile.indent;
        let lines = wrap(&segments, width, profile.font_size, profile.line_advance, self.metrics)?;
        let mut last = None;
        let count = lines.len();
        for (i, line) in lines.iter().enumerate() {
            let advance = if i + 1 == count {
                profile.last_line_advance
            } else {
                profile.line_advance
            };
            last = Some(self.place_line(line, x, width, profile.alignment, advance));
        }
        Ok(last)
    }

    fn bullet(&mut self, text: &str, profile: &StyleProfile) -> Result<(), Error> {
        let segments = styled(text, profile);
        let x = self.geometry.margin + profile.indent;
        let width = self.geometry.printable_width() - profile.indent;
        let lines = wrap(&segments, width, profile.font_size, profile.line_advance, self.metrics)?;
        for (i, line) in lines.iter().enumerate() {
            let placement = self.place_line(line, x, width, profile.alignment, profile.line_advance);
            if i == 0 {
                self.ops.push(DrawOp::Text {
                    page: placement.page,
                    x: self.geometry.margin,
                    y: placement.y,
                    text: styles::BULLET_GLYPH.to_string(),
                    bold: false,
                    font_size: profile.font_size,
                });
            }
        }
        Ok(())
    }

    /// Title on the left, optional date right-aligned to the printable edge on
    /// the first line's baseline. The title wraps in the space the date leaves.
    fn subsection(
        &mut self,
        left: &str,
        right: Option<&str>,
        profile: &StyleProfile,
    ) -> Result<(), Error> {
        let x = self.geometry.margin;
        let right_w = match right {
            Some(r) => self.metrics.text_width(r, true, profile.font_size)?,
            None => 0.0,
        };
        let left_width = if right.is_some() {
            (self.geometry.printable_width() - right_w - styles::SUBSECTION_GAP).max(0.0)
        } else {
            self.geometry.printable_width()
        };
        let lines = wrap(
            &styled(left, profile),
            left_width,
            profile.font_size,
            profile.line_advance,
            self.metrics,
        )?;

        let mut first = None;
        for line in &lines {
            let placement = self.place_line(line, x, left_width, Alignment::Left, profile.line_advance);
            first.get_or_insert(placement);
        }

        if let Some(r) = right {
            let placement = match first {
                Some(p) => p,
                None => self.pages.reserve(profile.line_advance),
            };
            let right_edge = self.geometry.width - self.geometry.margin;
            self.ops.push(DrawOp::Text {
                page: placement.page,
                x: (right_edge - right_w).max(x),
                y: placement.y,
                text: r.to_string(),
                bold: true,
                font_size: profile.font_size,
            });
        }
        Ok(())
    }

    fn place_line(
        &mut self,
        line: &WrappedLine,
        x: f32,
        width: f32,
        alignment: Alignment,
        advance: f32,
    ) -> Placement {
        let placement = self.pages.reserve(advance);
        let line_x = match alignment {
            Alignment::Left => x,
            Alignment::Center => x + ((width - line.width) / 2.0).max(0.0),
        };

        let font_mm = line.font_size * PT_TO_MM;
        // Index of the link op covering the previous word, while words keep the same target.
        let mut open_link: Option<usize> = None;
        for segment in &line.segments {
            let seg_x = line_x + segment.x_offset;
            self.ops.push(DrawOp::Text {
                page: placement.page,
                x: seg_x,
                y: placement.y,
                text: segment.text.clone(),
                bold: segment.bold,
                font_size: line.font_size,
            });

            let Some(url) = &segment.link else {
                open_link = None;
                continue;
            };
            if let Some(DrawOp::Link { x, width, url: prev, .. }) =
                open_link.and_then(|i| self.ops.get_mut(i))
                && *prev == *url
            {
                *width = seg_x + segment.width - *x;
                continue;
            }
            open_link = Some(self.ops.len());
            self.ops.push(DrawOp::Link {
                page: placement.page,
                x: seg_x,
                y: placement.y - font_mm * styles::LINK_ASCENT,
                width: segment.width,
                height: font_mm * (styles::LINK_ASCENT + styles::LINK_DESCENT),
                url: url.clone(),
            });
        }
        placement
    }
}
