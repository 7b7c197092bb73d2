use crate::model::{Page, PageGeometry};

/// Where a reserved block goes: 1-based page number and the y of its top edge
/// (the text baseline for text lines).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub page: u32,
    pub y: f32,
}

/// Owns the vertical cursor and the page list for one conversion.
pub struct Paginator {
    geometry: PageGeometry,
    finished: Vec<Page>,
    current: Page,
}

impl Paginator {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            finished: Vec::new(),
            current: Page {
                index: 1,
                cursor_y: geometry.margin,
            },
        }
    }

    pub fn page(&self) -> u32 {
        self.current.index
    }

    pub fn cursor_y(&self) -> f32 {
        self.current.cursor_y
    }

    pub fn at_page_top(&self) -> bool {
        (self.current.cursor_y - self.geometry.margin).abs() < 0.01
    }

    /// Claim `height` of vertical space, breaking to a new page first when it
    /// does not fit above the bottom margin.
    pub fn reserve(&mut self, height: f32) -> Placement {
        self.ensure(height);
        let placement = Placement {
            page: self.current.index,
            y: self.current.cursor_y,
        };
        self.current.cursor_y += height;
        placement
    }

    /// Break to a new page unless `height` still fits; the cursor does not move.
    /// A fresh page always accepts the block, however tall.
    pub fn ensure(&mut self, height: f32) {
        if self.current.cursor_y + height > self.geometry.printable_bottom() && !self.at_page_top() {
            self.new_page();
        }
    }

    pub fn advance(&mut self, dy: f32) {
        self.current.cursor_y += dy;
    }

    pub fn new_page(&mut self) {
        log::debug!(
            "Page {} full at y={:.1}mm, starting page {}",
            self.current.index,
            self.current.cursor_y,
            self.current.index + 1
        );
        let next = Page {
            index: self.current.index + 1,
            cursor_y: self.geometry.margin,
        };
        self.finished.push(std::mem::replace(&mut self.current, next));
    }

    pub fn finish(mut self) -> Vec<Page> {
        self.finished.push(self.current);
        self.finished
    }
}
