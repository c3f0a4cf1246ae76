use super::{DrawInstruction, Page};

/// Slack for accumulated float error when comparing against the page bottom.
const FIT_EPSILON: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaginatorState {
    /// Content is still being laid out; pages close as the cursor overflows.
    Accumulating,
    /// Every page is known, numbered and footed. No further content.
    Finalized,
}

/// Collects finished pages and runs the numbering pass once layout is done.
#[derive(Debug)]
pub struct Paginator {
    pages: Vec<Page>,
    state: PaginatorState,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new()
    }
}

impl Paginator {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            state: PaginatorState::Accumulating,
        }
    }

    pub fn state(&self) -> PaginatorState {
        self.state
    }

    /// True when an item of `height` placed at `cursor` would cross the bottom
    /// of the usable area.
    pub fn needs_break(cursor: f32, height: f32, usable_height: f32) -> bool {
        cursor + height > usable_height + FIT_EPSILON
    }

    pub fn completed_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn close_page(&mut self, instructions: Vec<DrawInstruction>) {
        debug_assert_eq!(self.state, PaginatorState::Accumulating);
        log::debug!(
            "PAGE_BREAK page={} instructions={}",
            self.pages.len() + 1,
            instructions.len()
        );
        self.pages.push(Page {
            number: None,
            instructions,
        });
    }

    /// Close the last page, then number every page and append what `footer`
    /// returns for (page number, page count).
    pub fn finalize(
        &mut self,
        last: Vec<DrawInstruction>,
        mut footer: impl FnMut(usize, usize) -> Vec<DrawInstruction>,
    ) -> Vec<Page> {
        self.close_page(last);
        self.state = PaginatorState::Finalized;
        let total = self.pages.len();
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.number = Some(i + 1);
            page.instructions.extend(footer(i + 1, total));
        }
        std::mem::take(&mut self.pages)
    }
}
