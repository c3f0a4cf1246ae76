use crate::config::{PageGeometry, ReportConfig};
use crate::fonts::{FontRole, FontSet};
use crate::model::Language;
use crate::sanitize::ELLIPSIS;
use crate::text::{self, Direction};

use super::{Color, DrawInstruction, Page, Paginator, TextItem};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    /// The edge a string of this direction starts from.
    pub fn start_of(direction: Direction) -> Self {
        match direction {
            Direction::Ltr => Align::Left,
            Direction::Rtl => Align::Right,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Align::Left => Align::Right,
            Align::Center => Align::Center,
            Align::Right => Align::Left,
        }
    }
}

/// The vote table's fixed columns, in semantic order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Phone,
    Answer,
    Date,
}

impl Column {
    pub const ALL: [Column; 4] = [Column::Name, Column::Phone, Column::Answer, Column::Date];

    /// Fixed width in points, the same in either direction.
    pub fn width(self) -> f32 {
        match self {
            Column::Name => 160.0,
            Column::Phone => 110.0,
            Column::Answer => 82.0,
            Column::Date => 160.0,
        }
    }
}

/// Direction policy chosen once per render. Renderers ask it for ordering
/// and alignment instead of testing the language themselves.
pub trait WritingSystem: Send + Sync {
    fn direction(&self) -> Direction;

    fn column_order(&self, columns: &[Column]) -> Vec<Column>;

    /// Edge that headings and paragraph text align to.
    fn align(&self) -> Align;

    /// Physical x of a box laid out at `x` in left-to-right terms.
    fn mirror_x(&self, x: f32, width: f32) -> f32;
}

#[derive(Debug, Default)]
pub struct LeftToRight;

impl WritingSystem for LeftToRight {
    fn direction(&self) -> Direction {
        Direction::Ltr
    }

    fn column_order(&self, columns: &[Column]) -> Vec<Column> {
        columns.to_vec()
    }

    fn align(&self) -> Align {
        Align::Left
    }

    fn mirror_x(&self, x: f32, _width: f32) -> f32 {
        x
    }
}

/// Mirrors boxes inside the content area, so unequal margins stay put.
#[derive(Debug)]
pub struct RightToLeft {
    content_left: f32,
    content_right: f32,
}

impl RightToLeft {
    pub fn new(geometry: &PageGeometry) -> Self {
        Self {
            content_left: geometry.margin_left,
            content_right: geometry.width - geometry.margin_right,
        }
    }
}

impl WritingSystem for RightToLeft {
    fn direction(&self) -> Direction {
        Direction::Rtl
    }

    fn column_order(&self, columns: &[Column]) -> Vec<Column> {
        columns.iter().rev().copied().collect()
    }

    fn align(&self) -> Align {
        Align::Right
    }

    fn mirror_x(&self, x: f32, width: f32) -> f32 {
        self.content_left + self.content_right - x - width
    }
}

pub fn writing_system(language: Language, geometry: &PageGeometry) -> Box<dyn WritingSystem> {
    match language {
        Language::En => Box::new(LeftToRight),
        Language::Ar => Box::new(RightToLeft::new(geometry)),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub color: Color,
}

impl TextStyle {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            bold: false,
            color: Color::BLACK,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Geometry, cursor and page state for a single render call.
///
/// The cursor is the distance below the top margin of the current page. It
/// only moves down within a page and returns to zero at a page break.
pub struct LayoutContext<'a> {
    config: &'a ReportConfig,
    fonts: &'a FontSet,
    writing: Box<dyn WritingSystem>,
    cursor: f32,
    current: Vec<DrawInstruction>,
    paginator: Paginator,
}

impl<'a> LayoutContext<'a> {
    pub fn new(config: &'a ReportConfig, fonts: &'a FontSet, language: Language) -> Self {
        Self {
            config,
            fonts,
            writing: writing_system(language, &config.page),
            cursor: 0.0,
            current: Vec::new(),
            paginator: Paginator::new(),
        }
    }

    pub fn config(&self) -> &ReportConfig {
        self.config
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.config.page
    }

    pub fn fonts(&self) -> &FontSet {
        self.fonts
    }

    pub fn writing(&self) -> &dyn WritingSystem {
        self.writing.as_ref()
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    /// 0-based index of the page being filled.
    pub fn page_index(&self) -> usize {
        self.paginator.completed_pages()
    }

    pub fn usable_height(&self) -> f32 {
        self.config.page.usable_height()
    }

    pub fn content_width(&self) -> f32 {
        self.config.page.content_width()
    }

    pub fn fits(&self, height: f32) -> bool {
        !Paginator::needs_break(self.cursor, height, self.usable_height())
    }

    /// Break the page if `height` does not fit below the cursor. An item at
    /// the top of an empty page is placed regardless. Returns whether a
    /// break happened.
    pub fn ensure_room(&mut self, height: f32) -> bool {
        if self.fits(height) || self.cursor <= 0.0 {
            return false;
        }
        self.break_page();
        true
    }

    pub fn break_page(&mut self) {
        self.paginator.close_page(std::mem::take(&mut self.current));
        self.cursor = 0.0;
    }

    pub fn advance(&mut self, dy: f32) -> f32 {
        self.cursor += dy.max(0.0);
        self.cursor
    }

    pub fn push(&mut self, instruction: DrawInstruction) {
        self.current.push(instruction);
    }

    /// Absolute page y of a point `offset` below the cursor.
    fn y_at(&self, offset: f32) -> f32 {
        self.config.page.margin_top + self.cursor + offset
    }

    /// Physical x of a box `width` wide that starts `offset` points from the
    /// writing direction's start edge of the content area.
    pub fn box_x(&self, offset: f32, width: f32) -> f32 {
        self.writing
            .mirror_x(self.config.page.margin_left + offset, width)
    }

    /// Physical x of a box centered in the content area.
    pub fn centered_x(&self, width: f32) -> f32 {
        self.config.page.margin_left + (self.content_width() - width) / 2.0
    }

    pub fn fill_rect(&mut self, x: f32, offset: f32, width: f32, height: f32, fill: Color) {
        let y = self.y_at(offset);
        self.push(DrawInstruction::Rect {
            x,
            y,
            width,
            height,
            fill,
        });
    }

    /// Horizontal rule across the content area, `offset` below the cursor.
    pub fn rule(&mut self, offset: f32, width: f32, color: Color) {
        let y = self.y_at(offset);
        let x1 = self.config.page.margin_left;
        let x2 = x1 + self.content_width();
        self.push(DrawInstruction::Line {
            x1,
            y1: y,
            x2,
            y2: y,
            width,
            color,
        });
    }

    /// Shorten `text` (logical order) until its shaped form fits `max_width`.
    pub fn fit_text(&self, text: &str, style: TextStyle, max_width: f32) -> String {
        let role = self.fonts.select(text, style.bold);
        let measure = |s: &str| {
            self.fonts
                .text_width(role, &text::prepare(s).visual, style.size)
        };
        if measure(text) <= max_width {
            return text.to_string();
        }
        let chars: Vec<char> = text.chars().collect();
        let (mut lo, mut hi) = (0usize, chars.len());
        while lo < hi {
            let mid = (lo + hi).div_ceil(2);
            let candidate: String = chars[..mid].iter().collect::<String>() + ELLIPSIS;
            if measure(&candidate) <= max_width {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        let kept: String = chars[..lo].iter().collect();
        kept.trim_end().to_string() + ELLIPSIS
    }

    /// Build a text instruction inside the box `[x, x + width]` with its
    /// baseline at absolute `baseline`. RTL strings are shaped and reordered.
    pub fn text_instruction(
        &self,
        text: &str,
        style: TextStyle,
        x: f32,
        width: f32,
        align: Align,
        baseline: f32,
    ) -> DrawInstruction {
        let fitted = self.fit_text(text, style, width);
        let role: FontRole = self.fonts.select(&fitted, style.bold);
        let prepared = text::prepare(&fitted);
        let text_w = self.fonts.text_width(role, &prepared.visual, style.size);
        let start = match align {
            Align::Left => x,
            Align::Center => x + (width - text_w) / 2.0,
            Align::Right => x + width - text_w,
        };
        DrawInstruction::Text(TextItem {
            x: start,
            baseline,
            text: prepared.visual,
            font: role,
            size: style.size,
            color: style.color,
            direction: prepared.direction,
            width: text_w,
        })
    }

    /// Baseline for text of `style` vertically centered in a line box of
    /// `line_height` whose top is `offset` below the cursor.
    fn baseline_in(&self, text: &str, style: TextStyle, offset: f32, line_height: f32) -> f32 {
        let role = self.fonts.select(text, style.bold);
        let ascender = self.fonts.face(role).ascender_ratio();
        self.y_at(offset) + (line_height - style.size) / 2.0 + style.size * ascender
    }

    /// Place `text` in a line box `offset` below the cursor. Does not move the cursor.
    pub fn text(
        &mut self,
        text: &str,
        style: TextStyle,
        x: f32,
        width: f32,
        align: Align,
        offset: f32,
        line_height: f32,
    ) {
        if text.is_empty() {
            return;
        }
        let baseline = self.baseline_in(text, style, offset, line_height);
        let instruction = self.text_instruction(text, style, x, width, align, baseline);
        self.push(instruction);
    }

    /// A full-width line of paragraph text aligned per the writing direction,
    /// then advance past it.
    pub fn paragraph_line(&mut self, text: &str, style: TextStyle, line_height: f32) -> f32 {
        self.ensure_room(line_height);
        let x = self.config.page.margin_left;
        let width = self.content_width();
        let align = self.writing.align();
        self.text(text, style, x, width, align, 0.0, line_height);
        self.advance(line_height)
    }

    /// Rule separating the footer from page content, just below the usable area.
    pub fn footer_rule(&self, color: Color) -> DrawInstruction {
        let page = &self.config.page;
        let y = page.height - page.margin_bottom + 10.0;
        DrawInstruction::Line {
            x1: page.margin_left,
            y1: y,
            x2: page.margin_left + self.content_width(),
            y2: y,
            width: 0.5,
            color,
        }
    }

    /// Baseline of footer text, inside the bottom margin.
    pub fn footer_baseline(&self, style: TextStyle) -> f32 {
        let page = &self.config.page;
        page.height - page.margin_bottom / 2.0 + style.size / 2.0
    }

    /// End layout: close the last page, number all pages and let `footer`
    /// add instructions for each (page number, page count).
    pub fn finish(
        mut self,
        mut footer: impl FnMut(&LayoutContext<'a>, usize, usize) -> Vec<DrawInstruction>,
    ) -> Vec<Page> {
        let mut paginator = std::mem::take(&mut self.paginator);
        let last = std::mem::take(&mut self.current);
        paginator.finalize(last, |n, total| footer(&self, n, total))
    }
}
