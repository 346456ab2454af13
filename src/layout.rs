//! Document Layout - Story to Pages
//!
//! Places a story of flowables (paragraphs, spacers, tables) onto fixed-size
//! pages. Wrapping and pagination live here and nowhere else; callers only
//! describe content.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::fonts::Font;

pub const POINTS_PER_INCH: f32 = 72.0;

pub fn inches(value: f32) -> f32 {
    value * POINTS_PER_INCH
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::gray(0.0);
    pub const GREY: Color = Color::gray(0.5);
    pub const WHITESMOKE: Color = Color::gray(0.96);

    pub const fn gray(level: f32) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
        }
    }
}

/// Physical page and frame geometry, in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub left_margin: f32,
    pub right_margin: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub frame_padding: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

impl PageGeometry {
    /// US Letter, 1in side margins, 0.5in top and bottom
    pub fn letter() -> Self {
        Self {
            width: inches(8.5),
            height: inches(11.0),
            left_margin: inches(1.0),
            right_margin: inches(1.0),
            top_margin: inches(0.5),
            bottom_margin: inches(0.5),
            frame_padding: 6.0,
        }
    }

    /// Custom geometry, rejected if no printable frame is left
    pub fn new(
        width: f32,
        height: f32,
        horizontal_margin: f32,
        vertical_margin: f32,
    ) -> Result<Self, &'static str> {
        let geometry = Self {
            width,
            height,
            left_margin: horizontal_margin,
            right_margin: horizontal_margin,
            top_margin: vertical_margin,
            bottom_margin: vertical_margin,
            frame_padding: 6.0,
        };
        if !(width > 0.0 && height > 0.0) || horizontal_margin < 0.0 || vertical_margin < 0.0 {
            return Err("Page size must be positive and margins non-negative");
        }
        if geometry.frame_width() <= 0.0 || geometry.frame_top() <= geometry.frame_bottom() {
            return Err("Margins leave no printable frame");
        }
        Ok(geometry)
    }

    pub fn frame_left(&self) -> f32 {
        self.left_margin + self.frame_padding
    }

    pub fn frame_width(&self) -> f32 {
        self.width - self.left_margin - self.right_margin - 2.0 * self.frame_padding
    }

    pub fn frame_top(&self) -> f32 {
        self.height - self.top_margin - self.frame_padding
    }

    pub fn frame_bottom(&self) -> f32 {
        self.bottom_margin + self.frame_padding
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    pub font: Font,
    pub size: f32,
    pub leading: f32,
    pub align: Align,
    pub space_before: f32,
    pub space_after: f32,
    pub color: Color,
}

impl ParagraphStyle {
    pub fn title() -> Self {
        Self {
            font: Font::HelveticaBold,
            size: 18.0,
            leading: 22.0,
            align: Align::Center,
            space_before: 0.0,
            space_after: 6.0,
            color: Color::BLACK,
        }
    }

    pub fn heading2() -> Self {
        Self {
            font: Font::HelveticaBold,
            size: 14.0,
            leading: 18.0,
            align: Align::Left,
            space_before: 12.0,
            space_after: 6.0,
            color: Color::BLACK,
        }
    }

    pub fn body() -> Self {
        Self {
            font: Font::Helvetica,
            size: 10.0,
            leading: 12.0,
            align: Align::Left,
            space_before: 0.0,
            space_after: 0.0,
            color: Color::BLACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub style: ParagraphStyle,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, style: ParagraphStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Lines drawn around every cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub weight: f32,
    pub color: Color,
}

/// Styling applied to the first row of a table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeaderStyle {
    pub background: Color,
    pub text_color: Color,
}

const CELL_PADDING_X: f32 = 6.0;
const CELL_PADDING_Y: f32 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub col_widths: Vec<f32>,
    pub rows: Vec<Vec<String>>,
    pub grid: Option<Grid>,
    pub header: Option<HeaderStyle>,
    pub cell_style: ParagraphStyle,
}

impl Table {
    pub fn new(col_widths: Vec<f32>) -> Self {
        Self {
            col_widths,
            rows: vec![],
            grid: None,
            header: None,
            cell_style: ParagraphStyle::body(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_grid(mut self, weight: f32, color: Color) -> Self {
        self.grid = Some(Grid { weight, color });
        self
    }

    pub fn with_header(mut self, background: Color, text_color: Color) -> Self {
        self.header = Some(HeaderStyle {
            background,
            text_color,
        });
        self
    }

    pub fn width(&self) -> f32 {
        self.col_widths.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Flowable {
    Paragraph(Paragraph),
    Spacer(f32),
    Table(Table),
}

/// A positioned drawing primitive; coordinates are PDF user space (origin bottom-left)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    Text {
        font: Font,
        size: f32,
        x: f32,
        y: f32,
        color: Color,
        text: String,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Color,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Text runs in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Greedy word wrap. Words wider than `max_width` are broken between characters.
pub fn wrap_text(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = vec![];
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if font.text_width(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if font.text_width(word, size) <= max_width {
            current = word.to_string();
            continue;
        }
        for c in word.chars() {
            current.push(c);
            if current.chars().count() > 1 && font.text_width(&current, size) > max_width {
                current.pop();
                lines.push(std::mem::replace(&mut current, c.to_string()));
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lay out a story onto pages. Always returns at least one page.
pub fn layout(story: &[Flowable], geometry: &PageGeometry) -> Vec<Page> {
    let mut engine = LayoutEngine::new(*geometry);
    for flowable in story {
        match flowable {
            Flowable::Paragraph(p) => engine.place_paragraph(p),
            Flowable::Spacer(height) => engine.place_spacer(*height),
            Flowable::Table(t) => engine.place_table(t),
        }
    }
    engine.finish()
}

struct LayoutEngine {
    geometry: PageGeometry,
    pages: Vec<Page>,
    current: Page,
    cursor: f32,
    at_top: bool,
}

impl LayoutEngine {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![],
            current: Page::default(),
            cursor: geometry.frame_top(),
            at_top: true,
        }
    }

    fn available(&self) -> f32 {
        self.cursor - self.geometry.frame_bottom()
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor = self.geometry.frame_top();
        self.at_top = true;
    }

    /// Reserve `height` on the current page, breaking first if it does not fit
    fn reserve(&mut self, height: f32) {
        if height > self.available() && !self.at_top {
            self.new_page();
        }
    }

    fn place_paragraph(&mut self, paragraph: &Paragraph) {
        let style = &paragraph.style;
        if !self.at_top {
            if style.space_before > self.available() {
                self.new_page();
            } else {
                self.cursor -= style.space_before;
            }
        }

        let width = self.geometry.frame_width();
        for line in wrap_text(&paragraph.text, style.font, style.size, width) {
            self.reserve(style.leading);
            let x = match style.align {
                Align::Left => self.geometry.frame_left(),
                Align::Center => {
                    let line_width = style.font.text_width(&line, style.size);
                    self.geometry.frame_left() + (width - line_width) / 2.0
                }
            };
            self.current.ops.push(DrawOp::Text {
                font: style.font,
                size: style.size,
                x,
                y: self.cursor - style.size,
                color: style.color,
                text: line,
            });
            self.cursor -= style.leading;
            self.at_top = false;
        }

        self.cursor = (self.cursor - style.space_after).max(self.geometry.frame_bottom());
    }

    fn place_spacer(&mut self, height: f32) {
        if height > self.available() {
            self.new_page();
        } else {
            self.cursor -= height;
        }
    }

    fn place_table(&mut self, table: &Table) {
        let style = table.cell_style;
        let left = self.geometry.frame_left() + (self.geometry.frame_width() - table.width()) / 2.0;
        let frame_height = self.geometry.frame_top() - self.geometry.frame_bottom();
        let segment_height = |lines: usize| 2.0 * CELL_PADDING_Y + lines as f32 * style.leading;
        let mut segment_start = true;

        for (index, row) in table.rows.iter().enumerate() {
            let cells: Vec<Vec<String>> = table
                .col_widths
                .iter()
                .enumerate()
                .map(|(col, col_width)| {
                    let text = row.get(col).map(String::as_str).unwrap_or("");
                    let inner = (col_width - 2.0 * CELL_PADDING_X).max(1.0);
                    wrap_text(text, style.font, style.size, inner)
                })
                .collect();
            let line_count = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
            let header = if index == 0 { table.header } else { None };

            // Rows taller than a frame are split between lines and continue on the next page
            let mut start = 0;
            loop {
                let rest = line_count - start;
                if segment_height(rest) <= self.available() {
                    self.draw_row_segment(
                        table,
                        &cells,
                        start..line_count,
                        left,
                        header,
                        segment_start,
                    );
                    segment_start = false;
                    break;
                }
                if !self.at_top && segment_height(rest) <= frame_height {
                    self.new_page();
                    segment_start = true;
                    continue;
                }

                let fit = ((self.available() - 2.0 * CELL_PADDING_Y) / style.leading)
                    .floor()
                    .max(0.0) as usize;
                let fit = match fit {
                    0 if self.at_top => 1,
                    0 => {
                        self.new_page();
                        segment_start = true;
                        continue;
                    }
                    n => n.min(rest),
                };
                self.draw_row_segment(
                    table,
                    &cells,
                    start..start + fit,
                    left,
                    header,
                    segment_start,
                );
                start += fit;
                if start >= line_count {
                    segment_start = false;
                    break;
                }
                self.new_page();
                segment_start = true;
            }
        }
    }

    /// Draw lines `lines` of every cell in a row as one bordered band at the cursor
    fn draw_row_segment(
        &mut self,
        table: &Table,
        cells: &[Vec<String>],
        lines: Range<usize>,
        left: f32,
        header: Option<HeaderStyle>,
        draw_top: bool,
    ) {
        let style = table.cell_style;
        let height = 2.0 * CELL_PADDING_Y + lines.len() as f32 * style.leading;
        let top = self.cursor;
        let bottom = top - height;

        if let Some(header) = header {
            self.current.ops.push(DrawOp::FillRect {
                x: left,
                y: bottom,
                width: table.width(),
                height,
                color: header.background,
            });
        }

        let text_color = header.map_or(style.color, |h| h.text_color);
        let mut x = left;
        for (cell, col_width) in cells.iter().zip(&table.col_widths) {
            let mut baseline = top - CELL_PADDING_Y - style.size;
            for line in cell.iter().skip(lines.start).take(lines.len()) {
                self.current.ops.push(DrawOp::Text {
                    font: style.font,
                    size: style.size,
                    x: x + CELL_PADDING_X,
                    y: baseline,
                    color: text_color,
                    text: line.clone(),
                });
                baseline -= style.leading;
            }
            x += col_width;
        }

        if let Some(grid) = table.grid {
            self.draw_row_grid(&grid, &table.col_widths, left, top, bottom, draw_top);
        }

        self.cursor = bottom;
        self.at_top = false;
    }

    fn draw_row_grid(
        &mut self,
        grid: &Grid,
        col_widths: &[f32],
        left: f32,
        top: f32,
        bottom: f32,
        draw_top: bool,
    ) {
        let right = left + col_widths.iter().sum::<f32>();
        let mut line = |from: (f32, f32), to: (f32, f32)| {
            self.current.ops.push(DrawOp::Line {
                from,
                to,
                width: grid.weight,
                color: grid.color,
            });
        };

        if draw_top {
            line((left, top), (right, top));
        }
        line((left, bottom), (right, bottom));

        let mut x = left;
        line((x, top), (x, bottom));
        for width in col_widths {
            x += width;
            line((x, top), (x, bottom));
        }
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.current.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}
