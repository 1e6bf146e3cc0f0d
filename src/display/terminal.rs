//! crossterm `Surface`: logical pixels rasterised onto character cells.
//!
//! Screen layout, top to bottom:
//!   row 0                 HUD (score, title)
//!   rows 1 ..= field_rows playfield
//!   next row              touch zones  [ ◀ ] [ FIRE ] [ ▶ ]
//!   last row              controls hint

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use super::Surface;
use crate::geometry::Aabb;
use crate::input::TouchLayout;

/// Terminal rows that are not playfield: HUD, touch bar, hint.
pub const CHROME_ROWS: u16 = 3;

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_TITLE: Color = Color::Cyan;
const C_TOUCH: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

const FILL_GLYPH: char = '█';

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    fn blank(color: Color) -> Self {
        Cell {
            glyph: ' ',
            fg: color,
            bg: color,
        }
    }
}

pub struct TerminalSurface<W: Write> {
    out: W,
    /// Logical pixels per character cell.
    cell_width: f32,
    cell_height: f32,
    columns: u16,
    rows: u16,
    field_cols: u16,
    field_rows: u16,
    cells: Vec<Cell>,
    score: u32,
    /// Whole screen must be wiped before the next frame.
    dirty: bool,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, cell_width: f32, cell_height: f32, columns: u16, rows: u16) -> Self {
        TerminalSurface {
            out,
            cell_width,
            cell_height,
            columns,
            rows,
            field_cols: 0,
            field_rows: 0,
            cells: Vec::new(),
            score: 0,
            dirty: true,
        }
    }

    /// Space available for the playfield, in logical pixels.
    pub fn container_size(&self) -> (f32, f32) {
        (
            self.columns as f32 * self.cell_width,
            self.rows.saturating_sub(CHROME_ROWS) as f32 * self.cell_height,
        )
    }

    pub fn resize_terminal(&mut self, columns: u16, rows: u16) {
        self.columns = columns;
        self.rows = rows;
        self.dirty = true;
    }

    /// Size the cell buffer for a playfield of `width` x `height` pixels.
    pub fn set_playfield(&mut self, width: f32, height: f32) {
        self.field_cols = ((width / self.cell_width).ceil() as u16).min(self.columns);
        self.field_rows = ((height / self.cell_height).ceil() as u16)
            .min(self.rows.saturating_sub(CHROME_ROWS));
        self.cells = vec![Cell::blank(Color::Reset); self.field_cols as usize * self.field_rows as usize];
        self.dirty = true;
    }

    pub fn field_size(&self) -> (u16, u16) {
        (self.field_cols, self.field_rows)
    }

    pub fn cell_at(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.field_cols || row >= self.field_rows {
            return None;
        }
        self.cells.get(row as usize * self.field_cols as usize + col as usize)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Left terminal column of the playfield (it is centred).
    fn origin_col(&self) -> u16 {
        (self.columns.saturating_sub(self.field_cols)) / 2
    }

    fn touch_row(&self) -> u16 {
        1 + self.field_rows
    }

    /// Where the three touch zones sit on screen, for mouse hit-testing.
    pub fn touch_layout(&self) -> TouchLayout {
        let origin = self.origin_col();
        let third = self.field_cols / 3;
        TouchLayout {
            row: self.touch_row(),
            left: origin..origin + third,
            shoot: origin + third..origin + 2 * third,
            right: origin + 2 * third..origin + self.field_cols,
        }
    }

    /// Cell span `[start, end)` covering `[from, from + len)` pixels along one
    /// axis, clipped to `[0, limit)`.  At least one cell before clipping, so
    /// thin shapes stay visible.
    fn span(from: f32, len: f32, cell: f32, limit: u16) -> (u16, u16) {
        let start = (from / cell).floor() as i32;
        let end = (((from + len) / cell).round() as i32).max(start + 1);
        let clip = |v: i32| v.clamp(0, limit as i32) as u16;
        (clip(start), clip(end))
    }

    fn put(&mut self, col: u16, row: u16, glyph: char, fg: Color) {
        let idx = row as usize * self.field_cols as usize + col as usize;
        if let Some(cell) = self.cells.get_mut(idx) {
            cell.glyph = glyph;
            cell.fg = fg;
        }
    }

    // ── Chrome ────────────────────────────────────────────────────────────────

    fn draw_hud(&mut self) -> std::io::Result<()> {
        let origin = self.origin_col();
        self.out.queue(cursor::MoveTo(origin, 0))?;
        self.out.queue(style::SetBackgroundColor(Color::Reset))?;
        self.out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
        self.out.queue(Print(format!("Score: {:>6}", self.score)))?;

        let title = "INVADERS";
        let tx = (origin + self.field_cols).saturating_sub(title.len() as u16);
        self.out.queue(cursor::MoveTo(tx, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD_TITLE))?;
        self.out.queue(Print(title))?;
        Ok(())
    }

    fn draw_touch_bar(&mut self) -> std::io::Result<()> {
        let layout = self.touch_layout();
        let zones = [
            (&layout.left, "◀"),
            (&layout.shoot, "FIRE"),
            (&layout.right, "▶"),
        ];
        self.out.queue(style::SetForegroundColor(C_TOUCH))?;
        for (range, label) in zones {
            let width = range.len();
            if width < 2 {
                continue;
            }
            let inner = width - 2;
            let text = format!("[{:^inner$}]", label, inner = inner);
            self.out.queue(cursor::MoveTo(range.start, layout.row))?;
            self.out.queue(Print(text))?;
        }
        Ok(())
    }

    fn draw_controls_hint(&mut self) -> std::io::Result<()> {
        self.out
            .queue(cursor::MoveTo(self.origin_col(), self.touch_row() + 1))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out
            .queue(Print("← → / A D : Move   SPACE : Shoot   R : Restart   Q : Quit"))?;
        Ok(())
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn clear(&mut self, color: Color) {
        self.cells.iter_mut().for_each(|cell| *cell = Cell::blank(color));
    }

    fn fill_rect(&mut self, rect: Aabb, color: Color) {
        let (c0, c1) = Self::span(rect.x, rect.width, self.cell_width, self.field_cols);
        let (r0, r1) = Self::span(rect.y, rect.height, self.cell_height, self.field_rows);
        for row in r0..r1 {
            for col in c0..c1 {
                self.put(col, row, FILL_GLYPH, color);
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
        if self.field_rows == 0 {
            return;
        }
        let row = ((y / self.cell_height).floor().max(0.0) as u16).min(self.field_rows - 1);
        let centre = (x / self.cell_width).round().max(0.0) as u16;
        let start = centre.saturating_sub(text.chars().count() as u16 / 2);
        for (i, ch) in text.chars().enumerate() {
            let col = start + i as u16;
            if col >= self.field_cols {
                break;
            }
            self.put(col, row, ch, color);
        }
    }

    fn show_score(&mut self, score: u32) {
        self.score = score;
    }

    fn present(&mut self) -> std::io::Result<()> {
        if self.dirty {
            self.out.queue(terminal::Clear(terminal::ClearType::All))?;
            self.dirty = false;
        }

        self.draw_hud()?;

        let origin = self.origin_col();
        let cols = self.field_cols as usize;
        if cols > 0 {
            for (row, line) in self.cells.chunks(cols).enumerate() {
                self.out.queue(cursor::MoveTo(origin, 1 + row as u16))?;
                let mut current: Option<(Color, Color)> = None;
                for cell in line {
                    if current != Some((cell.fg, cell.bg)) {
                        self.out.queue(style::SetForegroundColor(cell.fg))?;
                        self.out.queue(style::SetBackgroundColor(cell.bg))?;
                        current = Some((cell.fg, cell.bg));
                    }
                    self.out.queue(Print(cell.glyph))?;
                }
            }
        }
        self.out.queue(style::ResetColor)?;

        self.draw_touch_bar()?;
        self.draw_controls_hint()?;

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()?;
        Ok(())
    }
}
