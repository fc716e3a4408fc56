//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Each frame is compared row by row with the previous one and only cells
//! that changed are repainted. A [`Painter`] tracks what the terminal already
//! has (cursor column and current colors), so moving through a row costs one
//! cursor jump per changed stretch and colors are only re-sent when they
//! differ. The playfield changes a few cells at a time while the rest of the
//! screen stays put, so a typical frame is a handful of short writes.
//!
//! A resize (or [`TerminalRenderer::invalidate`]) forces a full repaint.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    event::{
        DisableFocusChange, EnableFocusChange, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, FrameBuffer, Rgb, Weight};

/// Unchanged cells this close to the next change are reprinted instead of
/// jumping over them; a cursor move is about as long as this many cells.
const GAP_BRIDGE: usize = 4;

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
    /// Set when the terminal accepted key release/repeat reporting.
    enhanced_keys: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(16 * 1024),
            enhanced_keys: false,
        }
    }

    /// Raw mode, alternate screen, focus events and (where supported) key
    /// release reporting so held soft drop ends on key-up.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.enhanced_keys = terminal::supports_keyboard_enhancement().unwrap_or(false);
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.buf.queue(EnableFocusChange)?;
        if self.enhanced_keys {
            self.buf.queue(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        self.flush_buf()?;
        log::debug!("terminal entered, key release events: {}", self.enhanced_keys);
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        if self.enhanced_keys {
            self.buf.queue(PopKeyboardEnhancementFlags)?;
        }
        self.buf.queue(DisableFocusChange)?;
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Whether key release and repeat events are reported. Only meaningful
    /// after [`enter`](Self::enter).
    pub fn enhanced_keys(&self) -> bool {
        self.enhanced_keys
    }

    /// Force the next draw to be a full repaint (terminal resize).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Paint `fb` and keep it as the reference for the next frame.
    ///
    /// The previous frame's buffer is swapped back into `fb`, so a caller that
    /// redraws into the same buffer every frame never reallocates.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        encode_frame(self.last.as_ref(), fb, &mut self.buf)?;
        self.flush_buf()?;

        let prev = self.last.get_or_insert_with(|| FrameBuffer::new(0, 0));
        prev.resize(fb.width(), fb.height());
        std::mem::swap(prev, fb);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Commands that turn `prev` (or an unknown screen) into `next`.
fn encode_frame(prev: Option<&FrameBuffer>, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut painter = Painter::new(out, next.width());
    match prev {
        Some(prev) if prev.width() == next.width() && prev.height() == next.height() => {
            for y in 0..next.height() {
                let (old, new) = (prev.row(y), next.row(y));
                if old != new {
                    painter.row_diff(y, old, new)?;
                }
            }
        }
        _ => {
            painter.clear()?;
            for y in 0..next.height() {
                painter.move_to(0, y)?;
                for &cell in next.row(y) {
                    painter.put(cell)?;
                }
            }
        }
    }
    painter.finish()
}

/// Terminal state as far as our own output has set it.
#[derive(Debug, Clone, Copy, Default)]
struct Pen {
    cursor: Option<(u16, u16)>,
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    weight: Option<Weight>,
}

struct Painter<'a> {
    out: &'a mut Vec<u8>,
    width: u16,
    pen: Pen,
    touched: bool,
}

impl<'a> Painter<'a> {
    fn new(out: &'a mut Vec<u8>, width: u16) -> Self {
        Self {
            out,
            width,
            pen: Pen::default(),
            touched: false,
        }
    }

    fn clear(&mut self) -> Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.touched = true;
        Ok(())
    }

    fn move_to(&mut self, x: u16, y: u16) -> Result<()> {
        if self.pen.cursor != Some((x, y)) {
            self.out.queue(cursor::MoveTo(x, y))?;
            self.pen.cursor = Some((x, y));
            self.touched = true;
        }
        Ok(())
    }

    /// Print at the cursor and advance it. At the right edge the terminal's
    /// cursor position is unreliable, so it is forgotten.
    fn put(&mut self, cell: Cell) -> Result<()> {
        if self.pen.weight != Some(cell.style.weight) {
            // SGR reset clears colors too.
            self.out.queue(SetAttribute(Attribute::Reset))?;
            match cell.style.weight {
                Weight::Normal => {}
                Weight::Bold => {
                    self.out.queue(SetAttribute(Attribute::Bold))?;
                }
                Weight::Dim => {
                    self.out.queue(SetAttribute(Attribute::Dim))?;
                }
            }
            self.pen.weight = Some(cell.style.weight);
            self.pen.fg = None;
            self.pen.bg = None;
        }
        if self.pen.fg != Some(cell.style.fg) {
            self.out.queue(SetForegroundColor(rgb_to_color(cell.style.fg)))?;
            self.pen.fg = Some(cell.style.fg);
        }
        if self.pen.bg != Some(cell.style.bg) {
            self.out.queue(SetBackgroundColor(rgb_to_color(cell.style.bg)))?;
            self.pen.bg = Some(cell.style.bg);
        }

        self.out.queue(Print(cell.ch))?;
        self.touched = true;
        self.pen.cursor = match self.pen.cursor {
            Some((x, y)) if x + 1 < self.width => Some((x + 1, y)),
            _ => None,
        };
        Ok(())
    }

    /// Repaint the cells of row `y` that differ between `old` and `new`.
    fn row_diff(&mut self, y: u16, old: &[Cell], new: &[Cell]) -> Result<()> {
        for (x, (a, b)) in old.iter().zip(new).enumerate() {
            if a == b {
                continue;
            }
            if let Some((cx, cy)) = self.pen.cursor {
                let cx = cx as usize;
                if cy == y && cx < x && x - cx <= GAP_BRIDGE {
                    for &cell in &new[cx..x] {
                        self.put(cell)?;
                    }
                }
            }
            self.move_to(x as u16, y)?;
            self.put(*b)?;
        }
        Ok(())
    }

    fn finish(self) -> Result<()> {
        if self.touched {
            self.out.queue(ResetColor)?;
            self.out.queue(SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fb::CellStyle;

    fn encode(prev: Option<&FrameBuffer>, next: &FrameBuffer) -> String {
        let mut out = Vec::new();
        encode_frame(prev, next, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn cursor_moves(text: &str) -> usize {
        // Only cursor moves end in 'H'; colors end in 'm', clear in 'J'.
        text.matches('H').count()
    }

    #[test]
    fn test_full_paint_writes_every_row() {
        let mut fb = FrameBuffer::new(2, 2);
        let style = CellStyle::default();
        fb.set(0, 0, style.cell('A'));
        fb.set(1, 0, style.cell('B'));
        fb.set(0, 1, style.cell('C'));
        fb.set(1, 1, style.cell('D'));

        let text = encode(None, &fb);
        assert!(text.contains("\x1b[2J"));
        assert!(text.contains("AB"));
        assert!(text.contains("CD"));
        assert_eq!(cursor_moves(&text), 2);
    }

    #[test]
    fn test_identical_frames_emit_nothing() {
        let fb = FrameBuffer::new(6, 3);
        assert!(encode(Some(&fb), &fb.clone()).is_empty());
    }

    #[test]
    fn test_size_change_repaints_everything() {
        let prev = FrameBuffer::new(4, 2);
        let next = FrameBuffer::new(5, 2);
        let text = encode(Some(&prev), &next);
        assert!(text.contains("\x1b[2J"));
    }

    #[test]
    fn test_short_gap_is_bridged_in_one_move() {
        let style = CellStyle::default();
        let prev = FrameBuffer::new(10, 1);
        let mut next = prev.clone();
        next.set(1, 0, style.cell('X'));
        next.set(4, 0, style.cell('Y'));

        let text = encode(Some(&prev), &next);
        assert_eq!(cursor_moves(&text), 1);
        assert!(text.contains("X  Y"));
    }

    #[test]
    fn test_long_gap_jumps() {
        let style = CellStyle::default();
        let prev = FrameBuffer::new(20, 1);
        let mut next = prev.clone();
        next.set(0, 0, style.cell('X'));
        next.set(15, 0, style.cell('Y'));

        let text = encode(Some(&prev), &next);
        assert_eq!(cursor_moves(&text), 2);
        assert!(!text.contains("X "));
    }

    #[test]
    fn test_colors_sent_once_per_run() {
        let style = CellStyle::new(Rgb::new(1, 2, 3), Rgb::new(4, 5, 6));
        let prev = FrameBuffer::new(8, 2);
        let mut next = prev.clone();
        for x in 2..6 {
            next.set(x, 0, style.cell('#'));
            next.set(x, 1, style.cell('#'));
        }

        let text = encode(Some(&prev), &next);
        assert_eq!(text.matches("38;2;1;2;3").count(), 1);
        assert_eq!(text.matches("48;2;4;5;6").count(), 1);
        assert_eq!(cursor_moves(&text), 2);
    }

    #[test]
    fn test_weight_change_resends_colors() {
        let plain = CellStyle::new(Rgb::new(9, 9, 9), Rgb::new(0, 0, 0));
        let prev = FrameBuffer::new(4, 1);
        let mut next = prev.clone();
        next.set(0, 0, plain.cell('a'));
        next.set(1, 0, plain.bold().cell('b'));

        let text = encode(Some(&prev), &next);
        // The reset before the bold cell drops the colors set for 'a'.
        assert_eq!(text.matches("38;2;9;9;9").count(), 2);
        assert!(text.contains("\x1b[1m"));
    }

    #[test]
    fn test_rgb_maps_to_truecolor() {
        assert_eq!(
            rgb_to_color(Rgb::new(1, 2, 3)),
            Color::Rgb { r: 1, g: 2, b: 3 }
        );
    }
}
