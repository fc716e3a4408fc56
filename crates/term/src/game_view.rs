//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{canonical_shape, GameSnapshot, Shape};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Phase, PieceKind, COLS, HIDDEN_ROWS, VISIBLE_ROWS};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const PLAY_BG: Rgb = Rgb::new(17, 24, 39);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

/// Presenter for the playfield, side panel and phase overlays.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

/// Top-left of the board frame inside the viewport.
#[derive(Debug, Clone, Copy)]
struct Layout {
    x: u16,
    y: u16,
    frame_w: u16,
    frame_h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self { cell_w, cell_h }
    }

    /// Text shown over the board for a phase, if any.
    pub fn overlay_text(phase: Phase) -> Option<&'static str> {
        match phase {
            Phase::Ready => Some("Press SPACE or ENTER to start"),
            Phase::Paused => Some("PAUSED - press P to resume"),
            Phase::Over => Some("GAME OVER - press R to restart"),
            Phase::Running => None,
        }
    }

    /// Render a snapshot into an existing framebuffer.
    ///
    /// Allocation-free once the framebuffer has reached the viewport size.
    /// Only the visible rows are drawn; the spawn buffer above them is not.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(Rgb::new(220, 220, 220), SCREEN_BG).cell(' '));

        let board_px_w = (COLS as u16) * self.cell_w;
        let board_px_h = (VISIBLE_ROWS as u16) * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;
        let layout = Layout {
            x: viewport.width.saturating_sub(frame_w) / 2,
            y: viewport.height.saturating_sub(frame_h) / 2,
            frame_w,
            frame_h,
        };

        let bg = CellStyle::new(Rgb::new(55, 65, 81), PLAY_BG);
        fb.fill_rect(layout.x + 1, layout.y + 1, board_px_w, board_px_h, ' ', bg);
        self.draw_border(fb, layout, CellStyle::new(Rgb::new(156, 163, 175), SCREEN_BG));

        for (y, row) in snap.board.iter().enumerate().skip(HIDDEN_ROWS as usize) {
            for (x, cell) in row.iter().enumerate() {
                match cell {
                    Some(kind) => self.draw_block(fb, layout, x as i8, y as i8, *kind),
                    None => self.draw_empty_cell(fb, layout, x as i8, y as i8),
                }
            }
        }

        let active = &snap.active;
        if matches!(snap.phase, Phase::Running | Phase::Paused) {
            if let Some(ghost_y) = snap.ghost_y {
                let fg = Rgb::from_tuple(active.kind.rgb()).halved();
                let ghost = CellStyle::new(fg, PLAY_BG).dim();
                for (dx, dy) in active.shape.minos() {
                    self.fill_board_cell(fb, layout, active.x + dx, ghost_y + dy, '░', ghost);
                }
            }
        }

        for (x, y) in active.cells() {
            self.draw_block(fb, layout, x, y, active.kind);
        }

        self.draw_side_panel(fb, snap, viewport, layout);

        if let Some(text) = Self::overlay_text(snap.phase) {
            self.draw_overlay_text(fb, layout, text);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, layout: Layout, style: CellStyle) {
        let Layout {
            x,
            y,
            frame_w: w,
            frame_h: h,
        } = layout;

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, layout: Layout, x: i8, y: i8) {
        let style = CellStyle::new(Rgb::new(55, 65, 81), PLAY_BG).dim();
        self.fill_board_cell(fb, layout, x, y, '·', style);
    }

    fn draw_block(&self, fb: &mut FrameBuffer, layout: Layout, x: i8, y: i8, kind: PieceKind) {
        let style = CellStyle::new(Rgb::from_tuple(kind.rgb()), PLAY_BG).bold();
        self.fill_board_cell(fb, layout, x, y, '█', style);
    }

    /// Fill one board cell given in board coordinates; hidden or
    /// out-of-range cells are skipped.
    fn fill_board_cell(
        &self,
        fb: &mut FrameBuffer,
        layout: Layout,
        x: i8,
        y: i8,
        ch: char,
        style: CellStyle,
    ) {
        let visible_y = y - HIDDEN_ROWS as i8;
        if x < 0 || x >= COLS as i8 || visible_y < 0 || visible_y >= VISIBLE_ROWS as i8 {
            return;
        }
        let px = layout.x + 1 + (x as u16) * self.cell_w;
        let py = layout.y + 1 + (visible_y as u16) * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        layout: Layout,
    ) {
        let panel_x = layout.x.saturating_add(layout.frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);

        let mut y = layout.y;
        for (name, n) in [
            ("SCORE", snap.score),
            ("LINES", snap.lines),
            ("LEVEL", snap.level),
            ("BEST", snap.best),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), n, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        self.draw_preview(fb, panel_x, y, canonical_shape(snap.next), snap.next);
    }

    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, shape: &Shape, kind: PieceKind) {
        let style = CellStyle::new(Rgb::from_tuple(kind.rgb()), SCREEN_BG).bold();
        for (dx, dy) in shape.minos() {
            let px = x + (dx as u16) * self.cell_w;
            let py = y + (dy as u16) * self.cell_h;
            fb.fill_rect(px, py, self.cell_w, self.cell_h, '█', style);
        }
    }

    /// Centered inside the frame, word-wrapped to the playfield width so the
    /// border stays intact.
    fn draw_overlay_text(&self, fb: &mut FrameBuffer, layout: Layout, text: &str) {
        let inner_w = layout.frame_w.saturating_sub(2);
        let lines = WrappedLines::new(text, inner_w);
        let count = lines.clone().count() as u16;
        let mid_y = layout.y.saturating_add(layout.frame_h / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), SCREEN_BG).bold();

        let mut y = mid_y.saturating_sub(count / 2);
        for line in lines {
            let line_w = line.chars().count() as u16;
            let x = layout.x + 1 + inner_w.saturating_sub(line_w) / 2;
            fb.put_str(x, y, line, style);
            y = y.saturating_add(1);
        }
    }
}

/// Greedy word wrap over a borrowed string. A word longer than the width is
/// cut at the width.
#[derive(Debug, Clone)]
struct WrappedLines<'a> {
    rest: &'a str,
    width: usize,
}

impl<'a> WrappedLines<'a> {
    fn new(text: &'a str, width: u16) -> Self {
        Self {
            rest: text,
            width: usize::from(width),
        }
    }
}

impl<'a> Iterator for WrappedLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest.trim_start();
        if rest.is_empty() || self.width == 0 {
            return None;
        }

        let mut last_space = None;
        for (cols, (i, ch)) in rest.char_indices().enumerate() {
            if cols == self.width {
                let cut = if ch == ' ' { i } else { last_space.unwrap_or(i) };
                self.rest = &rest[cut..];
                return Some(rest[..cut].trim_end());
            }
            if ch == ' ' {
                last_space = Some(i);
            }
        }
        self.rest = "";
        Some(rest.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Piece;

    fn running_snapshot() -> GameSnapshot {
        GameSnapshot {
            phase: Phase::Running,
            active: Piece::spawn(PieceKind::O),
            ghost_y: Some(20),
            ..GameSnapshot::default()
        }
    }

    fn count_char(fb: &FrameBuffer, ch: char) -> usize {
        fb.cells().iter().filter(|c| c.ch == ch).count()
    }

    #[test]
    fn test_frame_is_centered_in_viewport() {
        let view = GameView::default();
        let fb = view.render(&running_snapshot(), Viewport::new(80, 30));
        // 22 wide frame in 80 columns, 22 tall frame in 30 rows.
        assert_eq!(fb.get(29, 4).map(|c| c.ch), Some('┌'));
        assert_eq!(fb.get(50, 25).map(|c| c.ch), Some('┘'));
    }

    #[test]
    fn test_hidden_rows_are_not_drawn() {
        let view = GameView::default();
        let mut snap = running_snapshot();
        snap.ghost_y = None;
        // Spawned O covers rows 0-1, all hidden.
        let fb = view.render(&snap, Viewport::new(80, 30));
        let style = Rgb::from_tuple(PieceKind::O.rgb());
        assert!(fb
            .cells()
            .iter()
            .filter(|c| c.ch == '█')
            .all(|c| c.style.fg != style || c.style.bg == SCREEN_BG));
    }

    #[test]
    fn test_locked_cells_use_kind_color() {
        let view = GameView::default();
        let mut snap = running_snapshot();
        snap.board[21][0] = Some(PieceKind::Z);
        let fb = view.render(&snap, Viewport::new(80, 30));
        // Bottom-left board cell: frame at (29,4), visible row 19.
        let cell = fb.get(30, 4 + 1 + 19).unwrap();
        assert_eq!(cell.ch, '█');
        assert_eq!(cell.style.fg, Rgb::from_tuple(PieceKind::Z.rgb()));
    }

    #[test]
    fn test_ghost_drawn_while_running_but_not_when_over() {
        let view = GameView::default();
        let snap = running_snapshot();
        let fb = view.render(&snap, Viewport::new(80, 30));
        // O piece: 4 cells, 2 columns wide each.
        assert_eq!(count_char(&fb, '░'), 8);

        let over = GameSnapshot {
            phase: Phase::Over,
            ..snap
        };
        let fb = view.render(&over, Viewport::new(80, 30));
        assert_eq!(count_char(&fb, '░'), 0);
    }

    #[test]
    fn test_overlay_text_per_phase() {
        assert_eq!(GameView::overlay_text(Phase::Running), None);
        let view = GameView::default();
        for phase in [Phase::Ready, Phase::Paused, Phase::Over] {
            let snap = GameSnapshot {
                phase,
                ..running_snapshot()
            };
            let fb = view.render(&snap, Viewport::new(80, 30));
            let text = GameView::overlay_text(phase).unwrap();
            // Two wrapped lines around the frame's middle row.
            let lines: Vec<&str> = WrappedLines::new(text, 20).collect();
            assert_eq!(lines.len(), 2, "{:?}", phase);
            for (y, line) in (14..).zip(lines) {
                assert!(fb.row_text(y).contains(line), "{:?} row {}", phase, y);
            }
        }
    }

    #[test]
    fn test_overlay_stays_inside_the_border() {
        let view = GameView::default();
        let snap = GameSnapshot {
            phase: Phase::Ready,
            ..running_snapshot()
        };
        let fb = view.render(&snap, Viewport::new(80, 30));
        // Frame spans columns 29..=50.
        for y in 5..25 {
            assert_eq!(fb.get(29, y).map(|c| c.ch), Some('│'), "row {}", y);
            assert_eq!(fb.get(50, y).map(|c| c.ch), Some('│'), "row {}", y);
        }
        assert!(fb.row_text(14).contains("Press SPACE or ENTER"));
        assert!(fb.row_text(15).contains("to start"));
    }

    #[test]
    fn test_wrapped_lines() {
        let lines: Vec<&str> = WrappedLines::new("Press SPACE or ENTER to start", 20).collect();
        assert_eq!(lines, ["Press SPACE or ENTER", "to start"]);

        let lines: Vec<&str> = WrappedLines::new("GAME OVER - press R to restart", 20).collect();
        assert_eq!(lines, ["GAME OVER - press R", "to restart"]);

        let lines: Vec<&str> = WrappedLines::new("short", 20).collect();
        assert_eq!(lines, ["short"]);

        let lines: Vec<&str> = WrappedLines::new("abcdefgh", 3).collect();
        assert_eq!(lines, ["abc", "def", "gh"]);

        assert_eq!(WrappedLines::new("text", 0).count(), 0);
    }

    #[test]
    fn test_side_panel_shows_counters_and_preview() {
        let view = GameView::default();
        let snap = GameSnapshot {
            score: 1234,
            best: 5000,
            next: PieceKind::I,
            ..running_snapshot()
        };
        let fb = view.render(&snap, Viewport::new(80, 30));
        // Panel starts two columns right of the frame.
        assert!(fb.row_text(4).contains("SCORE"));
        assert!(fb.row_text(5).contains("1234"));
        assert!(fb.row_text(13).contains("BEST"));
        assert!(fb.row_text(14).contains("5000"));
        assert!(fb.row_text(16).contains("NEXT"));
        // Horizontal I preview sits in the second row of its box.
        assert_eq!(
            fb.row_text(18).chars().filter(|&c| c == '█').count(),
            8
        );
    }

    #[test]
    fn test_tiny_viewport_does_not_panic() {
        let view = GameView::default();
        let fb = view.render(&running_snapshot(), Viewport::new(5, 3));
        assert_eq!(fb.width(), 5);
    }
}
