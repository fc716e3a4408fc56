use blockfall::core::{MemoryStore, Simulation};
use blockfall::term::{FrameBuffer, GameView, Rgb, Viewport};
use blockfall::types::{Intents, PieceKind};

#[test]
fn term_view_renders_border_corners() {
    let sim = Simulation::with_seed(MemoryStore::new(), 1);
    let view = GameView::default();

    // With cell_w=2 and cell_h=1:
    // visible board = 10*2 by 20*1 => 20x20, plus border => 22x22
    let fb = view.render(&sim.snapshot(), Viewport::new(22, 22));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(21, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 21).unwrap().ch, '└');
    assert_eq!(fb.get(21, 21).unwrap().ch, '┘');
}

#[test]
fn term_view_renders_locked_cell_as_two_chars_wide() {
    let mut snap = Simulation::with_seed(MemoryStore::new(), 1).snapshot();
    snap.board[21][0] = Some(PieceKind::I);
    snap.ghost_y = None;

    // A 22x22 viewport puts the frame at the origin.
    let fb = GameView::default().render(&snap, Viewport::new(22, 22));

    // Bottom visible row is frame row 20.
    let left = fb.get(1, 20).unwrap();
    let right = fb.get(2, 20).unwrap();
    assert_eq!(left.ch, '█');
    assert_eq!(right.ch, '█');
    assert_eq!(left.style.fg, Rgb::from_tuple(PieceKind::I.rgb()));
    assert_ne!(fb.get(3, 20).unwrap().ch, '█');
}

#[test]
fn term_view_shows_dropped_piece_and_ghost() {
    let mut sim = Simulation::with_seed(MemoryStore::new(), 8);
    sim.update(16, Intents { start: true, ..Intents::default() });
    // Bring the active piece into view.
    sim.update(1000, Intents::default());
    sim.update(1000, Intents::default());
    sim.update(1000, Intents::default());

    let fb = GameView::default().render(&sim.snapshot(), Viewport::new(60, 24));

    let blocks = fb.cells().iter().filter(|c| c.ch == '█').count();
    let ghost = fb.cells().iter().filter(|c| c.ch == '░').count();
    // Active piece (4 cells) plus the next-piece preview (4 cells), 2 columns each.
    assert_eq!(blocks, 16);
    assert_eq!(ghost, 8);
}

#[test]
fn term_view_ready_overlay() {
    let sim = Simulation::with_seed(MemoryStore::new(), 1);
    let view = GameView::default();
    let fb = view.render(&sim.snapshot(), Viewport::new(40, 22));
    // Wrapped around the middle row, inside the border.
    assert!(fb.row_text(10).contains("Press SPACE or ENTER"));
    assert!(fb.row_text(11).contains("to start"));
    assert_eq!(fb.get(9, 10).unwrap().ch, '│');
    assert_eq!(fb.get(30, 11).unwrap().ch, '│');
}

fn changed_cells(a: &FrameBuffer, b: &FrameBuffer) -> Vec<(u16, u16)> {
    let mut out = Vec::new();
    for y in 0..a.height() {
        for (x, (ca, cb)) in a.row(y).iter().zip(b.row(y)).enumerate() {
            if ca != cb {
                out.push((x as u16, y));
            }
        }
    }
    out
}

#[test]
fn term_view_move_changes_only_the_ghost() {
    let mut sim = Simulation::with_seed(MemoryStore::new(), 8);
    sim.update(16, Intents { start: true, ..Intents::default() });
    let view = GameView::default();
    let vp = Viewport::new(60, 24);

    let before = view.render(&sim.snapshot(), vp);
    assert!(changed_cells(&before, &view.render(&sim.snapshot(), vp)).is_empty());

    sim.update(16, Intents { move_left: true, ..Intents::default() });
    let after = view.render(&sim.snapshot(), vp);
    let changed = changed_cells(&before, &after);

    // The active piece is still in the hidden rows; only the ghost on the
    // bottom rows of the well moved.
    assert!(!changed.is_empty());
    assert!(changed.iter().all(|&(_, y)| y >= 19));
    assert!(changed.iter().any(|&(x, y)| after.get(x, y).unwrap().ch == '░'));
}
