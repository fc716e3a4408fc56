//! Input source feeding the simulation, as the frame loop does

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

use blockfall::core::{MemoryStore, Simulation};
use blockfall::input::InputSource;
use blockfall::types::Phase;

fn key(code: KeyCode, kind: KeyEventKind) -> Event {
    Event::Key(KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind,
        state: KeyEventState::NONE,
    })
}

fn press(src: &mut InputSource, code: KeyCode) {
    src.handle_event(&key(code, KeyEventKind::Press));
}

#[test]
fn enter_starts_and_space_drops() {
    let mut sim = Simulation::with_seed(MemoryStore::new(), 42);
    let mut src = InputSource::new();

    press(&mut src, KeyCode::Enter);
    sim.update(16, src.consume());
    assert_eq!(sim.phase(), Phase::Running);

    press(&mut src, KeyCode::Char(' '));
    sim.update(16, src.consume());
    assert!(sim.score() > 0);
    assert!(sim.board().cells().iter().any(|c| c.is_some()));
}

#[test]
fn space_on_ready_only_starts() {
    let mut sim = Simulation::with_seed(MemoryStore::new(), 42);
    let mut src = InputSource::new();

    press(&mut src, KeyCode::Char(' '));
    sim.update(16, src.consume());
    assert_eq!(sim.phase(), Phase::Running);
    assert_eq!(sim.score(), 0);
    assert!(sim.board().cells().iter().all(|c| c.is_none()));
}

#[test]
fn held_down_arrow_slides_piece_to_rest() {
    let mut sim = Simulation::with_seed(MemoryStore::new(), 42);
    let mut src = InputSource::new();
    press(&mut src, KeyCode::Enter);
    sim.update(16, src.consume());

    press(&mut src, KeyCode::Down);
    sim.update(16, src.consume());
    let rest = sim.ghost_y();
    assert_eq!(sim.active().y, rest);
    assert!(sim.score() > 0);

    // Still held next frame, nothing more to gain and nothing locked.
    let score = sim.score();
    sim.update(16, src.consume());
    assert_eq!(sim.score(), score);
    assert!(sim.board().cells().iter().all(|c| c.is_none()));
}

#[test]
fn focus_loss_pauses_running_game() {
    let mut sim = Simulation::with_seed(MemoryStore::new(), 42);
    let mut src = InputSource::new();
    press(&mut src, KeyCode::Enter);
    sim.update(16, src.consume());

    src.handle_event(&Event::FocusLost);
    if src.take_focus_lost() {
        sim.pause();
    }
    sim.update(16, src.consume());
    assert_eq!(sim.phase(), Phase::Paused);

    press(&mut src, KeyCode::Char('p'));
    sim.update(16, src.consume());
    assert_eq!(sim.phase(), Phase::Running);
}

#[test]
fn restart_key_after_game_over() {
    let mut sim = Simulation::with_seed(MemoryStore::new(), 42);
    let mut src = InputSource::new();
    press(&mut src, KeyCode::Enter);
    sim.update(16, src.consume());

    for _ in 0..200 {
        if sim.phase() == Phase::Over {
            break;
        }
        press(&mut src, KeyCode::Char(' '));
        sim.update(16, src.consume());
    }
    assert_eq!(sim.phase(), Phase::Over);

    press(&mut src, KeyCode::Char('r'));
    let intents = src.consume();
    if sim.phase() == Phase::Over && intents.restart {
        sim.restart();
    }
    assert_eq!(sim.phase(), Phase::Running);
    assert_eq!(sim.score(), 0);
}
