use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use blockfall::core::{BestScoreStore, GameSnapshot, Simulation};
use blockfall::term::{FrameBuffer, GameView, Viewport};
use blockfall::types::{Intents, Phase};

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = layout;
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = (layout, new_size);
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

/// Store that keeps the value inline, so writes do not allocate either.
#[derive(Default)]
struct InlineStore(u32);

impl BestScoreStore for InlineStore {
    fn get(&self, _key: &str) -> u32 {
        self.0
    }

    fn set(&mut self, _key: &str, value: u32) {
        self.0 = value;
    }
}

#[test]
fn frame_hot_paths_do_not_allocate() {
    // Setup (outside counting) so one-time allocations don't trip the gate.
    let mut sim = Simulation::with_seed(InlineStore::default(), 1);
    let view = GameView::default();
    let vp = Viewport::new(80, 30);
    let mut fb = FrameBuffer::new(vp.width, vp.height);
    let mut snap = GameSnapshot::default();

    sim.update(16, Intents { start: true, ..Intents::default() });

    let moves = Intents {
        move_left: true,
        rotate_cw: true,
        ..Intents::default()
    };
    let drop_right = Intents {
        move_right: true,
        hard_drop: true,
        ..Intents::default()
    };

    let allocs = with_alloc_counting(|| {
        for _ in 0..200 {
            sim.update(16, Intents::default());
        }

        for _ in 0..50 {
            sim.update(16, moves);
            sim.update(16, Intents { soft_drop_active: true, ..Intents::default() });
        }

        // Hard drops drive lock, line clear, bag refill and spawn.
        for _ in 0..60 {
            sim.update(16, drop_right);
            if sim.phase() == Phase::Over {
                sim.restart();
            }
            sim.snapshot_into(&mut snap);
            view.render_into(&snap, vp, &mut fb);
        }
    });

    assert_eq!(allocs, 0);
}
