//! Synthetic session profiles for benchmarking Chisel recording.
//!
//! - [`stroke_session`]: pointer strokes with periodic tool tweaks
//! - [`hover_session`]: long hover runs that exercise coalescing
//! - [`stroke_points`]: deterministic stroke coordinates from a seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use chisel_core::ToolKind;
use chisel_replay::{Modifiers, Recorder};
use chisel_test_utils::MockSession;

/// Generate `n` deterministic screen points inside a 1920x1080 viewport.
pub fn stroke_points(n: usize, seed: u64) -> Vec<(i32, i32)> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let x = ((state >> 33) % 1920) as i32;
            let y = ((state >> 17) % 1080) as i32;
            (x, y)
        })
        .collect()
}

/// Record `strokes` pointer strokes of `points_per_stroke` held moves each.
///
/// Every eighth stroke switches tool and nudges its intensity, so the
/// diff tracker has real work at each pointer-down.
pub fn stroke_session(strokes: usize, points_per_stroke: usize, seed: u64) -> Recorder {
    let mut session = MockSession::new();
    let mut recorder = Recorder::new(&session);
    let points = stroke_points(points_per_stroke, seed);

    for s in 0..strokes {
        if s % 8 == 7 {
            session.sculpt.tool = ToolKind::ALL[(s / 8) % ToolKind::ALL.len()];
            session.sculpt.brush.intensity = (s % 100) as f32 / 100.0;
            session.radius = 20.0 + (s % 60) as f32;
        }
        let (x0, y0) = points[0];
        recorder.push_pointer_down(&session, 1, x0, y0, Modifiers::default());
        session.button = 1;
        for &(x, y) in &points[1..] {
            recorder.push_pointer_move(&session, x, y);
        }
        session.button = 0;
        recorder.push_pointer_up(&session);
    }
    recorder
}

/// Record `runs` hover runs of `moves_per_run` moves, separated by wheel ticks.
pub fn hover_session(runs: usize, moves_per_run: usize) -> Recorder {
    let session = MockSession::new();
    let mut recorder = Recorder::new(&session);
    for r in 0..runs {
        for m in 0..moves_per_run {
            recorder.push_pointer_move(&session, m as i32, r as i32);
        }
        recorder.push_wheel(1);
    }
    recorder
}
