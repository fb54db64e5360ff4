//! Criterion micro-benchmarks for the recording hot path.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use chisel_bench::stroke_points;
use chisel_core::ToolKind;
use chisel_replay::{ActionLog, Recorder, SessionSnapshot};
use chisel_test_utils::MockSession;

/// Benchmark: 1000 coalesced hover moves.
fn bench_hover_moves(c: &mut Criterion) {
    let session = MockSession::new();
    let points = stroke_points(1000, 42);

    c.bench_function("hover_moves_1k", |b| {
        b.iter(|| {
            let mut recorder = Recorder::new(&session);
            for &(x, y) in &points {
                recorder.push_pointer_move(&session, x, y);
            }
            black_box(recorder.entry_count());
        });
    });
}

/// Benchmark: 1000 held moves, each appending an entry.
fn bench_drag_moves(c: &mut Criterion) {
    let mut session = MockSession::new();
    session.button = 1;
    let points = stroke_points(1000, 42);

    c.bench_function("drag_moves_1k", |b| {
        b.iter(|| {
            let mut recorder = Recorder::new(&session);
            for &(x, y) in &points {
                recorder.push_pointer_move(&session, x, y);
            }
            black_box(recorder.entry_count());
        });
    });
}

/// Benchmark: diff pass with nothing changed.
fn bench_sync_unchanged(c: &mut Criterion) {
    let session = MockSession::new();
    let mut snapshot = SessionSnapshot::new();
    let mut log = ActionLog::new();
    snapshot.sync(&session, &mut log);

    c.bench_function("sync_unchanged", |b| {
        b.iter(|| {
            let ops = snapshot.sync(black_box(&session), &mut log);
            black_box(ops);
        });
    });
}

/// Benchmark: diff pass alternating between two paint states.
fn bench_sync_paint_changes(c: &mut Criterion) {
    let mut a = MockSession::new();
    a.sculpt.tool = ToolKind::Paint;
    let mut b_state = a.clone();
    b_state.sculpt.paint.color = [0.1, 0.2, 0.3];
    b_state.sculpt.paint.roughness = 0.7;

    c.bench_function("sync_paint_changes", |b| {
        let mut snapshot = SessionSnapshot::new();
        let mut log = ActionLog::new();
        b.iter(|| {
            snapshot.sync(&a, &mut log);
            snapshot.sync(&b_state, &mut log);
            if log.len() > 100_000 {
                log.clear();
            }
        });
    });
}

criterion_group!(
    benches,
    bench_hover_moves,
    bench_drag_moves,
    bench_sync_unchanged,
    bench_sync_paint_changes
);
criterion_main!(benches);
