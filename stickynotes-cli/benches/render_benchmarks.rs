//! Rendering benchmarks for the board table and shell command parsing

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stickynotes::storage::{MemoryKeyValueStore, PersistenceGateway};
use stickynotes::NoteStore;
use stickynotes_cli::display::{render_board, RenderOptions};
use stickynotes_cli::shell::parse_command;

fn board(size: usize) -> NoteStore {
    let mut store = NoteStore::load(PersistenceGateway::new(
        Box::new(MemoryKeyValueStore::new()),
        "notes",
    ));
    for i in 0..size {
        store
            .create(
                format!("Note {} with <b>some</b> text<br>and a second line", i),
                None,
                None,
            )
            .unwrap();
    }
    store
}

fn bench_render_board(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_board");
    let options = RenderOptions::default();

    for size in [10, 100, 500] {
        let store = board(size);
        group.bench_with_input(BenchmarkId::new("all", size), &store, |b, store| {
            b.iter(|| black_box(render_board(store, None, &options)))
        });
        group.bench_with_input(BenchmarkId::new("search", size), &store, |b, store| {
            b.iter(|| black_box(render_board(store, Some("note 4"), &options)))
        });
    }

    group.finish();
}

fn bench_parse_command(c: &mut Criterion) {
    let lines = [
        "add Buy milk and eggs",
        "search milk",
        "edit 3 replaced text",
        "bg #ffee88",
        "summarize 12",
    ];
    c.bench_function("parse_command", |b| {
        b.iter(|| {
            for line in &lines {
                black_box(parse_command(black_box(line)).ok());
            }
        })
    });
}

criterion_group!(benches, bench_render_board, bench_parse_command);
criterion_main!(benches);
