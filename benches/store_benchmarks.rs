//! Experiment store benchmarks
//!
//! Every transaction reloads and (for writes) rewrites the whole file, so
//! cost grows with the amount of data already recorded. These benchmarks
//! measure that growth on files the size of a short and a long acquisition
//! day.
//!
//! Run with: cargo bench --bench store_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use flylab_data::counter::SeriesCounter;
use flylab_data::params::{ParamMap, StimParameters};
use flylab_data::session::ExperimentSession;
use serde_json::json;
use tempfile::TempDir;

const EPOCHS_PER_SERIES: u32 = 20;
const SERIES_COUNTS: [u32; 3] = [1, 10, 40];

fn params(v: serde_json::Value) -> ParamMap {
    v.as_object().cloned().unwrap_or_default()
}

/// Session attached to a file holding `series` series of
/// `EPOCHS_PER_SERIES` epochs each, all on one fly.
fn populated(series: u32) -> (TempDir, ExperimentSession) {
    let dir = tempfile::tempdir().unwrap();
    let mut session = ExperimentSession::new(SeriesCounter::single());
    session
        .initialize_experiment_file(dir.path().join("bench.json"))
        .unwrap();
    session.create_fly(&params(json!({"fly_id": "fly1"}))).unwrap();

    let stim = StimParameters::from(params(json!({
        "name": "MovingRectangle",
        "width": 10.0,
        "height": 120.0,
        "color": 1.0,
        "angle": 0.0,
        "center": [0.0, 0.0],
    })));
    for _ in 0..series {
        session
            .create_series(&params(json!({"num_epochs": EPOCHS_PER_SERIES})), &ParamMap::new())
            .unwrap();
        for n in 1..=EPOCHS_PER_SERIES {
            session
                .create_epoch(n, &stim, &params(json!({"current_angle": n * 15})))
                .unwrap();
        }
    }
    (dir, session)
}

/// Read path: list every series of a fly
fn bench_list_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_series");
    for series in SERIES_COUNTS {
        let (_dir, session) = populated(series);
        group.bench_with_input(BenchmarkId::from_parameter(series), &session, |b, s| {
            b.iter(|| black_box(s.list_series("fly1").unwrap()));
        });
    }
    group.finish();
}

/// Write path: one epoch into an already populated file
fn bench_create_epoch(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_epoch");
    group.sample_size(20);
    let stim = StimParameters::from(params(json!({"color": 0.5})));
    for series in SERIES_COUNTS {
        group.bench_with_input(BenchmarkId::from_parameter(series), &series, |b, &n| {
            b.iter_batched(
                || {
                    let (dir, mut session) = populated(n);
                    session.create_series(&ParamMap::new(), &ParamMap::new()).unwrap();
                    (dir, session)
                },
                |(_dir, mut session)| {
                    session.create_epoch(1, &stim, &ParamMap::new()).unwrap();
                },
                BatchSize::PerIteration,
            );
        });
    }
    group.finish();
}

/// Counter reload scans every series of every fly
fn bench_reload_counter(c: &mut Criterion) {
    let mut group = c.benchmark_group("reload_counter");
    for series in SERIES_COUNTS {
        let (dir, mut session) = populated(series);
        session.close_experiment_file();
        let path = dir.path().join("bench.json");
        group.bench_function(BenchmarkId::from_parameter(series), |b| {
            b.iter(|| {
                session.open_experiment_file(&path).unwrap();
                black_box(session.series_count())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_list_series, bench_create_epoch, bench_reload_counter);
criterion_main!(benches);
