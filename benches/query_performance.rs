use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use expense_tracker::core::{FixedClock, LedgerStore, QueryEngine};
use expense_tracker::ledger::{AnalyticsPeriod, Category, ExpenseDraft, Ledger};
use expense_tracker::storage::{JsonFileStore, KeyValueStore};
use tempfile::tempdir;

fn reference_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 6, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn build_sample_ledger(count: usize) -> Ledger {
    let clock = FixedClock(reference_now());
    let mut ledger = Ledger::new();
    let today = reference_now().date();

    for idx in 0..count {
        let category = Category::ALL[idx % Category::ALL.len()];
        let draft = ExpenseDraft::new(
            5.0 + (idx % 100) as f64,
            format!("Sample expense {idx}"),
            category,
            today - Duration::days((idx % 400) as i64),
        );
        ledger.add(&draft, &clock).expect("valid sample expense");
    }
    ledger
}

fn bench_queries(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(10_000));
    let expenses = ledger.expenses();
    let now = reference_now();

    c.bench_function("filter_search_10k", |b| {
        b.iter(|| {
            let visible = QueryEngine::filtered(expenses, Some(Category::Food), "expense 9");
            black_box(visible);
        })
    });

    c.bench_function("analytics_last30_10k", |b| {
        b.iter(|| {
            let report = QueryEngine::analytics(expenses, AnalyticsPeriod::Last30Days, now);
            black_box(report);
        })
    });

    c.bench_function("analytics_all_time_10k", |b| {
        b.iter(|| {
            let report = QueryEngine::analytics(expenses, AnalyticsPeriod::AllTime, now);
            black_box(report);
        })
    });

    c.bench_function("budget_status_10k", |b| {
        b.iter(|| black_box(QueryEngine::budget_status(expenses, 1_000.0, now)))
    });
}

fn bench_snapshot_io(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let storage: Arc<dyn KeyValueStore> =
        Arc::new(JsonFileStore::new(Some(dir.path().to_path_buf())).expect("store"));
    let snapshot = serde_json::to_string(&ledger).expect("serialize ledger");

    c.bench_function("snapshot_save_10k", |b| {
        b.iter(|| storage.set("expenses", &snapshot).expect("save snapshot"))
    });

    c.bench_function("snapshot_load_10k", |b| {
        b.iter_batched(
            || LedgerStore::new(storage.clone()),
            |mut store| {
                let report = store.load_from_storage();
                black_box(report.count);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_queries, bench_snapshot_io);
criterion_main!(benches);
