//! Performance benchmarks for the payroll engine.
//!
//! Covers the pure calculator and reconciler, a salary save through the
//! service, and the same save over HTTP.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::str::FromStr;

use axum::{body::Body, http::Request};
use chrono::{Days, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::calculation::{apply_deduction, compute_salary};
use payroll_engine::config::{ConfigLoader, PayrollConfig};
use payroll_engine::models::{Advance, Employee, MonthlyVariables, PayMonth};
use payroll_engine::service::PayrollService;
use payroll_engine::store::{MemoryStore, RecordStore};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn test_config() -> ConfigLoader {
    ConfigLoader::from_config(PayrollConfig::with_defaults("Bench Org"))
}

fn worked_example_variables() -> MonthlyVariables {
    MonthlyVariables {
        bonuses: dec("200"),
        overtime_hours: dec("10"),
        overtime_rate: dec("20.83"),
        absence_days: Some(dec("2")),
        penalty_days: dec("1"),
        purchases: dec("300"),
        advances_deducted: dec("500"),
        ..Default::default()
    }
}

/// Creates `count` pending advances of 250 each, newest first.
fn create_advances(count: usize) -> Vec<Advance> {
    (0..count)
        .map(|i| {
            let request_date = base_date() + Days::new((count - i) as u64);
            Advance::new(
                format!("adv_{:04}", i),
                "emp_bench_001",
                dec("250"),
                request_date,
                request_date + Days::new(90),
            )
            .unwrap()
        })
        .collect()
}

fn create_employee(id: &str) -> Employee {
    Employee {
        id: id.to_string(),
        name: format!("Bench {}", id),
        base_pay: dec("5000"),
        monthly_incentive: dec("500"),
        join_date: base_date(),
        position: None,
    }
}

/// Benchmark: one salary calculation.
fn bench_compute_salary(c: &mut Criterion) {
    let variables = worked_example_variables();
    let month = PayMonth::new(2024, 1).unwrap();

    c.bench_function("compute_salary", |b| {
        b.iter(|| {
            black_box(compute_salary(
                black_box(dec("5000")),
                black_box(dec("500")),
                &variables,
                month,
            ))
        })
    });
}

/// Benchmark: reconciling a deduction against growing advance ledgers.
fn bench_apply_deduction(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_deduction");

    for count in [1usize, 10, 100, 1000].iter() {
        let advances = create_advances(*count);
        // covers roughly half the ledger
        let deduction = Decimal::from(*count as u64 * 125);

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("advances", count), count, |b, _| {
            b.iter(|| black_box(apply_deduction(&advances, deduction, base_date())))
        });
    }

    group.finish();
}

/// Benchmark: a salary save through the service, including the store
/// round-trip and reconciliation.
fn bench_service_save(c: &mut Criterion) {
    let store = MemoryStore::new();
    let service = PayrollService::new(store.clone(), test_config());
    service.upsert_employee(create_employee("emp_bench_001")).unwrap();
    store.save_advances(&create_advances(20)).unwrap();
    let month = PayMonth::new(2024, 1).unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

    c.bench_function("service_save_salary", |b| {
        b.iter(|| {
            black_box(
                service
                    .save_salary("emp_bench_001", month, worked_example_variables(), today)
                    .unwrap(),
            )
        })
    });
}

/// Benchmark: saving a batch of 100 salaries over HTTP.
fn bench_http_batch_100(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = AppState::new(test_config());
    for i in 0..100 {
        state
            .service()
            .upsert_employee(create_employee(&format!("emp_batch_{:03}", i)))
            .unwrap();
    }

    let requests: Vec<String> = (0..100)
        .map(|i| {
            serde_json::json!({
                "employee_id": format!("emp_batch_{:03}", i),
                "year": 2024,
                "month": 1,
                "variables": {
                    "bonuses": "200",
                    "overtime_hours": "10",
                    "overtime_rate": "20.83",
                    "absence_days": "2"
                },
                "today": "2024-01-31"
            })
            .to_string()
        })
        .collect();

    let mut group = c.benchmark_group("http_batch");
    group.throughput(Throughput::Elements(100));

    group.bench_function("save_100", |b| {
        b.to_async(&rt).iter(|| async {
            let mut results = Vec::with_capacity(100);
            for body in &requests {
                let router = create_router(state.clone());
                let response = router
                    .oneshot(
                        Request::builder()
                            .method("POST")
                            .uri("/salaries")
                            .header("Content-Type", "application/json")
                            .body(Body::from(body.clone()))
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                results.push(response);
            }
            black_box(results)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_compute_salary,
    bench_apply_deduction,
    bench_service_save,
    bench_http_batch_100,
);
criterion_main!(benches);
