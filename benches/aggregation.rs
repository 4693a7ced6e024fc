use chrono::{Duration, NaiveDate};
use criterion::{Criterion, criterion_group, criterion_main};
use mailstat::{
    aggregation::MetricsAggregator,
    capacity::CapacityEngine,
    filters::StatusFilter,
    report::{EmailReport, ReportConfig, ReportInputs},
    types::{AvailabilityRecord, DateField, ReportingWindow, WorkEvent},
};
use std::hint::black_box;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn create_availability(count: usize) -> Vec<AvailabilityRecord> {
    let base = base_date();
    (0..count)
        .map(|i| {
            let day = base + Duration::days((i / 8) as i64);
            let start = day.and_hms_opt((8 + i % 8) as u32, 0, 0);
            let end = start.map(|s| s + Duration::minutes(55));
            AvailabilityRecord::new(
                if i % 5 == 0 { "Busy" } else { "Available" },
                start,
                end,
            )
        })
        .collect()
}

fn create_events(count: usize) -> Vec<WorkEvent> {
    let base = base_date();
    (0..count)
        .map(|i| {
            let day = base + Duration::days((i / 40) as i64);
            WorkEvent {
                assigned_at: day.and_hms_opt((9 + i % 9) as u32, (i % 60) as u32, 0),
                closed_at: day.and_hms_opt((10 + i % 9) as u32, (i % 60) as u32, 0),
                handle_seconds: if i % 7 == 0 { None } else { Some((120 + i % 600) as f64) },
                ..WorkEvent::default()
            }
        })
        .collect()
}

fn window_days(days: i64) -> ReportingWindow {
    ReportingWindow::new(base_date(), base_date() + Duration::days(days - 1)).unwrap()
}

fn benchmark_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("capacity");
    let engine = CapacityEngine::new(StatusFilter::from_labels(["Available"]));

    for count in [100, 1000] {
        let records = create_availability(count);
        let window = window_days(31);

        group.bench_function(format!("total_available_{count}_records"), |b| {
            b.iter(|| {
                black_box(
                    engine.total_available_seconds(black_box(&records), &window.to_interval()),
                )
            });
        });

        group.bench_function(format!("per_day_{count}_records"), |b| {
            b.iter(|| black_box(engine.available_seconds_per_day(black_box(&records), &window)));
        });
    }

    group.finish();
}

fn benchmark_daily_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("daily_series");

    for count in [100, 1000] {
        let events = create_events(count);
        let aggregator = MetricsAggregator::new(window_days(31));
        let capacity = Default::default();

        group.bench_function(format!("series_{count}_events"), |b| {
            b.iter(|| {
                black_box(aggregator.daily_series(
                    black_box(&events),
                    DateField::Assigned,
                    &capacity,
                ))
            });
        });
    }

    group.finish();
}

fn benchmark_full_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_report");
    group.sample_size(20);

    let availability = create_availability(500);
    let events = create_events(2000);
    let config = ReportConfig::new(window_days(31))
        .with_status_filter(StatusFilter::from_labels(["Available"]));

    group.bench_function("build_monthly_report", |b| {
        b.iter(|| {
            black_box(EmailReport::build(
                &ReportInputs {
                    availability: &availability,
                    handled: &events,
                    received: &events,
                    responses: &events,
                },
                &config,
            ))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_capacity,
    benchmark_daily_series,
    benchmark_full_report
);
criterion_main!(benches);
