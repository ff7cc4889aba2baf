use criterion::{black_box, criterion_group, criterion_main, Criterion};
use floorsight::aggregate::{aggregate, AggregateOptions};
use floorsight::dataset::ActivityRecord;
use floorsight::regions::RegionStore;

fn records(count: usize) -> Vec<ActivityRecord> {
    (0..count)
        .map(|i| {
            let start = (i % 86_000) as f64;
            let duration = 2.0 + (i % 600) as f64;
            ActivityRecord {
                employee_id: format!("emp-{}", i % 40),
                date: format!("2024-03-{:02}", 18 + i % 5),
                start_time: start,
                end_time: start + duration,
                region: format!("region-{}", i % 25),
                activity: if i % 3 == 0 { "Walk" } else { "Carry" }.to_string(),
                duration,
            }
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let records = records(100_000);
    let refs: Vec<&ActivityRecord> = records.iter().collect();

    let mut store = RegionStore::default();
    store
        .add_combination(
            "north",
            vec!["region-0".to_string(), "region-1".to_string(), "region-2".to_string()],
        )
        .expect("add");
    let snapshot = store.snapshot();

    c.bench_function("aggregate_durations_100k", |b| {
        b.iter(|| {
            aggregate(
                black_box(&refs),
                "Walk",
                AggregateOptions {
                    show_instances: false,
                    use_combined_regions: true,
                },
                &snapshot,
            )
        })
    });

    c.bench_function("aggregate_instances_100k", |b| {
        b.iter(|| {
            aggregate(
                black_box(&refs),
                "Walk",
                AggregateOptions {
                    show_instances: true,
                    use_combined_regions: false,
                },
                &snapshot,
            )
        })
    });
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
