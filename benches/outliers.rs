use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use car_sales_preprocessing::columns::PRICE;
use car_sales_preprocessing::processing::clean::{remove_outliers, DEFAULT_ZSCORE_THRESHOLD};
use car_sales_preprocessing::types::{DataSet, DataType, Field, Schema, Value};

fn price_dataset(n: usize) -> DataSet {
    let schema = Schema::new(vec![
        Field::new("id", DataType::Int64),
        Field::new(PRICE, DataType::Float64),
    ]);
    let rows = (0..n)
        .map(|i| {
            // Mostly 10k..40k with a far value every 1000 rows.
            let price = if i % 1000 == 999 {
                5_000_000.0
            } else {
                10_000.0 + ((i * 7919) % 30_000) as f64
            };
            vec![Value::Int64(i as i64), Value::Float64(price)]
        })
        .collect();
    DataSet::new(schema, rows)
}

fn bench_remove_outliers(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_outliers");
    for n in [1_000usize, 25_000, 100_000] {
        let ds = price_dataset(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &ds, |b, ds| {
            b.iter(|| remove_outliers(black_box(ds), PRICE, DEFAULT_ZSCORE_THRESHOLD).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_remove_outliers);
criterion_main!(benches);
