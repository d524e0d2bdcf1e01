use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rust_excel_toolkit::types::{DataSet, DataType, Field, Schema, Value};
use rust_excel_toolkit::validation::{validate_dataset, ExpectedType, ValidationSchema};

fn employees(rows: usize) -> DataSet {
    let schema = Schema::new(vec![
        Field::new("Nome", DataType::Utf8),
        Field::new("Idade", DataType::Float64),
        Field::new("Salario", DataType::Float64),
    ]);
    let rows = (0..rows)
        .map(|i| {
            vec![
                Value::Utf8(format!("employee-{i}")),
                if i % 17 == 0 { Value::Null } else { Value::Float64((20 + i % 45) as f64) },
                Value::Float64(1000.0 + i as f64 * 0.25),
            ]
        })
        .collect();
    DataSet::new(schema, rows)
}

fn bench_validate(c: &mut Criterion) {
    let ds = employees(100_000);
    let schema = ValidationSchema::new()
        .column("Nome", ExpectedType::Text)
        .column("Idade", ExpectedType::Integer)
        .column("Salario", ExpectedType::Float)
        .column("Departamento", ExpectedType::Text);

    c.bench_function("validate_dataset_100k", |b| {
        b.iter(|| validate_dataset(black_box(&ds), black_box(&schema)))
    });
}

criterion_group!(benches, bench_validate);
criterion_main!(benches);
