/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ra_data_structures::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn build_list(n: usize, cardinality: u32) -> VariableList {
    let vars = (0..n)
        .map(|i| {
            let labels = (0..cardinality).map(|v| format!("v{v}")).collect();
            Variable::new(format!("var{i}"), format!("V{i}"), Cardinality::new(cardinality).unwrap(), false, labels, VarType::Independent)
                .unwrap()
        })
        .collect();
    VariableList::new(vars).unwrap()
}

fn bench_key_construction(c: &mut Criterion) {
    let list = build_list(12, 4);
    let mut rng = SmallRng::seed_from_u64(42);
    c.bench_function("key_from_values_12_vars", |b| {
        b.iter(|| {
            let values: Vec<u32> = (0..12).map(|_| rng.gen_range(0..4)).collect();
            black_box(Key::from_values(&list, &values).unwrap());
        })
    });
}

fn bench_table_project(c: &mut Criterion) {
    let list = build_list(8, 3);
    let mut rng = SmallRng::seed_from_u64(7);
    let mut table = ContingencyTable::with_capacity(2_000);
    for _ in 0..2_000 {
        let values: Vec<u32> = (0..8).map(|_| rng.gen_range(0..3)).collect();
        table.add(Key::from_values(&list, &values).unwrap(), 1.0).unwrap();
    }
    let keep = vec![VariableIndex::new(0), VariableIndex::new(2), VariableIndex::new(4)];
    c.bench_function("contingency_table_project_8_to_3_vars", |b| {
        b.iter(|| black_box(table.project(&list, &keep).unwrap()))
    });
}

criterion_group!(benches, bench_key_construction, bench_table_project);
criterion_main!(benches);
