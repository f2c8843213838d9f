/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ra::prelude::*;
use ra_data_structures::prelude::{Cardinality, Key, VarType, Variable, VariableList};
use ra_data_structures::prelude::ContingencyTable;

fn build_binary_list(n: usize) -> VariableList {
    let vars = (0..n)
        .map(|i| {
            let abbrev = char::from(b'A' + i as u8).to_string();
            Variable::new(abbrev.clone(), abbrev, Cardinality::new(2).unwrap(), false, vec!["0".into(), "1".into()], VarType::Independent).unwrap()
        })
        .collect();
    VariableList::new(vars).unwrap()
}

fn uniform_table(list: &VariableList) -> ContingencyTable {
    let n = list.len();
    let mut table = ContingencyTable::with_capacity(1 << n);
    for mask in 0..(1u32 << n) {
        let values: Vec<u32> = (0..n).map(|i| (mask >> i) & 1).collect();
        table.add(Key::from_values(list, &values).unwrap(), 1.0).unwrap();
    }
    table.sort();
    table.normalize().unwrap();
    table
}

fn bench_model_projection(c: &mut Criterion) {
    let list = build_binary_list(6);
    let table = uniform_table(&list);
    let manager = VBManager::new(&list, &table, 1000.0);
    let model = manager.make_model("AB:BC:CD:DE:EF").unwrap();
    c.bench_function("compute_model_projection_chain_of_6", |b| {
        b.iter(|| black_box(manager.compute_model_projection(&model).unwrap()))
    });
}

fn bench_neighbor_generation(c: &mut Criterion) {
    let list = build_binary_list(6);
    let table = uniform_table(&list);
    let manager = VBManager::new(&list, &table, 1000.0);
    let seed = manager.bottom_ref_model();
    c.bench_function("generate_neighbors_6_variables", |b| {
        b.iter(|| black_box(generate_neighbors(&seed, &list, ra::search::SearchFilter::Loopless)))
    });
}

fn bench_search_driver(c: &mut Criterion) {
    let list = build_binary_list(5);
    let table = uniform_table(&list);
    let config = SearchConfig {
        width: 3,
        max_levels: 2,
        statistic: Statistic::Aic,
        filter: SearchFilter::Loopless,
        direction: Direction::Ascending,
    };
    let driver = SearchDriver::new(&list, &table, 1000.0, config);
    let manager = VBManager::new(&list, &table, 1000.0);
    let seed = manager.bottom_ref_model();
    c.bench_function("search_driver_2_levels_width_3", |b| {
        b.iter(|| black_box(driver.run(seed.clone(), |_| {})))
    });
}

criterion_group!(benches, bench_model_projection, bench_neighbor_generation, bench_search_driver);
criterion_main!(benches);
