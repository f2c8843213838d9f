/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use ra_data_structures::prelude::*;

fn three_binary_vars() -> VariableList {
    let vars = ["A", "B", "C"]
        .iter()
        .map(|&abbrev| Variable::new(abbrev, abbrev, Cardinality::new(2).unwrap(), false, vec!["0".into(), "1".into()], VarType::Independent).unwrap())
        .collect();
    VariableList::new(vars).unwrap()
}

#[test]
fn projecting_onto_all_variables_is_a_no_op() {
    let list = three_binary_vars();
    let key = Key::from_values(&list, &[1, 0, 1]).unwrap();
    let all = [VariableIndex::new(0), VariableIndex::new(1), VariableIndex::new(2)];
    let projected = key.project(&list, &all);
    assert_eq!(projected, key);
}

#[test]
fn projecting_onto_a_subset_marks_the_rest_dont_care() {
    let list = three_binary_vars();
    let key = Key::from_values(&list, &[1, 0, 1]).unwrap();
    let projected = key.project(&list, &[VariableIndex::new(0)]);

    assert!(!projected.is_dont_care(&list, VariableIndex::new(0)).unwrap());
    assert!(projected.is_dont_care(&list, VariableIndex::new(1)).unwrap());
    assert!(projected.is_dont_care(&list, VariableIndex::new(2)).unwrap());
}

#[test]
fn two_keys_that_agree_on_the_kept_subset_project_to_the_same_key() {
    let list = three_binary_vars();
    let keep = [VariableIndex::new(0)];
    let k1 = Key::from_values(&list, &[1, 0, 0]).unwrap().project(&list, &keep);
    let k2 = Key::from_values(&list, &[1, 1, 1]).unwrap().project(&list, &keep);
    assert_eq!(k1, k2);
}
