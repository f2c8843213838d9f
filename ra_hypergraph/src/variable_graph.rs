// SPDX-License-Identifier: MIT
// Copyright (c) "2025" . Marvin Hansen <marvin.hansen@gmail.com> All rights reserved.

use petgraph::algo::{connected_components, is_cyclic_undirected};
use petgraph::graph::{NodeIndex, UnGraph};
use ra_data_structures::prelude::VariableIndex;
use std::collections::HashMap;

/// Co-occurrence graph over variables: one node per variable, one edge per
/// two-variable relation. Used to test the chain predicate — a model is a
/// chain iff its two-variable relations form a simple path over all of its
/// variables (connected, acyclic, every variable has degree <= 2).
///
/// `petgraph`'s default node index type is `u32` (see
/// [`petgraph::graph::DefaultIx`]), which already gives this graph the same
/// >65k node headroom the sibling hypergraph storage needed a non-default
/// index type for.
#[derive(Debug, Clone, Default)]
pub struct VariableGraph {
    graph: UnGraph<VariableIndex, ()>,
    nodes: HashMap<VariableIndex, NodeIndex>,
}

impl VariableGraph {
    pub fn new() -> Self {
        Self { graph: UnGraph::new_undirected(), nodes: HashMap::new() }
    }

    /// Builds the co-occurrence graph of a model's two-variable relations.
    /// Relations with more than two variables don't contribute edges here —
    /// the chain predicate is defined only over two-variable relation sets.
    pub fn from_two_variable_relations(relations: &[[VariableIndex; 2]]) -> Self {
        let mut graph = Self::new();
        for &[a, b] in relations {
            graph.connect(a, b);
        }
        graph
    }

    pub fn add_variable(&mut self, variable: VariableIndex) -> NodeIndex {
        *self
            .nodes
            .entry(variable)
            .or_insert_with(|| self.graph.add_node(variable))
    }

    pub fn connect(&mut self, a: VariableIndex, b: VariableIndex) {
        let a_idx = self.add_variable(a);
        let b_idx = self.add_variable(b);
        if !self.graph.contains_edge(a_idx, b_idx) {
            self.graph.add_edge(a_idx, b_idx, ());
        }
    }

    pub fn number_variables(&self) -> usize {
        self.graph.node_count()
    }

    pub fn number_edges(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn degree(&self, variable: VariableIndex) -> usize {
        self.nodes
            .get(&variable)
            .map(|&idx| self.graph.neighbors(idx).count())
            .unwrap_or(0)
    }

    /// A chain is a connected, acyclic graph where every node has degree
    /// <= 2 — i.e. a simple path (or, degenerately, a single node/edge).
    pub fn is_chain(&self) -> bool {
        if self.graph.node_count() == 0 {
            return false;
        }
        if is_cyclic_undirected(&self.graph) {
            return false;
        }
        if connected_components(&self.graph) != 1 {
            return false;
        }
        self.graph.node_indices().all(|idx| self.graph.neighbors(idx).count() <= 2)
    }
}
