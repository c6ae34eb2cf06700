use crate::error::GenError;
use crate::layout::{Classifier, RootSet, TypeRegistry};
use indexmap::{IndexMap, IndexSet};
use std::collections::{BTreeSet, HashSet, VecDeque};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclePath {
    pub cycle: Vec<String>,
}

/// Struct composition graph. An edge `A -> B` means A holds a B by value
/// (directly or as a fixed array), so B must be emitted before A. Enums
/// are not nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    /// Registry order.
    adjacency: IndexMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn build(registry: &TypeRegistry, classifier: &Classifier<'_>) -> Self {
        let mut adjacency = IndexMap::new();

        for (name, def) in registry.structs() {
            let mut deps: IndexSet<String> = IndexSet::new();
            for field in &def.fields {
                if let Some(dep) = classifier.classify(&field.declared_type).struct_dependency() {
                    deps.insert(dep.to_string());
                }
            }
            adjacency.insert(name.to_string(), deps.into_iter().collect());
        }

        Self { adjacency }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.adjacency.contains_key(name)
    }

    /// Direct dependencies in field order.
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.adjacency.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Breadth-first walk over "depends on" edges. Roots are seeded in order
    /// and the result is in discovery order.
    pub fn reachable_from(&self, roots: &[String]) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut discovered = Vec::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        for root in roots {
            if self.contains(root) && seen.insert(root.as_str()) {
                queue.push_back(root.as_str());
            }
        }

        while let Some(node) = queue.pop_front() {
            discovered.push(node.to_string());
            for dep in self.dependencies_of(node) {
                if seen.insert(dep.as_str()) {
                    queue.push_back(dep.as_str());
                }
            }
        }

        discovered
    }

    /// Definition order: every struct after the structs it composes, helpers
    /// before roots.
    ///
    /// With roots, only structs reachable from them take part and ties are
    /// broken by discovery order; without roots all structs take part and
    /// ties follow registry order. Roots keep their caller order except where
    /// one root composes another.
    pub fn topological_order(&self, roots: Option<&RootSet>) -> Result<Vec<String>, GenError> {
        let Some(roots) = roots else {
            let nodes: Vec<String> = self.adjacency.keys().cloned().collect();
            return self.kahn(&nodes);
        };

        let discovered = self.reachable_from(roots.names());
        let order = self.kahn(&discovered)?;

        let mut helpers: Vec<String> = Vec::with_capacity(order.len());
        for name in order {
            if !roots.contains(&name) {
                helpers.push(name);
            }
        }

        /* Caller order is the tie-break among roots */
        let mut root_order = self.kahn(roots.names())?;
        helpers.append(&mut root_order);

        debug!(order = ?helpers, "computed struct definition order");
        Ok(helpers)
    }

    /* Kahn's algorithm restricted to `nodes`; the slice order is the priority */
    fn kahn(&self, nodes: &[String]) -> Result<Vec<String>, GenError> {
        let index: IndexMap<&str, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.as_str(), i)).collect();

        let mut pending = vec![0usize; nodes.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];

        for (i, node) in nodes.iter().enumerate() {
            for dep in self.dependencies_of(node) {
                if let Some(&d) = index.get(dep.as_str()) {
                    pending[i] += 1;
                    dependents[d].push(i);
                }
            }
        }

        let mut ready: BTreeSet<usize> =
            pending.iter().enumerate().filter(|&(_, &n)| n == 0).map(|(i, _)| i).collect();
        let mut order = Vec::with_capacity(nodes.len());

        while let Some(next) = ready.pop_first() {
            order.push(nodes[next].clone());
            for &dependent in &dependents[next] {
                pending[dependent] -= 1;
                if pending[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if order.len() != nodes.len() {
            let types: Vec<String> = nodes
                .iter()
                .enumerate()
                .filter(|&(i, _)| pending[i] > 0)
                .map(|(_, n)| n.clone())
                .collect();
            return Err(GenError::SchemaCycle { types });
        }

        Ok(order)
    }

    /// Detect cycles using DFS with cycle detection
    pub fn detect_cycles(&self) -> Vec<CyclePath> {
        let mut cycles = Vec::new();
        let mut visited = HashSet::new();
        let mut on_stack = HashSet::new();
        let mut path = Vec::new();

        for node in self.adjacency.keys() {
            if !visited.contains(node.as_str()) {
                self.dfs_cycle_detection(node, &mut visited, &mut on_stack, &mut path, &mut cycles);
            }
        }

        cycles
    }

    fn dfs_cycle_detection<'g>(
        &'g self,
        node: &'g str,
        visited: &mut HashSet<&'g str>,
        on_stack: &mut HashSet<&'g str>,
        path: &mut Vec<&'g str>,
        cycles: &mut Vec<CyclePath>,
    ) {
        visited.insert(node);
        on_stack.insert(node);
        path.push(node);

        for neighbor in self.dependencies_of(node) {
            let neighbor = neighbor.as_str();
            if !visited.contains(neighbor) {
                self.dfs_cycle_detection(neighbor, visited, on_stack, path, cycles);
            } else if on_stack.contains(neighbor) {
                if let Some(start) = path.iter().position(|n| *n == neighbor) {
                    let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
                    cycle.push(neighbor.to_string());
                    cycles.push(CyclePath { cycle });
                }
            }
        }

        path.pop();
        on_stack.remove(node);
    }
}

#[cfg(test)]
#[path = "dependency_tests.rs"]
mod dependency_tests;
