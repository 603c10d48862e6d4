//! Rule-to-rule overrides.
//!
//! A rule may name other rules it supersedes. When both match at the exact same
//! start offset, the superseded rule's match is dropped. Overlapping spans that
//! start at different offsets are left alone.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::evaluate::Match;
use crate::rules::CompiledRule;

/// Remove every match superseded by another match at the same start offset.
///
/// A match marked by several overriding rules is removed once. Relative order
/// of the survivors is preserved. Mutual overrides at one offset remove both
/// matches; see [`find_override_cycles`].
pub fn resolve_overrides(matches: Vec<Match>) -> Vec<Match> {
    let mut removed: HashSet<usize> = HashSet::new();

    for (i, m) in matches.iter().enumerate() {
        for target in &m.rule.overrides {
            for (idx, om) in matches.iter().enumerate() {
                if idx != i && om.start == m.start && om.rule_id() == target.as_str() {
                    removed.insert(idx);
                }
            }
        }
    }

    if removed.is_empty() {
        return matches;
    }

    matches
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| !removed.contains(idx))
        .map(|(_, m)| m)
        .collect()
}

/// Override cycles among `rules`, each as the list of rule ids along the cycle
/// with the first id repeated at the end (`["A", "B", "A"]`).
///
/// Targets that name no loaded rule are ignored.
pub fn find_override_cycles(rules: &[CompiledRule]) -> Vec<Vec<String>> {
    let graph: BTreeMap<&str, Vec<&str>> = rules
        .iter()
        .map(|r| (r.id.as_str(), r.overrides.iter().map(String::as_str).collect()))
        .collect();

    let mut cycles = Vec::new();
    let mut done: BTreeSet<&str> = BTreeSet::new();
    let mut path: Vec<&str> = Vec::new();

    for &start in graph.keys() {
        visit(start, &graph, &mut path, &mut done, &mut cycles);
    }

    cycles
}

fn visit<'a>(
    node: &'a str,
    graph: &BTreeMap<&'a str, Vec<&'a str>>,
    path: &mut Vec<&'a str>,
    done: &mut BTreeSet<&'a str>,
    cycles: &mut Vec<Vec<String>>,
) {
    if done.contains(node) {
        return;
    }
    if let Some(pos) = path.iter().position(|n| *n == node) {
        let mut cycle: Vec<String> = path[pos..].iter().map(|s| s.to_string()).collect();
        cycle.push(node.to_string());
        cycles.push(cycle);
        return;
    }
    let Some(targets) = graph.get(node) else {
        return;
    };

    path.push(node);
    for &t in targets {
        visit(t, graph, path, done, cycles);
    }
    path.pop();
    done.insert(node);
}
