use indexmap::IndexMap;
use itertools::Itertools;

/// Tallies the label in front of each `label: text` line, most frequent first.
///
/// Labels with equal counts keep the order they were first seen in.
pub fn label_counts(context: &str) -> Vec<(&str, usize)> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for (label, _) in context.split('\n').filter_map(|line| line.split_once(':')) {
        *counts.entry(label).or_default() += 1;
    }

    counts
        .into_iter()
        .sorted_by(|(_, left), (_, right)| right.cmp(left))
        .collect()
}
