use std::cmp::Reverse;
use std::collections::HashMap;

use crate::data::model::{Column, VehicleRecord};

use super::{Bin, Hierarchy, HierarchyNode};

/// Count occurrences of each non-blank value, largest first.
///
/// Equal counts keep the order in which the values were first seen, so the
/// ranking is deterministic for a given input order.
pub fn value_counts<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Vec<(String, usize)> {
    let mut tally: HashMap<&str, (usize, usize)> = HashMap::new();
    for (pos, value) in values.into_iter().flatten().enumerate() {
        tally.entry(value).or_insert((pos, 0)).1 += 1;
    }

    let mut counts: Vec<(&str, (usize, usize))> = tally.into_iter().collect();
    counts.sort_by_key(|&(_, (first_seen, count))| (Reverse(count), first_seen));
    counts
        .into_iter()
        .map(|(value, (_, count))| (value.to_string(), count))
        .collect()
}

/// The `n` most frequent non-blank values, see [`value_counts`].
pub fn top_n<'a>(values: impl IntoIterator<Item = Option<&'a str>>, n: usize) -> Vec<(String, usize)> {
    let mut counts = value_counts(values);
    counts.truncate(n);
    counts
}

/// Count records per path through `levels`. Records with a blank value at
/// any level are left out.
pub fn hierarchy<'a>(
    records: impl IntoIterator<Item = &'a VehicleRecord>,
    levels: &[Column],
) -> Hierarchy {
    let level_names = levels.iter().map(|c| c.header().to_string()).collect();
    if levels.is_empty() {
        return Hierarchy {
            levels: level_names,
            nodes: Vec::new(),
        };
    }

    let paths: Vec<Vec<&str>> = records
        .into_iter()
        .filter_map(|r| {
            levels
                .iter()
                .map(|c| r.category(*c))
                .collect::<Option<Vec<&str>>>()
        })
        .collect();

    let mut nodes = Vec::new();
    push_level(&paths, None, 0, levels.len(), &mut nodes);
    Hierarchy {
        levels: level_names,
        nodes,
    }
}

fn push_level(
    paths: &[Vec<&str>],
    parent: Option<&str>,
    depth: usize,
    width: usize,
    nodes: &mut Vec<HierarchyNode>,
) {
    for (label, value) in value_counts(paths.iter().map(|p| Some(p[depth]))) {
        let id = match parent {
            Some(p) => format!("{p}/{}", id_segment(&label)),
            None => id_segment(&label),
        };
        nodes.push(HierarchyNode {
            id: id.clone(),
            label: label.clone(),
            parent: parent.map(str::to_string),
            value,
            depth,
        });

        if depth + 1 < width {
            let below: Vec<Vec<&str>> = paths
                .iter()
                .filter(|p| p[depth] == label)
                .cloned()
                .collect();
            push_level(&below, Some(&id), depth + 1, width, nodes);
        }
    }
}

/// Percent-escape `%` and `/` so a label containing the separator cannot
/// collide with a deeper path.
fn id_segment(label: &str) -> String {
    label.replace('%', "%25").replace('/', "%2F")
}

/// Equal-width histogram with exactly `bins` bins over the observed range.
///
/// Bins are half-open except the last, which also takes the maximum. A single
/// distinct value gets a unit-wide range centred on it. No values, no bins.
pub fn histogram(values: impl IntoIterator<Item = i32>, bins: usize) -> Vec<Bin> {
    let values: Vec<f64> = values.into_iter().map(f64::from).collect();
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if hi - lo <= 0.0 {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in &values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: lo + i as f64 * width,
            end: if i + 1 == bins { hi } else { lo + (i + 1) as f64 * width },
            count,
        })
        .collect()
}
