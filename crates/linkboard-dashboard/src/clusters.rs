//! Helpers over a cluster-id column. Noise points carry the id `-1` and are never reported
//! as a cluster.

use linkboard_model::{CellLookup, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

const NOISE_ID: f64 = -1.0;

fn is_cluster(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Number(n) => n.0 != NOISE_ID,
        _ => true,
    }
}

fn sort_ids(ids: &mut [Value]) {
    if ids.iter().all(|id| matches!(id, Value::Number(_))) {
        ids.sort_by(|a, b| match (a, b) {
            (Value::Number(x), Value::Number(y)) => x.cmp(y),
            _ => Ordering::Equal,
        });
    } else {
        ids.sort_by_cached_key(|id| id.to_string());
    }
}

/// Distinct cluster ids, sorted numerically when all are numbers and by text otherwise.
pub fn cluster_ids<R: CellLookup>(rows: &[R], column: &str) -> Vec<Value> {
    let mut seen = HashSet::new();
    let mut ids: Vec<Value> = rows
        .iter()
        .filter_map(|row| row.cell(column))
        .filter(|value| is_cluster(value))
        .filter(|value| seen.insert(*value))
        .cloned()
        .collect();
    sort_ids(&mut ids);
    ids
}

/// Number of rows per cluster id, in [`cluster_ids`] order.
pub fn cluster_counts<R: CellLookup>(rows: &[R], column: &str) -> Vec<(Value, usize)> {
    let mut counts: HashMap<&Value, usize> = HashMap::new();
    for value in rows.iter().filter_map(|row| row.cell(column)) {
        if is_cluster(value) {
            *counts.entry(value).or_default() += 1;
        }
    }
    let mut ids: Vec<Value> = counts.keys().map(|v| (*v).clone()).collect();
    sort_ids(&mut ids);
    ids.into_iter()
        .map(|id| {
            let count = counts.get(&id).copied().unwrap_or_default();
            (id, count)
        })
        .collect()
}

/// Rows whose cluster id reads the same as `id` (so `"5"` matches `5`).
pub fn filter_by_cluster<'a, R: CellLookup>(rows: &'a [R], column: &str, id: &Value) -> Vec<&'a R> {
    let wanted = id.to_string();
    rows.iter()
        .filter(|row| row.cell(column).is_some_and(|v| v.to_string() == wanted))
        .collect()
}
