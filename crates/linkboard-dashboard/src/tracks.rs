//! Greedy interval partitioning for timeline swim lanes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A half-open interval `[start, end)` on the timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub id: String,
    pub start: f64,
    pub end: f64,
}

impl TimelineItem {
    pub fn new(id: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            id: id.into(),
            start,
            end,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackAllocation {
    pub track_index: usize,
    pub total_tracks: usize,
}

/// Assigns every item to the lowest-numbered free track.
///
/// Items are visited in `(start, end)` order; a track is free when its last interval ended at
/// or before the item's start, so touching intervals share a track. The resulting track count
/// equals the maximum number of simultaneously active intervals.
pub fn allocate_tracks(items: &[TimelineItem]) -> HashMap<String, TrackAllocation> {
    let mut order: Vec<&TimelineItem> = items.iter().collect();
    order.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.end.total_cmp(&b.end)));

    let mut track_ends: Vec<f64> = Vec::new();
    let mut allocations: HashMap<String, TrackAllocation> = HashMap::with_capacity(items.len());

    for item in order {
        let track_index = match track_ends.iter().position(|&end| end <= item.start) {
            Some(idx) => {
                track_ends[idx] = item.end;
                idx
            }
            None => {
                track_ends.push(item.end);
                track_ends.len() - 1
            }
        };
        allocations.insert(
            item.id.clone(),
            TrackAllocation {
                track_index,
                total_tracks: 0,
            },
        );
    }

    let total_tracks = track_ends.len();
    for allocation in allocations.values_mut() {
        allocation.total_tracks = total_tracks;
    }
    allocations
}
