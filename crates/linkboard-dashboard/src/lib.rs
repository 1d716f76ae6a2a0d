//! Reactive state engines behind the request dashboard.
//!
//! Each engine owns its state and notifies registered observers synchronously from the
//! mutating call:
//! - [`FilterEngine`]: named column filters, ANDed across filters and ORed within one.
//! - [`LinkageEngine`]: hover and selection id sets shared between widgets.
//!
//! The remaining modules are pure functions over borrowed input: layer colouring roles,
//! timeline track allocation, time bins and cluster helpers. [`StyleResolver`] resolves
//! theme colours for an explicitly attached [`ColorModeSignal`].

#![forbid(unsafe_code)]

pub mod clusters;
pub mod config;
pub mod filter;
pub mod layer_coloring;
pub mod linkage;
pub mod matching;
pub mod style;
pub mod time_bins;
pub mod tracks;

pub use crate::config::{
    ConfigError, CorrelationSettings, DashboardConfig, HoverAction, LinkageConfig, SelectAction,
};
pub use crate::filter::{Filter, FilterBehavior, FilterEngine, FilterMap, FilterObserver, FilterType};
pub use crate::layer_coloring::{
    compute_all_layer_roles, compute_layer_groups, compute_layer_role, ColorByRole, LayerColoring,
    LayerColoringRole, LayerDescriptor, LayerGroup, LayerLinkage, LayerRole, LayerStrategy,
};
pub use crate::linkage::{AttributePair, IdSet, LinkageEngine, LinkageObserver};
pub use crate::matching::values_match;
pub use crate::style::{
    categorical_color, ClusterColors, ColorMode, ColorModeSignal, HexColor, StyleError,
    StyleResolver, DIMMED_ALPHA, FALLBACK_COLOR,
};
pub use crate::time_bins::{parse_time_bin, TimeBin, TimeBinError};
pub use crate::tracks::{allocate_tracks, TimelineItem, TrackAllocation};
