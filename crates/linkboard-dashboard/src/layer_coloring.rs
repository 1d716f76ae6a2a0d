//! Decides which visible map layers receive data-driven colouring.
//!
//! Layers sharing a (case-insensitive) `linkage.geoProperty` form a [`LayerGroup`]. When an
//! arc layer and area layers describe the same relationship, the `auto` strategy lets the arc
//! carry the colour and renders the areas neutrally so only one of them dominates.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Per-layer override from the layer configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorByRole {
    Primary,
    Secondary,
    Neutral,
    #[default]
    Auto,
}

/// Dashboard-level strategy applied to layers without an explicit role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerStrategy {
    #[default]
    Auto,
    Explicit,
    All,
}

/// The resolved colouring role of a layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerRole {
    /// Full data-driven colouring.
    Primary,
    /// Subdued data-driven colouring.
    Secondary,
    /// Theme colours only.
    Neutral,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerLinkage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_column: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDescriptor {
    pub name: String,
    /// Layer kind, e.g. `arc`, `polygon`, `line`, `point`.
    #[serde(rename = "type")]
    pub layer_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkage: Option<LayerLinkage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_by_role: Option<ColorByRole>,
}

impl LayerDescriptor {
    pub fn new(name: impl Into<String>, layer_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layer_type: layer_type.into(),
            linkage: None,
            color_by_role: None,
        }
    }

    pub fn with_geo_property(mut self, geo_property: impl Into<String>) -> Self {
        self.linkage
            .get_or_insert_with(LayerLinkage::default)
            .geo_property = Some(geo_property.into());
        self
    }

    pub fn with_color_by_role(mut self, role: ColorByRole) -> Self {
        self.color_by_role = Some(role);
        self
    }

    pub fn is_arc(&self) -> bool {
        self.layer_type == "arc"
    }

    /// The key of the group this layer belongs to.
    pub fn group_key(&self) -> String {
        match self
            .linkage
            .as_ref()
            .and_then(|l| l.geo_property.as_deref())
            .filter(|p| !p.is_empty())
        {
            Some(property) => property.to_lowercase(),
            None => format!("__standalone_{}", self.name),
        }
    }
}

/// Layers sharing one linkage property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerGroup<'a> {
    pub geo_property: String,
    pub layers: Vec<&'a LayerDescriptor>,
    pub has_arc: bool,
    /// Number of non-arc layers.
    pub geometry_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerColoringRole {
    pub layer_name: String,
    pub role: LayerRole,
    /// Human-readable audit text. Not stable.
    pub reason: String,
}

pub fn compute_layer_groups(layers: &[LayerDescriptor]) -> BTreeMap<String, LayerGroup<'_>> {
    let mut groups: BTreeMap<String, LayerGroup<'_>> = BTreeMap::new();
    for layer in layers {
        let key = layer.group_key();
        let group = groups.entry(key.clone()).or_insert_with(|| LayerGroup {
            geo_property: key,
            layers: Vec::new(),
            has_arc: false,
            geometry_count: 0,
        });
        group.layers.push(layer);
        if layer.is_arc() {
            group.has_arc = true;
        } else {
            group.geometry_count += 1;
        }
    }
    groups
}

pub fn compute_layer_role(
    layer: &LayerDescriptor,
    group: &LayerGroup<'_>,
    strategy: LayerStrategy,
) -> LayerColoringRole {
    let (role, reason) = resolve(layer, group, strategy);
    LayerColoringRole {
        layer_name: layer.name.clone(),
        role,
        reason,
    }
}

fn resolve(
    layer: &LayerDescriptor,
    group: &LayerGroup<'_>,
    strategy: LayerStrategy,
) -> (LayerRole, String) {
    let explicit = match layer.color_by_role {
        Some(ColorByRole::Primary) => Some(LayerRole::Primary),
        Some(ColorByRole::Secondary) => Some(LayerRole::Secondary),
        Some(ColorByRole::Neutral) => Some(LayerRole::Neutral),
        Some(ColorByRole::Auto) | None => None,
    };
    if let Some(role) = explicit {
        return (role, format!("explicit colorByRole: {role:?}"));
    }

    match strategy {
        LayerStrategy::All => return (LayerRole::Primary, "strategy all".into()),
        LayerStrategy::Explicit => {
            return (LayerRole::Neutral, "strategy explicit, no colorByRole".into())
        }
        LayerStrategy::Auto => {}
    }

    let is_arc = layer.is_arc();
    if group.has_arc && group.geometry_count > 0 {
        return if is_arc {
            (LayerRole::Primary, "auto: arc leads its geometry layers".into())
        } else {
            (LayerRole::Neutral, "auto: geometry yields to arc".into())
        };
    }
    if is_arc {
        return (LayerRole::Primary, "auto: lone arc".into());
    }
    if group.geometry_count == 1 {
        return (LayerRole::Primary, "auto: single geometry".into());
    }
    (LayerRole::Primary, "auto: geometries without arc".into())
}

/// Roles for every layer, keyed by layer name. A later layer with a duplicate name replaces
/// the earlier entry.
pub fn compute_all_layer_roles(
    layers: &[LayerDescriptor],
    strategy: LayerStrategy,
) -> HashMap<String, LayerColoringRole> {
    let mut roles = HashMap::with_capacity(layers.len());
    if layers.is_empty() {
        return roles;
    }

    let groups = compute_layer_groups(layers);
    log::trace!("layer roles: {} layer(s), strategy {strategy:?}", layers.len());
    for (key, group) in &groups {
        log::trace!(
            "layer group {key}: {} layer(s), has_arc={}, geometry_count={}",
            group.layers.len(),
            group.has_arc,
            group.geometry_count
        );
    }

    for layer in layers {
        let Some(group) = groups.get(&layer.group_key()) else {
            continue;
        };
        let role = compute_layer_role(layer, group, strategy);
        log::trace!("layer {}: {:?} ({})", layer.name, role.role, role.reason);
        roles.insert(layer.name.clone(), role);
    }
    roles
}

/// Caches the roles of the last render cycle.
#[derive(Clone, Debug, Default)]
pub struct LayerColoring {
    strategy: LayerStrategy,
    roles: HashMap<String, LayerColoringRole>,
}

impl LayerColoring {
    pub fn new(strategy: LayerStrategy) -> Self {
        Self {
            strategy,
            roles: HashMap::new(),
        }
    }

    pub fn strategy(&self) -> LayerStrategy {
        self.strategy
    }

    /// Changes the strategy. Cached roles stay until the next [`LayerColoring::compute_roles`].
    pub fn set_strategy(&mut self, strategy: LayerStrategy) {
        self.strategy = strategy;
    }

    pub fn compute_roles(&mut self, layers: &[LayerDescriptor]) -> &HashMap<String, LayerColoringRole> {
        self.roles = compute_all_layer_roles(layers, self.strategy);
        &self.roles
    }

    pub fn role(&self, layer_name: &str) -> Option<&LayerColoringRole> {
        self.roles.get(layer_name)
    }

    pub fn should_apply_color_by(&self, layer_name: &str) -> bool {
        matches!(
            self.role(layer_name).map(|r| r.role),
            Some(LayerRole::Primary | LayerRole::Secondary)
        )
    }

    pub fn clear_cache(&mut self) {
        self.roles.clear();
    }
}
