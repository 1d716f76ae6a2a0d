//! Colour resolution for dashboard widgets.
//!
//! A [`StyleResolver`] is constructed explicitly and handed to the widgets that need it. It
//! follows an external [`ColorModeSignal`] through a subscription it owns, so there is no
//! process-wide theme state.

use core::fmt;
use linkboard_model::{ObserverId, Observers};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cell::Cell;
use std::rc::Rc;
use std::str::FromStr;

/// Alpha used for de-emphasised (filtered-out) features, roughly 30% opacity.
pub const DIMMED_ALPHA: u8 = 77;

/// Returned by [`StyleResolver::color`] for unknown paths.
pub const FALLBACK_COLOR: HexColor = HexColor::from_rgb(0x808080);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StyleError {
    #[error("unknown style path: {0}")]
    UnknownPath(String),
    #[error("invalid colour {0:?}: expected #rrggbb")]
    InvalidColor(String),
}

/// A 24-bit RGB colour.
///
/// Serialized as a lowercase `#rrggbb` hex string.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub rgb: u32,
}

impl HexColor {
    pub const fn from_rgb(rgb: u32) -> Self {
        Self { rgb: rgb & 0x00FF_FFFF }
    }

    pub const fn red(self) -> u8 {
        (self.rgb >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.rgb >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.rgb as u8
    }

    pub const fn rgba(self, alpha: u8) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), alpha]
    }

    fn to_hex(self) -> String {
        format!("#{:06x}", self.rgb)
    }
}

impl FromStr for HexColor {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StyleError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 {
            return Err(invalid());
        }
        let rgb = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        Ok(Self::from_rgb(rgb))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for HexColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    #[default]
    Dark,
}

/// A subscriber returns `false` once it has nothing left to update and is then dropped.
type ColorModeSubscriber = dyn FnMut(ColorMode) -> bool;

/// The application's current colour mode, observable by any number of resolvers.
#[derive(Debug, Default)]
pub struct ColorModeSignal {
    mode: ColorMode,
    subscribers: Observers<ColorModeSubscriber>,
}

impl ColorModeSignal {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            mode,
            subscribers: Observers::new(),
        }
    }

    pub fn get(&self) -> ColorMode {
        self.mode
    }

    /// Updates the mode. Subscribers are only called when it actually changes; subscriptions
    /// whose resolver has gone away are pruned here.
    pub fn set(&mut self, mode: ColorMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.subscribers.retain(|subscriber| subscriber(mode));
    }

    pub fn subscribe(&mut self, mut callback: impl FnMut(ColorMode) + 'static) -> ObserverId {
        self.subscribers.insert(Box::new(move |mode| {
            callback(mode);
            true
        }))
    }

    /// Writes every change into `target` until the cell is dropped.
    fn follow(&mut self, target: &Rc<Cell<ColorMode>>) -> ObserverId {
        let target = Rc::downgrade(target);
        self.subscribers
            .insert(Box::new(move |mode| match target.upgrade() {
                Some(cell) => {
                    cell.set(mode);
                    true
                }
                None => false,
            }))
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterColors {
    pub origin: HexColor,
    pub destination: HexColor,
}

impl Default for ClusterColors {
    fn default() -> Self {
        Self {
            origin: HexColor::from_rgb(0x2563eb),
            destination: HexColor::from_rgb(0xdc2626),
        }
    }
}

struct ThemePalette {
    background: [(&'static str, HexColor); 3],
    text: [(&'static str, HexColor); 2],
    border: [(&'static str, HexColor); 2],
    chart_bar: HexColor,
    chart_bar_selected: HexColor,
    chart_grid: HexColor,
}

const fn c(rgb: u32) -> HexColor {
    HexColor::from_rgb(rgb)
}

const LIGHT: ThemePalette = ThemePalette {
    background: [
        ("primary", c(0xffffff)),
        ("secondary", c(0xf8f9fa)),
        ("tertiary", c(0xf1f5f9)),
    ],
    text: [("primary", c(0x374151)), ("secondary", c(0x6b7280))],
    border: [("default", c(0xe5e7eb)), ("subtle", c(0xf3f4f6))],
    chart_bar: c(0x3b82f6),
    chart_bar_selected: c(0xef4444),
    chart_grid: c(0xe5e7eb),
};

const DARK: ThemePalette = ThemePalette {
    background: [
        ("primary", c(0x1e293b)),
        ("secondary", c(0x334155)),
        ("tertiary", c(0x475569)),
    ],
    text: [("primary", c(0xe2e8f0)), ("secondary", c(0x94a3b8))],
    border: [("default", c(0x475569)), ("subtle", c(0x334155))],
    chart_bar: c(0x60a5fa),
    chart_bar_selected: c(0xf87171),
    chart_grid: c(0x334155),
};

const HOVER: HexColor = c(0xfbbf24);
const SELECTED: HexColor = c(0x3b82f6);

const CATEGORICAL: [HexColor; 15] = [
    c(0x3498db),
    c(0xe74c3c),
    c(0x2ecc71),
    c(0xf39c12),
    c(0x9b59b6),
    c(0x1abc9c),
    c(0xe67e22),
    c(0x34495e),
    c(0x16a085),
    c(0xc0392b),
    c(0x2980b9),
    c(0x8e44ad),
    c(0x27ae60),
    c(0xd35400),
    c(0x7f8c8d),
];

const TRANSPORT_MODES: [(&str, HexColor); 10] = [
    ("car", c(0xe74c3c)),
    ("pt", c(0x3498db)),
    ("bike", c(0x2ecc71)),
    ("walk", c(0xf39c12)),
    ("drt", c(0x9b59b6)),
    ("ride", c(0x1abc9c)),
    ("transit", c(0x3498db)),
    ("auto", c(0xe74c3c)),
    ("bicycle", c(0x2ecc71)),
    ("pedestrian", c(0xf39c12)),
];
const DEFAULT_MODE_COLOR: HexColor = c(0x95a5a6);

const ACTIVITIES: [(&str, HexColor); 5] = [
    ("home", c(0x4477ff)),
    ("work", c(0xff4477)),
    ("education", c(0x44ff77)),
    ("shopping", c(0xff7744)),
    ("leisure", c(0xaa44ff)),
];
const OTHER_ACTIVITY_COLOR: HexColor = c(0x777777);

fn lookup(table: &[(&str, HexColor)], name: &str) -> Option<HexColor> {
    table
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, color)| *color)
}

#[derive(Debug, Default)]
pub struct StyleResolver {
    mode: Rc<Cell<ColorMode>>,
    subscription: Option<ObserverId>,
    cluster: ClusterColors,
}

impl StyleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts the signal's current mode and follows its changes.
    ///
    /// A resolver follows at most one signal. Attaching again replaces the previous
    /// subscription; when that subscription belongs to another signal it is severed at once
    /// and pruned by that signal's next change.
    pub fn attach(&mut self, signal: &mut ColorModeSignal) {
        if let Some(previous) = self.subscription.take() {
            if !signal.unsubscribe(previous) {
                self.sever();
            }
        }
        self.mode.set(signal.get());
        self.subscription = Some(signal.follow(&self.mode));
    }

    /// Stops following `signal`. The last observed mode is kept.
    ///
    /// Returns `false`, leaving the resolver attached, when it does not follow `signal`.
    pub fn detach(&mut self, signal: &mut ColorModeSignal) -> bool {
        match self.subscription {
            Some(id) if signal.unsubscribe(id) => {
                self.subscription = None;
                true
            }
            _ => false,
        }
    }

    /// Swaps in a fresh mode cell so subscriptions holding the old one stop having an effect.
    fn sever(&mut self) {
        self.mode = Rc::new(Cell::new(self.mode.get()));
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn mode(&self) -> ColorMode {
        self.mode.get()
    }

    pub fn set_mode(&mut self, mode: ColorMode) {
        self.mode.set(mode);
    }

    pub fn cluster_colors(&self) -> ClusterColors {
        self.cluster
    }

    pub fn set_cluster_colors(&mut self, colors: ClusterColors) {
        self.cluster = colors;
    }

    pub fn reset_cluster_colors(&mut self) {
        self.cluster = ClusterColors::default();
    }

    fn palette(&self) -> &'static ThemePalette {
        match self.mode() {
            ColorMode::Light => &LIGHT,
            ColorMode::Dark => &DARK,
        }
    }

    /// Resolves a dotted style path such as `theme.text.primary` or `categorical.3`.
    pub fn try_color(&self, path: &str) -> Result<HexColor, StyleError> {
        let unknown = || StyleError::UnknownPath(path.to_string());
        let palette = self.palette();
        let parts: Vec<&str> = path.split('.').collect();

        let color = match parts.as_slice() {
            ["theme", "background", name] => lookup(&palette.background, name),
            ["theme", "text", name] => lookup(&palette.text, name),
            ["theme", "border", name] => lookup(&palette.border, name),
            ["interaction", "hover"] => Some(HOVER),
            ["interaction", "selected"] => Some(SELECTED),
            ["cluster", "origin"] => Some(self.cluster.origin),
            ["cluster", "destination"] => Some(self.cluster.destination),
            ["chart", "grid"] => Some(palette.chart_grid),
            ["chart", "bar", "default"] => Some(palette.chart_bar),
            ["chart", "bar", "selected"] => Some(palette.chart_bar_selected),
            ["categorical", index] => index.parse::<usize>().ok().map(categorical_color),
            ["mode", name] => Some(lookup(&TRANSPORT_MODES, name).unwrap_or(DEFAULT_MODE_COLOR)),
            ["activity", name] => Some(lookup(&ACTIVITIES, name).unwrap_or(OTHER_ACTIVITY_COLOR)),
            _ => None,
        };
        color.ok_or_else(unknown)
    }

    /// Like [`StyleResolver::try_color`], but unknown paths log a warning and resolve to
    /// [`FALLBACK_COLOR`].
    pub fn color(&self, path: &str) -> HexColor {
        self.try_color(path).unwrap_or_else(|err| {
            log::warn!("{err}; using {}", FALLBACK_COLOR);
            FALLBACK_COLOR
        })
    }

    pub fn color_rgba(&self, path: &str, alpha: u8) -> [u8; 4] {
        self.color(path).rgba(alpha)
    }

    pub fn dimmed_color_rgba(&self, path: &str) -> [u8; 4] {
        self.color_rgba(path, DIMMED_ALPHA)
    }

    pub fn categorical_color(&self, index: usize) -> HexColor {
        categorical_color(index)
    }

    pub fn categorical_color_rgba(&self, index: usize, alpha: u8) -> [u8; 4] {
        categorical_color(index).rgba(alpha)
    }

    /// CSS custom properties for the current mode, as a `:root { ... }` block.
    pub fn css_variables(&self) -> String {
        let palette = self.palette();
        let mut vars: Vec<(String, HexColor)> = Vec::new();

        for (name, color) in palette.background {
            vars.push((format!("--dashboard-bg-{name}"), color));
        }
        for (name, color) in palette.text {
            vars.push((format!("--dashboard-text-{name}"), color));
        }
        for (name, color) in palette.border {
            vars.push((format!("--dashboard-border-{name}"), color));
        }
        vars.push(("--dashboard-interaction-hover".into(), HOVER));
        vars.push(("--dashboard-interaction-selected".into(), SELECTED));
        vars.push(("--dashboard-cluster-origin".into(), self.cluster.origin));
        vars.push(("--dashboard-cluster-destination".into(), self.cluster.destination));
        vars.push(("--dashboard-chart-bar".into(), palette.chart_bar));
        vars.push(("--dashboard-chart-bar-selected".into(), palette.chart_bar_selected));
        vars.push(("--dashboard-chart-grid".into(), palette.chart_grid));
        for (idx, color) in CATEGORICAL.iter().enumerate() {
            vars.push((format!("--dashboard-categorical-{idx}"), *color));
        }

        let body: Vec<String> = vars
            .iter()
            .map(|(name, color)| format!("  {name}: {color};"))
            .collect();
        format!(":root {{\n{}\n}}", body.join("\n"))
    }
}

/// Categorical palette entry; indices wrap around.
pub fn categorical_color(index: usize) -> HexColor {
    CATEGORICAL[index % CATEGORICAL.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_and_print() {
        let color: HexColor = "#FBBF24".parse().unwrap();
        assert_eq!(color, HOVER);
        assert_eq!(color.to_string(), "#fbbf24");
        assert_eq!(color.rgba(255), [251, 191, 36, 255]);
        assert!("fbbf24".parse::<HexColor>().is_err());
        assert!("#fbbf2".parse::<HexColor>().is_err());
        assert!("#gggggg".parse::<HexColor>().is_err());
    }

    #[test]
    fn palettes_cover_the_same_names() {
        for (light, dark) in LIGHT.background.iter().zip(DARK.background.iter()) {
            assert_eq!(light.0, dark.0);
        }
        for (light, dark) in LIGHT.text.iter().zip(DARK.text.iter()) {
            assert_eq!(light.0, dark.0);
        }
        for (light, dark) in LIGHT.border.iter().zip(DARK.border.iter()) {
            assert_eq!(light.0, dark.0);
        }
    }
}
