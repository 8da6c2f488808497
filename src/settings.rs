use serde::Deserialize;

use crate::gpx_types::GeoPoint;
use crate::map_config::MapStyle;

/// Plugin-wide settings persisted by the host. Block options override these.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSettings {
    /// OS Data Hub API key (default: empty, i.e. not configured)
    #[serde(default)]
    pub api_key: String,

    /// Map style when a block has no `style:` (default: outdoor)
    #[serde(default)]
    pub default_style: MapStyle,

    #[serde(default = "default_zoom")]
    pub default_zoom: f64,

    /// `[lat, lon]` used when a block has no `center:` (default: central London)
    #[serde(default = "default_center")]
    pub default_center: GeoPoint,

    /// Map height in pixels (default: 400)
    #[serde(default = "default_height")]
    pub default_height: u32,

    /// Colour of the first track when a block has no `gpxColor:`
    #[serde(default = "default_color")]
    pub default_color: String,

    #[serde(default = "default_line_weight")]
    pub line_weight: f64,

    #[serde(default = "default_line_opacity")]
    pub line_opacity: f64,

    #[serde(default)]
    pub show_start_end: bool,

    /// Fit the view to the loaded tracks (default: true)
    #[serde(default = "default_true")]
    pub fit: bool,

    #[serde(default)]
    pub legend: bool,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            default_style: MapStyle::default(),
            default_zoom: default_zoom(),
            default_center: default_center(),
            default_height: default_height(),
            default_color: default_color(),
            line_weight: default_line_weight(),
            line_opacity: default_line_opacity(),
            show_start_end: false,
            fit: true,
            legend: false,
        }
    }
}

fn default_zoom() -> f64 {
    13.0
}

fn default_center() -> GeoPoint {
    GeoPoint::new(51.5074, -0.1278)
}

fn default_height() -> u32 {
    400
}

fn default_color() -> String {
    "#3388ff".to_string()
}

fn default_line_weight() -> f64 {
    4.0
}

fn default_line_opacity() -> f64 {
    0.8
}

fn default_true() -> bool {
    true
}
