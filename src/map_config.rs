use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gpx_types::GeoPoint;
use crate::options::{OptionValue, ParsedOptions};
use crate::settings::PluginSettings;

/// OS Maps API raster endpoint, ZXY addressing.
pub const OS_ZXY_BASE_URL: &str = "https://api.os.uk/maps/raster/v1/zxy";

/// Zoom range the OS raster API serves in Web Mercator.
pub const MIN_ZOOM: u8 = 7;
pub const MAX_ZOOM: u8 = 20;

pub const OS_ATTRIBUTION: &str = "Contains OS data &copy; Crown copyright and database rights";

/// Raster basemap styles available in Web Mercator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStyle {
    Road,
    #[default]
    Outdoor,
    Light,
}

impl MapStyle {
    pub fn layer_name(self) -> &'static str {
        match self {
            Self::Road => "Road_3857",
            Self::Outdoor => "Outdoor_3857",
            Self::Light => "Light_3857",
        }
    }
}

impl FromStr for MapStyle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "road" => Ok(Self::Road),
            "outdoor" => Ok(Self::Outdoor),
            "light" => Ok(Self::Light),
            _ => Err(()),
        }
    }
}

/// A track file named in a block: a plain path or a `[[path|alias]]` link.
/// The host resolves `path` to file contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRef {
    pub reference: String,
    pub path: String,
    pub alias: Option<String>,
}

impl TrackRef {
    pub fn parse(reference: &str) -> Self {
        let trimmed = reference.trim();
        let inner = trimmed
            .strip_prefix("[[")
            .and_then(|s| s.strip_suffix("]]"))
            .unwrap_or(trimmed);

        let (path, alias) = match inner.split_once('|') {
            Some((path, alias)) => (path.trim(), Some(alias.trim())),
            None => (inner.trim(), None),
        };

        Self {
            reference: reference.to_string(),
            path: path.to_string(),
            alias: alias.filter(|a| !a.is_empty()).map(str::to_string),
        }
    }

    /// The alias if one was given, else the file name without extension.
    pub fn label(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| file_stem(&self.path))
    }
}

fn file_stem(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    }
}

/// Everything the orchestrator needs to draw one map block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    pub tracks: Vec<TrackRef>,
    pub style: MapStyle,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub zoom: f64,
    pub center: GeoPoint,
    pub show_start_end: bool,
    pub fit: bool,
    /// `gpxColor:` from the block; applies to every track when set.
    pub track_color: Option<String>,
    pub default_color: String,
    pub line_weight: f64,
    pub line_opacity: f64,
    pub legend: bool,
    pub height: u32,
}

impl MapConfig {
    /// Apply block options over plugin settings. Absent options and options
    /// of the wrong type fall back to the settings value.
    pub fn resolve(options: &ParsedOptions, settings: &PluginSettings) -> Self {
        let tracks = typed(options, "gpx", "path or list of paths", |v| {
            v.as_string_list()
        })
        .unwrap_or_default()
        .into_iter()
        .filter(|r| !r.trim().is_empty())
        .map(TrackRef::parse)
        .collect();

        let style = typed(options, "style", "style name", |v| v.as_str())
            .and_then(|s| match s.parse::<MapStyle>() {
                Ok(style) => Some(style),
                Err(()) => {
                    log::warn!("unknown map style `{s}`, expected road, outdoor or light");
                    None
                }
            })
            .unwrap_or(settings.default_style);

        let api_key = typed(options, "apiKey", "string", |v| v.as_str())
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or_else(|| Some(settings.api_key.trim()).filter(|k| !k.is_empty()))
            .map(str::to_string);

        let zoom = typed(options, "zoom", "number", OptionValue::as_f64)
            .unwrap_or(settings.default_zoom)
            .clamp(f64::from(MIN_ZOOM), f64::from(MAX_ZOOM));

        let center = typed(options, "center", "[lat, lon] pair", OptionValue::as_pair)
            .map(GeoPoint::from)
            .unwrap_or(settings.default_center);

        let show_start_end = typed(options, "showStartEnd", "boolean", OptionValue::as_bool)
            .unwrap_or(settings.show_start_end);

        let fit = typed(options, "zoomFeatures", "boolean", OptionValue::as_bool)
            .or_else(|| typed(options, "fit", "boolean", OptionValue::as_bool))
            .unwrap_or(settings.fit);

        let track_color = typed(options, "gpxColor", "colour", |v| v.as_str())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let legend =
            typed(options, "legend", "boolean", OptionValue::as_bool).unwrap_or(settings.legend);

        let height = typed(options, "height", "number", OptionValue::as_f64)
            .and_then(|h| {
                if h >= 1.0 {
                    Some(h.round().min(f64::from(u32::MAX)) as u32)
                } else {
                    log::warn!("map height must be positive, got {h}");
                    None
                }
            })
            .unwrap_or(settings.default_height);

        Self {
            tracks,
            style,
            api_key,
            zoom,
            center,
            show_start_end,
            fit,
            track_color,
            default_color: settings.default_color.clone(),
            line_weight: settings.line_weight,
            line_opacity: settings.line_opacity,
            legend,
            height,
        }
    }

    pub fn tile_layer(&self) -> Result<TileLayer, ConfigError> {
        let key = self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)?;
        Ok(TileLayer {
            url_template: format!(
                "{OS_ZXY_BASE_URL}/{}/{{z}}/{{x}}/{{y}}.png?key={key}",
                self.style.layer_name()
            ),
            attribution: OS_ATTRIBUTION.to_string(),
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        })
    }
}

/// Tile source handed to the mapping library.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

/// Look up `key` and convert it, warning when it is present with the wrong type.
fn typed<'a, T>(
    options: &'a ParsedOptions,
    key: &str,
    expected: &str,
    get: impl Fn(&'a OptionValue) -> Option<T>,
) -> Option<T> {
    let value = options.get(key)?;
    let converted = get(value);
    if converted.is_none() {
        log::warn!(
            "option `{key}` expects a {expected}, got a {}; using the default",
            value.kind()
        );
    }
    converted
}
