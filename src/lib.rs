pub mod converter;
pub mod error;
pub mod gpx_types;
pub mod logging;
pub mod map_config;
pub mod options;
pub mod parser;
pub mod settings;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::error::ConfigError;
use crate::map_config::{MapConfig, TrackRef};
use crate::settings::PluginSettings;

/// A track file as resolved by the host. `reference` is either the text
/// from the block or the link target path; `contents` is null when the
/// reference could not be resolved.
#[derive(Debug, Deserialize)]
pub struct LoadedFile {
    #[serde(alias = "path")]
    pub reference: String,
    #[serde(default)]
    pub contents: Option<String>,
}

impl LoadedFile {
    pub fn matches(&self, track_ref: &TrackRef) -> bool {
        self.reference == track_ref.reference || self.reference == track_ref.path
    }
}

/// Install the console logger (`error`, `warn`, `info`, `debug`, `trace`; default `info`).
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) {
    console_error_panic_hook::set_once();

    match logging::parse_log_level(level.as_deref()) {
        Some(filter) => logging::init(filter),
        None => {
            logging::init(log::LevelFilter::Info);
            log::warn!("Unknown log level {level:?}, using info");
        }
    }
}

/// Parse an options block into a plain object of option values.
#[wasm_bindgen(js_name = parseOptions)]
pub fn parse_options(text: &str) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    to_js(&options::parse_options(text).values)
}

/// Parse an options block, also returning the lines that were dropped.
#[wasm_bindgen(js_name = parseOptionsDetailed)]
pub fn parse_options_detailed(text: &str) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    to_js(&options::parse_options(text))
}

/// Extract a GPX file's track points as `[lat, lon]` pairs, or `null` when
/// there are none or the file is malformed.
#[wasm_bindgen(js_name = extractTrack)]
pub fn extract_track(gpx_string: &str) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    match parser::extract_track(gpx_string) {
        Some(track) => to_js(&track.points),
        None => Ok(JsValue::NULL),
    }
}

/// Like `extractTrack`, but throws on malformed XML.
#[wasm_bindgen(js_name = extractTrackStrict)]
pub fn extract_track_strict(gpx_string: &str) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    match parser::try_extract_track(gpx_string)? {
        Some(track) => to_js(&track.points),
        None => Ok(JsValue::NULL),
    }
}

/// Resolve block options over plugin settings.
#[wasm_bindgen(js_name = resolveMapConfig)]
pub fn resolve_map_config(block_text: &str, settings: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    to_js(&resolve_config(block_text, settings)?)
}

/// Tile layer for a block. Throws when no API key is configured.
#[wasm_bindgen(js_name = tileLayer)]
pub fn tile_layer(block_text: &str, settings: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let config = resolve_config(block_text, settings)?;
    to_js(&config.tile_layer()?)
}

/// Build the track overlay for a block from the files the host resolved.
#[wasm_bindgen(js_name = buildMapOverlay)]
pub fn build_map_overlay(
    block_text: &str,
    settings: JsValue,
    files: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let config = resolve_config(block_text, settings)?;
    let files: Vec<LoadedFile> = if files.is_undefined() || files.is_null() {
        Vec::new()
    } else {
        serde_wasm_bindgen::from_value(files).map_err(|e| JsValue::from_str(&e.to_string()))?
    };

    let overlay = converter::build_overlay(&config, |track_ref| {
        files
            .iter()
            .find(|f| f.matches(track_ref))
            .and_then(|f| f.contents.as_deref())
    });
    to_js(&overlay)
}

fn resolve_config(block_text: &str, settings: JsValue) -> Result<MapConfig, ConfigError> {
    let settings = parse_settings(settings)?;
    let options = options::parse_options(block_text);
    for ignored in &options.ignored {
        log::debug!("Ignoring options line {}: {:?}", ignored.line, ignored.text);
    }
    Ok(MapConfig::resolve(&options, &settings))
}

fn parse_settings(settings: JsValue) -> Result<PluginSettings, ConfigError> {
    if settings.is_undefined() || settings.is_null() {
        Ok(PluginSettings::default())
    } else {
        serde_wasm_bindgen::from_value(settings)
            .map_err(|e| ConfigError::InvalidSettings(e.to_string()))
    }
}

/// Serialize with plain JS objects for maps and `null` for `None`.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loaded_file_shape() {
        let file: LoadedFile =
            serde_json::from_str(r#"{"reference":"a.gpx","contents":"<gpx/>"}"#).unwrap();
        assert_eq!(file.reference, "a.gpx");
        assert_eq!(file.contents.as_deref(), Some("<gpx/>"));

        let unresolved: LoadedFile = serde_json::from_str(r#"{"reference":"b.gpx"}"#).unwrap();
        assert!(unresolved.contents.is_none());
    }

    #[test]
    fn test_loaded_file_matches_reference_or_path() {
        let link = TrackRef::parse("[[Tracks/loop.gpx|Loop]]");
        let by_reference: LoadedFile =
            serde_json::from_str(r#"{"reference":"[[Tracks/loop.gpx|Loop]]"}"#).unwrap();
        let by_path: LoadedFile =
            serde_json::from_str(r#"{"reference":"Tracks/loop.gpx"}"#).unwrap();
        let other: LoadedFile = serde_json::from_str(r#"{"reference":"other.gpx"}"#).unwrap();

        assert!(by_reference.matches(&link));
        assert!(by_path.matches(&link));
        assert!(!other.matches(&link));
    }
}
