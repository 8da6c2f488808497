//! Tests of the JS-facing API. Run with `wasm-pack test --node`.
#![cfg(target_arch = "wasm32")]

use js_sys::{Array, Reflect};
use os_gpx_maps_wasm::{build_map_overlay, extract_track, parse_options, tile_layer};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::wasm_bindgen_test;

const TRACK: &str = r#"<gpx><trk><trkseg>
  <trkpt lat="51.5" lon="-0.25"/><trkpt lat="51.75" lon="-0.125"/>
</trkseg></trk></gpx>"#;

fn get(obj: &JsValue, key: &str) -> JsValue {
    Reflect::get(obj, &JsValue::from_str(key)).unwrap()
}

#[wasm_bindgen_test]
fn parse_options_returns_plain_object() {
    let value = parse_options("zoom: 12\nflag: true\ncenter: [51.5, 0.25]\n").unwrap();
    assert_eq!(get(&value, "zoom").as_f64(), Some(12.0));
    assert_eq!(get(&value, "flag").as_bool(), Some(true));
    let center = Array::from(&get(&value, "center"));
    assert_eq!(center.length(), 2);
    assert_eq!(center.get(0).as_f64(), Some(51.5));
}

#[wasm_bindgen_test]
fn extract_track_returns_pairs() {
    let value = extract_track(TRACK).unwrap();
    let points = Array::from(&value);
    assert_eq!(points.length(), 2);
    let last = Array::from(&points.get(1));
    assert_eq!(last.get(0).as_f64(), Some(51.75));
    assert_eq!(last.get(1).as_f64(), Some(-0.125));
}

#[wasm_bindgen_test]
fn extract_track_returns_null_without_points() {
    assert!(extract_track("<gpx></gpx>").unwrap().is_null());
    assert!(extract_track("<gpx><trk>").unwrap().is_null());
}

#[wasm_bindgen_test]
fn tile_layer_throws_without_key() {
    assert!(tile_layer("style: road\n", JsValue::UNDEFINED).is_err());
    let layer = tile_layer("style: road\napiKey: K\n", JsValue::UNDEFINED).unwrap();
    let url = get(&layer, "urlTemplate").as_string().unwrap();
    assert!(url.ends_with("Road_3857/{z}/{x}/{y}.png?key=K"));
}

#[wasm_bindgen_test]
fn build_map_overlay_skips_missing_files() {
    let files = Array::new();
    let file = js_sys::Object::new();
    Reflect::set(&file, &"reference".into(), &"a.gpx".into()).unwrap();
    Reflect::set(&file, &"contents".into(), &TRACK.into()).unwrap();
    files.push(&file);

    let overlay = build_map_overlay(
        "gpx:\n  - a.gpx\n  - b.gpx\n",
        JsValue::NULL,
        files.into(),
    )
    .unwrap();
    assert_eq!(Array::from(&get(&overlay, "tracks")).length(), 1);
    let skipped = Array::from(&get(&overlay, "skipped"));
    assert_eq!(skipped.length(), 1);
    assert_eq!(
        get(&skipped.get(0), "reason").as_string().as_deref(),
        Some("notFound")
    );
}
