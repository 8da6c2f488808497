use serde::Serialize;

use crate::gpx_types::{Bounds, GeoPoint, Track};
use crate::map_config::{MapConfig, TrackRef};
use crate::parser::extract_track;

/// Colours for the second and later tracks of a block without `gpxColor:`.
pub const TRACK_PALETTE: [&str; 6] = [
    "#e6194b", "#3cb44b", "#f58231", "#911eb4", "#42d4f4", "#f032e6",
];

/// Polyline style for the mapping library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub weight: f64,
    pub opacity: f64,
    pub color: String,
}

/// One drawable track.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackOverlay {
    pub reference: String,
    pub label: String,
    pub coordinates: Vec<GeoPoint>,
    pub style: LineStyle,
    /// Start/end marker positions, present only with `showStartEnd`.
    pub start: Option<GeoPoint>,
    pub end: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// The host could not resolve the reference to a file.
    NotFound,
    /// The file was malformed or had no track points.
    NoTrack,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedTrack {
    pub reference: String,
    pub reason: SkipReason,
}

/// Everything drawn on top of the basemap for one block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapOverlay {
    pub tracks: Vec<TrackOverlay>,
    /// Union of all track bounds; set only when the view should fit them.
    pub bounds: Option<Bounds>,
    pub legend: Vec<LegendEntry>,
    pub skipped: Vec<SkippedTrack>,
}

/// Build the overlay for `config`. `contents` yields the text of a track
/// file, or `None` when the host could not resolve it. A file that cannot be
/// read is skipped without affecting the others.
pub fn build_overlay<'a>(
    config: &MapConfig,
    mut contents: impl FnMut(&TrackRef) -> Option<&'a str>,
) -> MapOverlay {
    let mut overlay = MapOverlay::default();

    for (index, track_ref) in config.tracks.iter().enumerate() {
        let Some(text) = contents(track_ref) else {
            log::warn!("GPX file not found: {}", track_ref.reference);
            overlay.skipped.push(SkippedTrack {
                reference: track_ref.reference.clone(),
                reason: SkipReason::NotFound,
            });
            continue;
        };

        let Some(track) = extract_track(text) else {
            overlay.skipped.push(SkippedTrack {
                reference: track_ref.reference.clone(),
                reason: SkipReason::NoTrack,
            });
            continue;
        };

        if config.fit {
            overlay.bounds = match (overlay.bounds, track.bounds()) {
                (Some(acc), Some(b)) => Some(acc.union(b)),
                (acc, b) => acc.or(b),
            };
        }

        overlay
            .tracks
            .push(track_overlay(config, index, track_ref, track));
    }

    if config.legend {
        overlay.legend = overlay
            .tracks
            .iter()
            .map(|t| LegendEntry {
                label: t.label.clone(),
                color: t.style.color.clone(),
            })
            .collect();
    }

    overlay
}

fn track_overlay(
    config: &MapConfig,
    index: usize,
    track_ref: &TrackRef,
    track: Track,
) -> TrackOverlay {
    // an explicit alias beats the name stored in the file
    let label = match (&track_ref.alias, &track.name) {
        (Some(alias), _) => alias.clone(),
        (None, Some(name)) => name.clone(),
        (None, None) => track_ref.label().to_string(),
    };

    let (start, end) = if config.show_start_end {
        (track.start(), track.end())
    } else {
        (None, None)
    };

    TrackOverlay {
        reference: track_ref.reference.clone(),
        label,
        coordinates: track.points,
        style: LineStyle {
            weight: config.line_weight,
            opacity: config.line_opacity,
            color: track_color(config, index),
        },
        start,
        end,
    }
}

fn track_color(config: &MapConfig, index: usize) -> String {
    if let Some(color) = &config.track_color {
        return color.clone();
    }
    match index {
        0 => config.default_color.clone(),
        n => TRACK_PALETTE[(n - 1) % TRACK_PALETTE.len()].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::parse_options;
    use crate::settings::PluginSettings;

    const LOOP: &str = r#"<gpx><trk><name>Loop</name><trkseg>
  <trkpt lat="51.0" lon="-1.0"/><trkpt lat="51.2" lon="-0.8"/><trkpt lat="51.1" lon="-0.9"/>
</trkseg></trk></gpx>"#;

    const LINE: &str = r#"<gpx><trk><trkseg>
  <trkpt lat="52.0" lon="0.5"/><trkpt lat="52.5" lon="1.0"/>
</trkseg></trk></gpx>"#;

    fn config(text: &str) -> MapConfig {
        MapConfig::resolve(&parse_options(text), &PluginSettings::default())
    }

    fn files<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl FnMut(&TrackRef) -> Option<&'a str> {
        move |r: &TrackRef| pairs.iter().find(|(p, _)| *p == r.path).map(|(_, c)| *c)
    }

    #[test]
    fn test_two_tracks_with_bounds() {
        let cfg = config("gpx:\n  - loop.gpx\n  - line.gpx\n");
        let pairs = [("loop.gpx", LOOP), ("line.gpx", LINE)];
        let overlay = build_overlay(&cfg, files(&pairs));

        assert_eq!(overlay.tracks.len(), 2);
        assert_eq!(overlay.tracks[0].label, "Loop");
        assert_eq!(overlay.tracks[1].label, "line");
        assert_eq!(overlay.tracks[0].style.color, "#3388ff");
        assert_eq!(overlay.tracks[1].style.color, TRACK_PALETTE[0]);

        let bounds = overlay.bounds.unwrap();
        assert_eq!(bounds.south_west, GeoPoint::new(51.0, -1.0));
        assert_eq!(bounds.north_east, GeoPoint::new(52.5, 1.0));
        assert!(overlay.legend.is_empty());
        assert!(overlay.skipped.is_empty());
    }

    #[test]
    fn test_bad_file_does_not_abort_others() {
        let cfg = config("gpx:\n  - bad.gpx\n  - missing.gpx\n  - line.gpx\n");
        let pairs = [("bad.gpx", "<gpx><trk>"), ("line.gpx", LINE)];
        let overlay = build_overlay(&cfg, files(&pairs));

        assert_eq!(overlay.tracks.len(), 1);
        assert_eq!(overlay.tracks[0].reference, "line.gpx");
        assert_eq!(
            overlay.skipped,
            vec![
                SkippedTrack {
                    reference: "bad.gpx".into(),
                    reason: SkipReason::NoTrack
                },
                SkippedTrack {
                    reference: "missing.gpx".into(),
                    reason: SkipReason::NotFound
                },
            ]
        );
    }

    #[test]
    fn test_start_end_and_legend() {
        let cfg = config(
            "gpx:\n  - [[loop.gpx|Ridge]]\nshowStartEnd: true\nlegend: true\ngpxColor: black\n",
        );
        let pairs = [("loop.gpx", LOOP)];
        let overlay = build_overlay(&cfg, files(&pairs));

        let track = &overlay.tracks[0];
        assert_eq!(track.label, "Ridge");
        assert_eq!(track.start, Some(GeoPoint::new(51.0, -1.0)));
        assert_eq!(track.end, Some(GeoPoint::new(51.1, -0.9)));
        assert_eq!(
            overlay.legend,
            vec![LegendEntry {
                label: "Ridge".into(),
                color: "black".into()
            }]
        );
    }

    #[test]
    fn test_no_bounds_without_fit() {
        let cfg = config("gpx: line.gpx\nfit: false\n");
        let pairs = [("line.gpx", LINE)];
        let overlay = build_overlay(&cfg, files(&pairs));
        assert_eq!(overlay.tracks.len(), 1);
        assert!(overlay.bounds.is_none());
        assert_eq!(overlay.tracks[0].start, None);
    }

    #[test]
    fn test_palette_wraps() {
        let cfg = config("");
        assert_eq!(track_color(&cfg, 1), TRACK_PALETTE[0]);
        assert_eq!(track_color(&cfg, TRACK_PALETTE.len() + 1), TRACK_PALETTE[0]);
    }
}
