use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::TrackError;
use crate::gpx_types::{GeoPoint, Track};

type Result<T> = std::result::Result<T, TrackError>;

/// Extract every track point of a GPX document as one flat track.
///
/// Returns `None` when the document has no `<trkpt>` or is not well-formed
/// XML; the reason is logged.
pub fn extract_track(xml: &str) -> Option<Track> {
    match try_extract_track(xml) {
        Ok(Some(track)) => Some(track),
        Ok(None) => {
            log::debug!("GPX document contains no track points");
            None
        }
        Err(e) => {
            log::warn!("Could not read GPX track: {e}");
            None
        }
    }
}

/// Like [`extract_track`], but reports XML errors instead of logging them.
///
/// Points are collected in document order regardless of which `<trk>` or
/// `<trkseg>` they sit in. Waypoints and routes are ignored.
pub fn try_extract_track(xml: &str) -> Result<Option<Track>> {
    let mut reader = Reader::from_str(xml);
    let mut track = Track::default();
    // local names of the currently open elements
    let mut open: Vec<Vec<u8>> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let local = e.local_name();
                match local.as_ref() {
                    b"trkpt" => track.points.push(parse_point(&e)?),
                    b"name"
                        if track.name.is_none()
                            && open.last().is_some_and(|p| p.as_slice() == b"trk") =>
                    {
                        // consumes the matching end tag
                        let name = read_text_owned(&mut reader, &e)?;
                        let name = name.trim();
                        if !name.is_empty() {
                            track.name = Some(name.to_string());
                        }
                        continue;
                    }
                    _ => {}
                }
                open.push(local.as_ref().to_vec());
            }
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"trkpt" {
                    track.points.push(parse_point(&e)?);
                }
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(name) = open.last() {
        return Err(TrackError::UnclosedElement(
            String::from_utf8_lossy(name).into_owned(),
        ));
    }

    if track.points.is_empty() {
        Ok(None)
    } else {
        Ok(Some(track))
    }
}

/// Read `lat`/`lon` from a `<trkpt>` tag. Missing or non-numeric values
/// become `0`.
fn parse_point(e: &BytesStart<'_>) -> Result<GeoPoint> {
    let mut point = GeoPoint::new(0.0, 0.0);

    for attr_result in e.attributes() {
        let attr = attr_result?;
        match attr.key.local_name().as_ref() {
            b"lat" => point.lat = parse_coordinate(&attr.value),
            b"lon" => point.lon = parse_coordinate(&attr.value),
            _ => {}
        }
    }

    Ok(point)
}

fn parse_coordinate(raw: &[u8]) -> f64 {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Read text content of an element as an owned String.
/// Handles regular text, CDATA sections, and entity references (Event::GeneralRef).
fn read_text_owned<'a>(reader: &mut Reader<&'a [u8]>, start: &BytesStart<'_>) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                text.push_str(std::str::from_utf8(e.as_ref()).unwrap_or_default());
            }
            Event::CData(e) => {
                text.push_str(std::str::from_utf8(e.as_ref()).unwrap_or_default());
            }
            Event::GeneralRef(e) => {
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    match std::str::from_utf8(e.as_ref()).unwrap_or_default() {
                        "amp" => text.push('&'),
                        "lt" => text.push('<'),
                        "gt" => text.push('>'),
                        "quot" => text.push('"'),
                        "apos" => text.push('\''),
                        _ => {}
                    }
                }
            }
            Event::End(e) if e.name().0 == end_name.as_slice() => break,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}
