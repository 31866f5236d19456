// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 tmbkoren

//! Reading and writing `.mtrack` track files.
//!
//! The format is a small JSON document listing control points:
//!
//! ```json
//! {
//!     "control_points": [
//!         { "pos": [10.0, 4.0], "in_tangent": [-20.0, 0.0], "out_tangent": [20.0, 0.0], "mirrored": true }
//!     ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use eframe::egui::{pos2, vec2};
use serde::{Deserialize, Serialize};

use crate::models::ControlPoint;

/// File extension used for saved tracks.
pub const TRACK_EXTENSION: &str = "mtrack";

/// Default name offered in the save dialog.
pub const DEFAULT_TRACK_NAME: &str = "track.mtrack";

/// Largest coordinate or tangent component accepted from a track file.
pub const MAX_COORDINATE: f32 = 1.0e6;

#[derive(Serialize, Deserialize)]
struct TrackDocument {
    control_points: Vec<PointRecord>,
}

#[derive(Serialize, Deserialize)]
struct PointRecord {
    pos: [f32; 2],
    in_tangent: [f32; 2],
    out_tangent: [f32; 2],
    mirrored: bool,
}

impl From<&ControlPoint> for PointRecord {
    fn from(cp: &ControlPoint) -> Self {
        Self {
            pos: [cp.pos.x, cp.pos.y],
            in_tangent: [cp.in_tangent.x, cp.in_tangent.y],
            out_tangent: [cp.out_tangent.x, cp.out_tangent.y],
            mirrored: cp.mirrored,
        }
    }
}

impl From<PointRecord> for ControlPoint {
    fn from(rec: PointRecord) -> Self {
        let mut cp = ControlPoint::new(pos2(rec.pos[0], rec.pos[1]));
        cp.in_tangent = vec2(rec.in_tangent[0], rec.in_tangent[1]);
        cp.out_tangent = vec2(rec.out_tangent[0], rec.out_tangent[1]);
        cp.mirrored = rec.mirrored;
        cp
    }
}

/// Serialize control points into the track JSON (four-space indented).
pub fn to_json(points: &[ControlPoint]) -> Result<String> {
    let doc = TrackDocument {
        control_points: points.iter().map(PointRecord::from).collect(),
    };
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut ser).context("Failed to serialize track")?;
    String::from_utf8(buf).context("Track JSON was not valid UTF-8")
}

/// Parse track JSON into control points.
///
/// # Errors
///
/// Fails on malformed JSON, missing fields, or coordinates that are not
/// finite or lie beyond [`MAX_COORDINATE`].
pub fn from_json(content: &str) -> Result<Vec<ControlPoint>> {
    let doc: TrackDocument =
        serde_json::from_str(content).context("Track file is not valid track JSON")?;

    let values = || {
        doc.control_points
            .iter()
            .flat_map(|p| p.pos.iter().chain(&p.in_tangent).chain(&p.out_tangent))
    };
    if !values().all(|v| v.is_finite()) {
        bail!("Track file contains non-finite coordinates");
    }
    if let Some(v) = values().find(|v| v.abs() > MAX_COORDINATE) {
        bail!("Track file coordinate {v} is out of range (limit {MAX_COORDINATE})");
    }

    Ok(doc
        .control_points
        .into_iter()
        .map(ControlPoint::from)
        .collect())
}

/// Write a track file, creating parent directories as needed.
pub fn save_track(path: &Path, points: &[ControlPoint]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let json = to_json(points)?;
    fs::write(path, json).with_context(|| format!("Could not save track to {}", path.display()))?;
    log::info!("Saved {} control points to {}", points.len(), path.display());
    Ok(())
}

/// Read a track file from disk.
pub fn load_track(path: &Path) -> Result<Vec<ControlPoint>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read track file {}", path.display()))?;
    let points =
        from_json(&content).with_context(|| format!("Could not load {}", path.display()))?;
    log::info!("Loaded {} control points from {}", points.len(), path.display());
    Ok(points)
}

/// Force a specific extension onto a path when it is missing or different.
///
/// Keeps an existing matching extension (case-insensitive); otherwise replaces it.
pub fn ensure_extension(mut path: PathBuf, extension: &str) -> PathBuf {
    let replace = !matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case(extension)
    );

    if replace {
        path.set_extension(extension);
    }
    path
}

/// Whether a path looks like a track file (by extension).
pub fn is_track_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TRACK_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_points() -> Vec<ControlPoint> {
        let mut a = ControlPoint::new(pos2(1.5, -2.0));
        a.mirrored = false;
        a.out_tangent = vec2(4.0, 1.0);
        let b = ControlPoint::new(pos2(30.0, 8.25));
        vec![a, b]
    }

    #[test]
    fn save_then_load_preserves_points() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("road.mtrack");

        save_track(&path, &sample_points()).unwrap();
        let loaded = load_track(&path).unwrap();

        assert_eq!(loaded, sample_points());
    }

    #[test]
    fn json_uses_expected_keys_and_indent() {
        let json = to_json(&sample_points()).unwrap();
        assert!(json.starts_with("{\n    \"control_points\": ["));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value["control_points"][0];
        assert_eq!(first["pos"][0], 1.5);
        assert_eq!(first["out_tangent"][1], 1.0);
        assert_eq!(first["mirrored"], false);
    }

    #[test]
    fn accepts_integer_coordinates() {
        let json = r#"{"control_points":[{"pos":[1,2],"in_tangent":[-20,0],"out_tangent":[20,0],"mirrored":true}]}"#;
        let points = from_json(json).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].pos, pos2(1.0, 2.0));
    }

    #[test]
    fn rejects_missing_fields() {
        let json = r#"{"control_points":[{"pos":[1,2]}]}"#;
        assert!(from_json(json).is_err());
        assert!(from_json("not json").is_err());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let huge = r#"{"control_points":[
            {"pos":[1e30,0],"in_tangent":[-20,0],"out_tangent":[20,0],"mirrored":true},
            {"pos":[0,0],"in_tangent":[-20,0],"out_tangent":[20,0],"mirrored":true}
        ]}"#;
        let err = from_json(huge).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{err}");

        let long_tangent = r#"{"control_points":[{"pos":[0,0],"in_tangent":[-2e6,0],"out_tangent":[20,0],"mirrored":false}]}"#;
        assert!(from_json(long_tangent).is_err());

        let edge = r#"{"control_points":[{"pos":[1000000,-1000000],"in_tangent":[-20,0],"out_tangent":[20,0],"mirrored":true}]}"#;
        assert!(from_json(edge).is_ok());
    }

    #[test]
    fn load_missing_file_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.mtrack");
        let err = load_track(&path).unwrap_err().to_string();
        assert!(err.contains("missing.mtrack"));
    }

    #[test]
    fn ensure_extension_preserves_matching_extension_case_insensitive() {
        let path = ensure_extension(PathBuf::from("road.MTRACK"), TRACK_EXTENSION);
        assert_eq!(path, PathBuf::from("road.MTRACK"));
    }

    #[test]
    fn ensure_extension_replaces_when_different() {
        let path = ensure_extension(PathBuf::from("road.json"), TRACK_EXTENSION);
        assert_eq!(path, PathBuf::from("road.mtrack"));
        let path = ensure_extension(PathBuf::from("road"), "png");
        assert_eq!(path, PathBuf::from("road.png"));
    }

    #[test]
    fn track_paths_are_detected_by_extension() {
        assert!(is_track_path(Path::new("a/b.mtrack")));
        assert!(!is_track_path(Path::new("a/b.png")));
        assert!(!is_track_path(Path::new("--verbose")));
    }
}
