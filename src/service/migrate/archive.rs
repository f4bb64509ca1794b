//! Portable archive container handling.
//!
//! Two accepted shapes: a zip holding one JSON list per entity type, or a
//! single bundle object keyed by entity-type names (either as the lone
//! zip entry or as raw bytes). Strict JSON is tried first; a file that
//! fails strict parsing is retried as newline-delimited JSON before being
//! reported.

use std::{
    collections::BTreeMap,
    io::{Cursor, Read, Write},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use zip::{write::SimpleFileOptions, ZipArchive, ZipWriter};

use crate::{error::migrate::MigrateError, service::migrate::entry};

#[derive(Debug, Default)]
pub struct Archive {
    pub entries: BTreeMap<String, Vec<Value>>,
}

impl Archive {
    pub fn rows(&self, name: &str) -> &[Value] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportedEvent {
    pub id: i32,
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportedTeam {
    pub id: i32,
    pub team_number: i32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportedTeamEvent {
    pub team_id: i32,
    pub event_id: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportedMatch {
    pub id: i32,
    pub event_id: i32,
    /// Natural-key fallback for the event reference; lets an importer
    /// place the match even when `event_id` maps to nothing.
    #[serde(default)]
    pub event_code: Option<String>,
    pub match_type: String,
    pub match_number: i32,
    #[serde(default)]
    pub red_alliance: Option<String>,
    #[serde(default)]
    pub blue_alliance: Option<String>,
    #[serde(default)]
    pub red_score: Option<i32>,
    #[serde(default)]
    pub blue_score: Option<i32>,
}

/// Per-match lineup, exported separately for older consumers that read
/// lineups from their own file.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportedLineup {
    pub match_id: i32,
    #[serde(default)]
    pub red_alliance: Option<String>,
    #[serde(default)]
    pub blue_alliance: Option<String>,
}

/// Row shape shared by all three record files.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportedRecord {
    pub id: i32,
    pub team_id: i32,
    #[serde(default)]
    pub match_id: Option<i32>,
    #[serde(default)]
    pub scout_name: Option<String>,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportedPickListEntry {
    pub team_number: i32,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportedShareLink {
    pub share_id: String,
    #[serde(default)]
    pub payload: Value,
}

/// Parse an uploaded archive in whichever accepted shape it arrives.
pub fn read_archive(bytes: &[u8]) -> Result<Archive, MigrateError> {
    let archive = match ZipArchive::new(Cursor::new(bytes)) {
        Ok(zip) => read_zip(zip)?,
        // Not a zip; the raw bytes may be a bundle object.
        Err(_) => parse_bundle(bytes)?,
    };

    if archive.entries.is_empty() {
        return Err(MigrateError::EmptyArchive);
    }

    Ok(archive)
}

fn read_zip(mut zip: ZipArchive<Cursor<&[u8]>>) -> Result<Archive, MigrateError> {
    let mut archive = Archive::default();
    let mut unrecognized: Vec<(String, Vec<u8>)> = Vec::new();

    for index in 0..zip.len() {
        let mut file = zip
            .by_index(index)
            .map_err(|err| MigrateError::BadContainer(err.to_string()))?;
        if file.is_dir() {
            continue;
        }

        let name = entry_stem(file.name());
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|err| MigrateError::BadContainer(err.to_string()))?;

        if entry::ALL.contains(&name.as_str()) {
            archive
                .entries
                .insert(name.clone(), parse_rows(&name, &contents)?);
        } else {
            unrecognized.push((name, contents));
        }
    }

    // A zip wrapping one arbitrarily-named file is treated as a bundle.
    if archive.entries.is_empty() && unrecognized.len() == 1 {
        return parse_bundle(&unrecognized[0].1);
    }

    for (name, _) in unrecognized {
        tracing::warn!(entry = %name, "Ignoring unrecognized archive entry");
    }

    Ok(archive)
}

fn entry_stem(file_name: &str) -> String {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    base.strip_suffix(".json")
        .or_else(|| base.strip_suffix(".ndjson"))
        .unwrap_or(base)
        .to_string()
}

/// One object keyed by entity-type names, each value a row list.
fn parse_bundle(bytes: &[u8]) -> Result<Archive, MigrateError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| MigrateError::BadContainer(err.to_string()))?;

    let Value::Object(map) = value else {
        return Err(MigrateError::BadContainer(
            "bundle is not a JSON object".to_string(),
        ));
    };

    let mut archive = Archive::default();
    for (name, rows) in map {
        if !entry::ALL.contains(&name.as_str()) {
            tracing::warn!(entry = %name, "Ignoring unrecognized bundle key");
            continue;
        }
        match rows {
            Value::Array(rows) => {
                archive.entries.insert(name, rows);
            }
            other => {
                return Err(MigrateError::BadEntry {
                    name,
                    reason: format!("expected a list, got {}", type_name(&other)),
                });
            }
        }
    }

    Ok(archive)
}

/// Strict JSON list first, newline-delimited objects as the fallback.
fn parse_rows(name: &str, contents: &[u8]) -> Result<Vec<Value>, MigrateError> {
    if let Ok(Value::Array(rows)) = serde_json::from_slice::<Value>(contents) {
        return Ok(rows);
    }

    let text = std::str::from_utf8(contents).map_err(|err| MigrateError::BadEntry {
        name: name.to_string(),
        reason: err.to_string(),
    })?;

    let mut rows = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row = serde_json::from_str(line).map_err(|err| MigrateError::BadEntry {
            name: name.to_string(),
            reason: err.to_string(),
        })?;
        rows.push(row);
    }

    Ok(rows)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Serialize entity rows into the one-file-per-type zip shape.
pub fn write_archive(entries: &BTreeMap<String, Vec<Value>>) -> Result<Vec<u8>, MigrateError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for (name, rows) in entries {
        writer
            .start_file(format!("{}.json", name), options)
            .map_err(|err| MigrateError::BadContainer(err.to_string()))?;
        let body = serde_json::to_vec_pretty(rows)
            .map_err(|err| MigrateError::BadContainer(err.to_string()))?;
        writer
            .write_all(&body)
            .map_err(|err| MigrateError::BadContainer(err.to_string()))?;
    }

    let cursor = writer
        .finish()
        .map_err(|err| MigrateError::BadContainer(err.to_string()))?;

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use crate::{
        error::migrate::MigrateError,
        service::migrate::archive::{read_archive, write_archive},
    };

    /// A written archive reads back with the same entries
    #[test]
    fn zip_shape_round_trips() {
        let mut entries = BTreeMap::new();
        entries.insert(
            "events".to_string(),
            vec![json!({"id": 1, "code": "EVTX"})],
        );
        entries.insert("teams".to_string(), vec![json!({"id": 5, "team_number": 254})]);

        let bytes = write_archive(&entries).unwrap();
        let archive = read_archive(&bytes).unwrap();

        assert_eq!(archive.rows("events").len(), 1);
        assert_eq!(archive.rows("teams")[0]["team_number"], json!(254));
    }

    /// Raw bundle bytes are accepted without a zip wrapper
    #[test]
    fn bundle_shape_is_accepted() {
        let bundle = json!({
            "events": [{"id": 1, "code": "EVTX"}],
            "unknown_key": [{"whatever": true}],
        });

        let archive = read_archive(&serde_json::to_vec(&bundle).unwrap()).unwrap();

        assert_eq!(archive.rows("events").len(), 1);
        assert!(archive.rows("unknown_key").is_empty());
    }

    /// Newline-delimited entries parse when strict JSON fails
    #[test]
    fn ndjson_fallback_parses() {
        use std::io::Write;

        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("teams.json", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer
            .write_all(b"{\"id\": 1, \"team_number\": 254}\n{\"id\": 2, \"team_number\": 1771}\n")
            .unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let archive = read_archive(&bytes).unwrap();
        assert_eq!(archive.rows("teams").len(), 2);
    }

    /// Garbage bytes are rejected, not silently emptied
    #[test]
    fn garbage_is_rejected() {
        let result = read_archive(b"not an archive");
        assert!(matches!(result, Err(MigrateError::BadContainer(_))));
    }
}
