//! Archive container codec for the Waypost sync core
//!
//! Exports are packaged as a ZIP container with exactly two members:
//! `metadata.json` (a preview-friendly summary) and `data.json` (the full
//! payload). Member names are fixed so decoding never scans the archive.
//!
//! The member JSON keeps the wire spellings Waypost clients have always
//! written (`localData`, `sessionStorage`, `deviceId`, `exportDate`), while
//! the in-memory types use the crate's own tier naming.

use std::io::{Cursor, Read, Write};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::backup::snapshot::Snapshot;
use crate::device::DeviceIdentity;
use crate::error::{WaypostError, WaypostResult};

/// Current archive format version
///
/// Import requires an exact match; there is no migration path.
pub const FORMAT_VERSION: &str = "1.0.0";

/// Name of the summary member
pub const METADATA_MEMBER: &str = "metadata.json";

/// Name of the payload member
pub const DATA_MEMBER: &str = "data.json";

/// Wire key that nests the ephemeral tier inside `localData`
const SESSION_KEY: &str = "sessionStorage";

/// Archive summary stored in `metadata.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveMetadata {
    /// Archive format version
    pub version: String,
    /// When the export was created (ISO-8601)
    pub export_date: String,
    /// Human-readable name of the exporting device
    pub device_name: String,
    /// Data categories contained in the archive
    pub data_types: Vec<String>,
    /// Size in bytes (payload member at encode time; whole archive when
    /// returned from [`peek_metadata`])
    pub file_size: u64,
}

/// Payload stored in `data.json`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    metadata: PayloadMetadata,
    local_data: Map<String, Value>,
}

/// Provenance block inside the payload
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayloadMetadata {
    version: String,
    timestamp: String,
    device_id: String,
    device_name: String,
}

/// Serialize a snapshot and device identity into archive bytes
pub fn encode_archive(snapshot: &Snapshot, identity: &DeviceIdentity) -> WaypostResult<Vec<u8>> {
    let now = Utc::now().to_rfc3339();

    let mut local_data = Map::new();
    for (key, value) in &snapshot.durable {
        local_data.insert(key.clone(), value.clone());
    }
    let mut session = Map::new();
    for (key, value) in &snapshot.ephemeral {
        session.insert(key.clone(), value.clone());
    }
    local_data.insert(SESSION_KEY.to_string(), Value::Object(session));

    let payload = Payload {
        metadata: PayloadMetadata {
            version: FORMAT_VERSION.to_string(),
            timestamp: now.clone(),
            device_id: identity.id.clone(),
            device_name: identity.name.clone(),
        },
        local_data,
    };
    let payload_bytes = serde_json::to_vec(&payload)
        .map_err(|e| WaypostError::Json(format!("Failed to serialize payload: {}", e)))?;

    let metadata = ArchiveMetadata {
        version: FORMAT_VERSION.to_string(),
        export_date: now,
        device_name: identity.name.clone(),
        data_types: vec!["localStorage".to_string(), "sessionStorage".to_string()],
        file_size: payload_bytes.len() as u64,
    };
    let metadata_bytes = serde_json::to_vec(&metadata)
        .map_err(|e| WaypostError::Json(format!("Failed to serialize metadata: {}", e)))?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    writer
        .start_file(METADATA_MEMBER, options)
        .map_err(|e| WaypostError::Format(format!("Failed to start {}: {}", METADATA_MEMBER, e)))?;
    writer
        .write_all(&metadata_bytes)
        .map_err(|e| WaypostError::Io(format!("Failed to write {}: {}", METADATA_MEMBER, e)))?;

    writer
        .start_file(DATA_MEMBER, options)
        .map_err(|e| WaypostError::Format(format!("Failed to start {}: {}", DATA_MEMBER, e)))?;
    writer
        .write_all(&payload_bytes)
        .map_err(|e| WaypostError::Io(format!("Failed to write {}: {}", DATA_MEMBER, e)))?;

    let cursor = writer
        .finish()
        .map_err(|e| WaypostError::Format(format!("Failed to finish archive: {}", e)))?;

    Ok(cursor.into_inner())
}

/// Parse archive bytes back into metadata and a snapshot
///
/// Errors: [`WaypostError::Format`] when the bytes are not a ZIP or a
/// required member is absent, [`WaypostError::Parse`] when a member is not
/// valid JSON, [`WaypostError::Validation`] when the payload lacks its
/// metadata object or required fields are missing.
pub fn decode_archive(bytes: &[u8]) -> WaypostResult<(ArchiveMetadata, Snapshot)> {
    let mut zip = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| WaypostError::Format(format!("Not a valid backup archive: {}", e)))?;

    let metadata_raw = read_member(&mut zip, METADATA_MEMBER)?;
    let data_raw = read_member(&mut zip, DATA_MEMBER)?;

    let metadata_value: Value = serde_json::from_slice(&metadata_raw).map_err(|e| {
        WaypostError::Parse(format!("{} is not valid JSON: {}", METADATA_MEMBER, e))
    })?;
    let data_value: Value = serde_json::from_slice(&data_raw)
        .map_err(|e| WaypostError::Parse(format!("{} is not valid JSON: {}", DATA_MEMBER, e)))?;

    let metadata: ArchiveMetadata = serde_json::from_value(metadata_value).map_err(|e| {
        WaypostError::Validation(format!("{} is missing required fields: {}", METADATA_MEMBER, e))
    })?;

    let provenance = data_value.get("metadata").ok_or_else(|| {
        WaypostError::Validation(format!("{} lacks its metadata object", DATA_MEMBER))
    })?;
    let provenance: PayloadMetadata = serde_json::from_value(provenance.clone()).map_err(|e| {
        WaypostError::Validation(format!("{} metadata is incomplete: {}", DATA_MEMBER, e))
    })?;
    debug!(
        version = %provenance.version,
        device_id = %provenance.device_id,
        device_name = %provenance.device_name,
        timestamp = %provenance.timestamp,
        "Decoded archive payload"
    );

    let snapshot = snapshot_from_local_data(data_value.get("localData"))?;

    Ok((metadata, snapshot))
}

/// Decode an archive but return only its metadata
///
/// The returned `file_size` is the whole archive's byte length, which is
/// what a confirmation prompt wants to show. The payload is still parsed, so
/// a malformed archive fails here exactly as it would on import.
pub fn peek_metadata(bytes: &[u8]) -> WaypostResult<ArchiveMetadata> {
    let (mut metadata, _snapshot) = decode_archive(bytes)?;
    metadata.file_size = bytes.len() as u64;
    Ok(metadata)
}

/// Read one member out of the container
fn read_member(zip: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> WaypostResult<Vec<u8>> {
    let mut member = zip
        .by_name(name)
        .map_err(|e| WaypostError::Format(format!("Archive is missing {}: {}", name, e)))?;

    let mut out = Vec::new();
    member
        .read_to_end(&mut out)
        .map_err(|e| WaypostError::Io(format!("Failed to read {}: {}", name, e)))?;
    Ok(out)
}

/// Split the wire `localData` object back into the two tiers
fn snapshot_from_local_data(local_data: Option<&Value>) -> WaypostResult<Snapshot> {
    let mut snapshot = Snapshot::default();

    let Some(value) = local_data else {
        return Ok(snapshot);
    };
    let entries = value.as_object().ok_or_else(|| {
        WaypostError::Validation("localData must be a JSON object".to_string())
    })?;

    for (key, value) in entries {
        if key == SESSION_KEY {
            let session = value.as_object().ok_or_else(|| {
                WaypostError::Validation(format!("{} must be a JSON object", SESSION_KEY))
            })?;
            for (key, value) in session {
                snapshot.ephemeral.insert(key.clone(), value.clone());
            }
        } else {
            snapshot.durable.insert(key.clone(), value.clone());
        }
    }

    Ok(snapshot)
}
