//! Mapping between typed records and store documents.
//!
//! `created_at` is written as fixed-width ISO-8601 text (microseconds, `+00:00`)
//! so string order in the store matches chronological order. On the way back it
//! may be text or a native BSON datetime; both normalize to `DateTime<Utc>`.

use bson::{Bson, Document};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::store::INTERNAL_ID;

const CREATED_AT: &str = "created_at";

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("stored document does not match the record shape: {0}")]
    Decode(#[from] bson::de::Error),
    #[error("record could not be encoded as a document: {0}")]
    Encode(#[from] bson::ser::Error),
}

/// Creation time at the precision it is persisted with.
pub fn creation_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn timestamp_text(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, false)
}

pub fn parse_timestamp_text(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    // offset-less text is taken as UTC
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|err| format!("failed to parse '{raw}' as an ISO-8601 timestamp ({err})"))
}

/// Accepts ISO-8601 text or a native BSON datetime.
pub fn normalize_timestamp(value: &Bson) -> Result<DateTime<Utc>, String> {
    match value {
        Bson::String(raw) => parse_timestamp_text(raw),
        Bson::DateTime(native) => DateTime::from_timestamp_millis(native.timestamp_millis())
            .ok_or_else(|| format!("stored datetime {native} is out of range")),
        other => Err(format!(
            "expected a timestamp, found {:?}",
            other.element_type()
        )),
    }
}

pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Bson::deserialize(deserializer)?;
    normalize_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// Encodes a record for insertion, with `created_at` stored as text.
pub fn to_document<T: Serialize>(
    record: &T,
    created_at: &DateTime<Utc>,
) -> Result<Document, RecordError> {
    let mut document = bson::to_document(record)?;
    document.insert(CREATED_AT, timestamp_text(created_at));
    Ok(document)
}

/// Decodes a stored document, dropping the internal identifier if present.
pub fn from_document<T: DeserializeOwned>(mut document: Document) -> Result<T, RecordError> {
    document.remove(INTERNAL_ID);
    Ok(bson::from_document(document)?)
}
