//! Raw snapshot to normalized snapshot
//!
//! Validation is all-or-nothing: the first record that fails its schema aborts
//! the whole normalization, so a partially valid feed never reaches the store.

use crate::error::{FeedError, FeedResult, RecordKind};
use crate::models::{Game, NormalizedSnapshot, RawSnapshot, SourcePayload, Team};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Split `raw` by source, validate every record and build the derived views.
///
/// A source that is absent or recorded as failed contributes no records.
pub fn normalize(raw: &RawSnapshot, teams_url: &str, games_url: &str) -> FeedResult<NormalizedSnapshot> {
    let teams: Vec<Team> = parse_records(raw, teams_url, RecordKind::Team)?;
    let games: Vec<Game> = parse_records(raw, games_url, RecordKind::Game)?;

    Ok(NormalizedSnapshot::from_records(teams, games))
}

fn parse_records<T: DeserializeOwned>(raw: &RawSnapshot, url: &str, kind: RecordKind) -> FeedResult<Vec<T>> {
    data_array(raw, url)?
        .iter()
        .enumerate()
        .map(|(index, item)| {
            T::deserialize(item).map_err(|e| FeedError::Validation {
                kind,
                url: url.to_string(),
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// The `data` array of a source's body, or an empty slice when there is nothing to read
fn data_array<'a>(raw: &'a RawSnapshot, url: &str) -> FeedResult<&'a [Value]> {
    let body = match raw.get(url) {
        None | Some(SourcePayload::Failed { .. }) => return Ok(&[]),
        Some(SourcePayload::Body(body)) => body,
    };

    let Some(envelope) = body.as_object() else {
        return Err(FeedError::MalformedPayload {
            url: url.to_string(),
            reason: format!("expected a JSON object, found {}", json_type(body)),
        });
    };

    match envelope.get("data") {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(FeedError::MalformedPayload {
            url: url.to_string(),
            reason: format!("`data` must be an array, found {}", json_type(other)),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
