//! Soroban RPC client — polls `getEvents` and decodes ledger events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.
//!
//! ## Payload shape
//!
//! Events are requested with `xdrFormat: "json"`, so topics and values arrive
//! as JSON-encoded `ScVal`s (`{"symbol":"funded"}`, `{"u64":"3"}`,
//! `{"map":[{"key":…,"val":…}]}`). Older `{"type":…,"value":…}` shapes and
//! bare strings are accepted too.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, LedgerEvent};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// `ScVal` tags whose JSON form wraps a single scalar.
const SCALAR_TAGS: &[&str] = &[
    "address", "symbol", "string", "bool", "u32", "i32", "u64", "i64", "u128", "i128",
];

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct RawEvent {
    /// JSON-decoded topic list
    #[serde(default, rename = "topicJson", alias = "topic")]
    pub topic: Vec<Value>,
    /// JSON-decoded event value / data
    #[serde(default, rename = "valueJson", alias = "value")]
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger` — the ledger sequence to scan from (inclusive).
/// * `cursor`       — optional opaque pagination cursor from a previous response.
/// * `limit`        — maximum number of events to return.
///
/// Returns `(events, next_cursor, latest_ledger)`.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<(Vec<RawEvent>, Option<String>, Option<u64>)> {
    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        let params = build_params(contract_id, start_ledger, cursor, limit);

        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        let resp = match response {
            Ok(resp) => resp,
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                backoff = sleep_backoff(backoff).await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate-limited by RPC (will retry in {backoff}s)");
            backoff = sleep_backoff(backoff).await;
            continue;
        }

        let body: RpcResponse = resp.json().await?;

        if let Some(err) = body.error {
            if is_hard_error(err.code) {
                return Err(IndexerError::Rpc {
                    code: err.code,
                    message: err.message,
                });
            }
            warn!(
                "RPC soft error (will retry in {backoff}s): {} {}",
                err.code, err.message
            );
            backoff = sleep_backoff(backoff).await;
            continue;
        }

        let result = body.result.ok_or_else(|| {
            IndexerError::EventParse("Empty result from getEvents".to_string())
        })?;

        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        return Ok((result.events, result.cursor, result.latest_ledger));
    }
}

/// Invalid request / unknown method never succeed on retry.
fn is_hard_error(code: i64) -> bool {
    code == -32600 || code == -32601
}

/// Sleep for `backoff` seconds and return the next, doubled, delay.
async fn sleep_backoff(backoff: u64) -> u64 {
    tokio::time::sleep(Duration::from_secs(backoff)).await;
    (backoff * 2).min(MAX_BACKOFF_SECS)
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        },
        "xdrFormat": "json"
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`LedgerEvent`] structs.
///
/// Events from failed contract calls are dropped: their effects were rolled back.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<LedgerEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call.unwrap_or(true))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<LedgerEvent> {
    // Extract leading topic symbol to determine event type.
    let first_topic = raw.topic.first()?;
    let kind = EventKind::from_topic(&scalar_string(first_topic)?);

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let project_id = raw.topic.get(1).and_then(scalar_string);

    let data = normalize(&raw.value);
    let actor = extract_field(&data, kind.actor_keys());
    let amount = extract_field(&data, kind.amount_keys());

    let event_id = raw.id.clone().unwrap_or_else(|| {
        format!(
            "{ledger}-{}-{}-{}",
            raw.tx_hash.as_deref().unwrap_or("-"),
            kind.as_str(),
            project_id.as_deref().unwrap_or("-")
        )
    });

    Some(LedgerEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        project_id,
        actor,
        amount,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

/// Collapse JSON `ScVal` wrappers into plain JSON.
///
/// `{"map":[{"key":{"symbol":"amount"},"val":{"i128":"5"}}]}` becomes
/// `{"amount":"5"}`; single-scalar wrappers become their inner value.
fn normalize(value: &Value) -> Value {
    let Value::Object(obj) = value else {
        return value.clone();
    };
    let mut fields = obj.iter();
    let (Some((tag, inner)), None) = (fields.next(), fields.next()) else {
        return value.clone();
    };

    match (tag.as_str(), inner) {
        ("map", Value::Array(entries)) => {
            let mut out = Map::new();
            for entry in entries {
                let key = entry.get("key").and_then(scalar_string);
                if let (Some(key), Some(val)) = (key, entry.get("val")) {
                    out.insert(key, normalize(val));
                }
            }
            Value::Object(out)
        }
        (tag, inner) if SCALAR_TAGS.contains(&tag) => inner.clone(),
        _ => value.clone(),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find_map(scalar_string)
        .or_else(|| keys.iter().find_map(|key| find_nested(value, key)))
}

fn find_nested(value: &Value, key: &str) -> Option<String> {
    if let Value::Object(map) = value {
        for (k, v) in map {
            if k == key {
                return scalar_string(v);
            }
            if let Some(found) = find_nested(v, key) {
                return Some(found);
            }
        }
    }
    None
}

/// Render a topic or field as a plain string.
///
/// Accepts bare strings and numbers, `ScVal` wrappers such as
/// `{"symbol":"created"}`, the `{"type":…,"value":…}` shape, and JSON text
/// containing any of those.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed @ Value::Object(_)) => scalar_string(&parsed),
            _ => Some(s.clone()),
        },
        Value::Number(n) => Some(n.to_string()),
        Value::Object(obj) => {
            if let Some(inner) = obj.get("value") {
                return scalar_string(inner);
            }
            SCALAR_TAGS
                .iter()
                .find_map(|tag| obj.get(*tag))
                .and_then(scalar_string)
        }
        _ => None,
    }
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    use chrono::DateTime;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
