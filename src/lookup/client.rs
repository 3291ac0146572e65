//! Clearance service client.
//!
//! The service takes a batch of canonical id strings and answers with the
//! records it knows, split by status:
//!
//! ```json
//! {
//!   "approved":   { "npm/npmjs/-/left-pad/1.3.0": { "license": "WTFPL", "authority": "CQ1234", "confidence": 100 } },
//!   "restricted": { "npm/npmjs/-/evil/6.6.6":     { "license": "GPL-3.0", "authority": "clearlydefined" } }
//! }
//! ```
//!
//! Ids the service has never seen are simply absent. Some deployments encode
//! an empty group as `[]`, or list records in an array with an `id` field;
//! both are accepted.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{CheckError, TransportError};

/// A source of authoritative license answers.
#[async_trait]
pub trait ClearanceSource: Send + Sync {
    /// Look up one batch of canonical id strings.
    async fn lookup(&self, ids: &[String]) -> Result<ClearanceResponse, TransportError>;
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClearanceResponse {
    #[serde(default, deserialize_with = "records")]
    pub approved: HashMap<String, ClearanceRecord>,
    #[serde(default, deserialize_with = "records")]
    pub restricted: HashMap<String, ClearanceRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClearanceRecord {
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub authority: Option<String>,
}

/// The service's answer for one id.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Approved(ClearanceRecord),
    Restricted(ClearanceRecord),
    NoRecord,
}

impl ClearanceResponse {
    /// An id listed as both approved and restricted counts as approved.
    pub fn answer_for(&self, id: &str) -> Answer {
        if let Some(record) = self.approved.get(id) {
            Answer::Approved(record.clone())
        } else if let Some(record) = self.restricted.get(id) {
            Answer::Restricted(record.clone())
        } else {
            Answer::NoRecord
        }
    }
}

fn records<'de, D>(deserializer: D) -> Result<HashMap<String, ClearanceRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(HashMap::new()),
        Value::Object(map) => map
            .into_iter()
            .map(|(id, record)| -> Result<(String, ClearanceRecord), D::Error> {
                let record: ClearanceRecord = serde_json::from_value(record).map_err(D::Error::custom)?;
                Ok((id, record))
            })
            .collect(),
        Value::Array(items) => items
            .into_iter()
            .map(|item| -> Result<(String, ClearanceRecord), D::Error> {
                let id = item
                    .get("id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| D::Error::custom("record without id"))?
                    .to_string();
                let record: ClearanceRecord = serde_json::from_value(item).map_err(D::Error::custom)?;
                Ok((id, record))
            })
            .collect(),
        other => Err(D::Error::custom(format!("unexpected record group: {other}"))),
    }
}

/// HTTP implementation: POSTs the batch as a form field `json` holding a JSON
/// array of ids.
pub struct HttpClearanceSource {
    client: Client,
    url: String,
}

impl HttpClearanceSource {
    pub fn new(url: impl Into<String>, request_timeout: Duration) -> Result<Self, CheckError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpClearanceSource {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ClearanceSource for HttpClearanceSource {
    async fn lookup(&self, ids: &[String]) -> Result<ClearanceResponse, TransportError> {
        let payload = serde_json::to_string(ids).map_err(|e| TransportError::Decode(e.to_string()))?;

        let response = self
            .client
            .post(&self.url)
            .header("Accept", "application/json")
            .form(&[("json", payload)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ClearanceResponse>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}
