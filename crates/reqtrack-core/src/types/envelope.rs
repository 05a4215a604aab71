//! Wire format for buffered log entries.
//!
//! An envelope is the serialized pre-save field set of one log record,
//! held in the shared buffer between enqueue and flush. Encoding is a
//! single version byte followed by a compact bincode body.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::record::{IpSlot, NewRequestLog};

/// Current wire version. Bumped whenever the envelope field set changes,
/// so entries enqueued before a rolling deploy fail decoding cleanly
/// instead of deserializing into garbage.
pub const WIRE_VERSION: u8 = 1;

/// The buffered form of one log record.
///
/// Headers use a `BTreeMap` so encoding is canonical: the buffer
/// deduplicates on exact byte content, and two captures of identical
/// field values must produce identical bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEnvelope {
    /// Captured IP and its destination storage mode.
    pub ip: IpSlot,
    /// Authenticated principal id; `None` means anonymous.
    pub user_id: Option<Uuid>,
    /// User agent, already truncated at capture time.
    pub user_agent: String,
    /// Request path.
    pub route: String,
    /// HTTP method.
    pub method: String,
    /// Raw encoded query string.
    pub query_params: String,
    /// Response status code.
    pub status_code: i32,
    /// Capture timestamp.
    pub requested_at: DateTime<Utc>,
    /// Originating application name.
    pub app_name: Option<String>,
    /// Captured allow-listed headers.
    pub headers: Option<BTreeMap<String, String>>,
}

impl LogEnvelope {
    /// Encode to the versioned wire form.
    pub fn encode(&self) -> AppResult<Vec<u8>> {
        let body = bincode::serialize(self)?;
        let mut bytes = Vec::with_capacity(body.len() + 1);
        bytes.push(WIRE_VERSION);
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    /// Decode from the versioned wire form. Fails closed on an unknown
    /// version byte or a malformed body.
    pub fn decode(bytes: &[u8]) -> AppResult<Self> {
        match bytes.split_first() {
            Some((&WIRE_VERSION, body)) => Ok(bincode::deserialize(body)?),
            Some((&version, _)) => Err(AppError::serialization(format!(
                "Unsupported buffer wire version {version} (expected {WIRE_VERSION})"
            ))),
            None => Err(AppError::serialization("Empty buffer entry")),
        }
    }

    /// Convert into an insertable record.
    ///
    /// `ip_id` is the resolved registry id for a `Registry` slot and is
    /// ignored for the other variants, so exactly one IP column is ever
    /// populated.
    pub fn into_record(self, ip_id: Option<Uuid>) -> NewRequestLog {
        let (ip_id, ip_address) = match self.ip {
            IpSlot::Registry(_) => (ip_id, None),
            IpSlot::Inline(ip) => (None, Some(ip)),
            IpSlot::Unknown => (None, None),
        };
        NewRequestLog {
            ip_id,
            ip_address,
            user_id: self.user_id,
            user_agent: self.user_agent,
            route: self.route,
            method: self.method,
            query_params: self.query_params,
            status_code: self.status_code,
            requested_at: self.requested_at,
            app_name: self.app_name,
            headers: self.headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LogEnvelope {
        LogEnvelope {
            ip: IpSlot::Registry("10.0.0.1".to_string()),
            user_id: Some(Uuid::new_v4()),
            user_agent: "curl/8.0".to_string(),
            route: "/api/things".to_string(),
            method: "GET".to_string(),
            query_params: "page=2".to_string(),
            status_code: 200,
            requested_at: Utc::now(),
            app_name: Some("shop".to_string()),
            headers: Some(BTreeMap::from([(
                "x-request-id".to_string(),
                "abc".to_string(),
            )])),
        }
    }

    #[test]
    fn encode_is_versioned_and_decodable() {
        let envelope = sample();
        let bytes = envelope.encode().unwrap();
        assert_eq!(bytes[0], WIRE_VERSION);
        assert_eq!(LogEnvelope::decode(&bytes).unwrap(), envelope);
    }

    #[test]
    fn identical_captures_encode_identically() {
        // The buffer deduplicates on byte content; equal field values
        // must collapse to one entry.
        let a = sample();
        let b = a.clone();
        assert_eq!(a.encode().unwrap(), b.encode().unwrap());
    }

    #[test]
    fn unknown_version_fails_closed() {
        let mut bytes = sample().encode().unwrap();
        bytes[0] = WIRE_VERSION + 1;
        assert!(LogEnvelope::decode(&bytes).is_err());
        assert!(LogEnvelope::decode(&[]).is_err());
    }

    #[test]
    fn into_record_populates_exactly_one_ip_field() {
        let registry = sample();
        let id = Uuid::new_v4();
        let record = registry.into_record(Some(id));
        assert_eq!(record.ip_id, Some(id));
        assert_eq!(record.ip_address, None);

        let mut inline = sample();
        inline.ip = IpSlot::Inline("10.0.0.2".to_string());
        let record = inline.into_record(Some(id));
        assert_eq!(record.ip_id, None);
        assert_eq!(record.ip_address.as_deref(), Some("10.0.0.2"));

        let mut unknown = sample();
        unknown.ip = IpSlot::Unknown;
        let record = unknown.into_record(Some(id));
        assert_eq!(record.ip_id, None);
        assert_eq!(record.ip_address, None);
    }
}
