//! IP registry entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A unique IP address sighted in request traffic (normalized mode only).
///
/// Created lazily on first sighting, never updated, and referenced by
/// many log rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IpAddress {
    /// Unique registry identifier.
    pub id: Uuid,
    /// The IP address in IPv4 or IPv6 textual form.
    pub ip: String,
}
