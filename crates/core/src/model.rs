//! Wire models shared with the satchel API.
//!
//! Field names and shapes mirror the server's JSON exactly; everything
//! here derives both serde directions so the mock server used in tests
//! can speak the same dialect.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::Schema;
use crate::types::{EntityId, Timestamp};

/// Arbitrary per-record payload, keyed by schema field `name`.
///
/// Kept as loose JSON because the server never rejects shape drift:
/// records may carry keys their collection's schema no longer mentions.
/// Use [`crate::value::typecheck_data`] to vet data before submission.
pub type RecordData = serde_json::Map<String, Value>;

/// The authenticated account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: EntityId,
    pub email: String,
    pub full_name: String,
    pub email_verified: bool,
    pub is_active: bool,
    pub created_at: Timestamp,
    #[serde(default)]
    pub last_login: Option<Timestamp>,
}

/// Issued on login, registration, and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
    pub user: User,
}

/// Which OTP flow a verification code belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OtpPurpose {
    Registration,
    Login,
}

/// Generic `{"message": ...}` acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// A user-defined folder of records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    pub id: EntityId,
    pub user_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `None` for free-form collections created without field definitions.
    #[serde(default)]
    pub schema: Option<Schema>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Populated by list/detail endpoints; absent from mutation responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_count: Option<i64>,
}

/// A single row inside a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: EntityId,
    pub collection_id: EntityId,
    pub data: RecordData,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Record {
    /// Value stored under a schema field name, if present.
    pub fn value(&self, field_name: &str) -> Option<&Value> {
        self.data.get(field_name)
    }
}
