//! Zoho CRM wire types.
//!
//! [`ZohoContact`] is the flat record of the Contacts module, keyed by Zoho's
//! own field names. Response bodies are classified exactly once, when they
//! come off the wire, into a [`ZohoResponse`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Mutation outcome code reported for a successful write.
pub const SUCCESS_CODE: &str = "SUCCESS";

/// A record of the Zoho Contacts module.
///
/// Only fields the bridge reads or writes are modelled. `None` fields are
/// omitted on serialization so a write never blanks a remote value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZohoContact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "Full_Name", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(rename = "First_Name", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "Last_Name", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "Email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "Home_Phone", skip_serializing_if = "Option::is_none")]
    pub home_phone: Option<String>,
    /// The work phone.
    #[serde(rename = "Phone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "Mobile", skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(rename = "Fax", skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[serde(rename = "Other_Phone", skip_serializing_if = "Option::is_none")]
    pub other_phone: Option<String>,
}

/// Pagination metadata of a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageInfo {
    pub page: u32,
    pub per_page: u32,
    pub count: u32,
    pub more_records: bool,
}

/// One page of the Contacts list, or the body of a single-record GET.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContactsPage {
    pub data: Vec<ZohoContact>,
    #[serde(default)]
    pub info: PageInfo,
}

/// Zoho's acknowledgement of one record in a create/update/delete.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MutationOutcome {
    pub code: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl MutationOutcome {
    /// Returns true if the outcome code is `SUCCESS`.
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Returns the record id carried in `details`, if any.
    pub fn record_id(&self) -> Option<String> {
        match self.details.get("id")? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

/// Body of a create/update/delete response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MutationResponse {
    pub data: Vec<MutationOutcome>,
}

/// A top-level error body, e.g. `{"code": "INVALID_TOKEN", ...}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiError {
    pub code: Option<String>,
    pub message: Option<String>,
    pub status: Option<String>,
    /// Token endpoints report failures as `{"error": "invalid_code"}`.
    pub error: Option<String>,
}

impl ApiError {
    /// Returns the most specific description available.
    pub fn describe(&self) -> String {
        match (&self.code, &self.message, &self.error) {
            (Some(code), Some(message), _) => format!("{}: {}", code, message),
            (Some(code), None, _) => code.clone(),
            (None, Some(message), _) => message.clone(),
            (None, None, Some(error)) => error.clone(),
            (None, None, None) => "unknown error".to_string(),
        }
    }
}

enum Shape {
    Contacts,
    Mutation,
    Error,
}

/// The shapes a Contacts endpoint can answer with.
#[derive(Debug, Clone, PartialEq)]
pub enum ZohoResponse {
    /// A list page or single-record read.
    Contacts(ContactsPage),
    /// Per-record outcomes of a mutation.
    Mutation(MutationResponse),
    /// A top-level error object.
    Error(ApiError),
    /// No body at all (Zoho answers `204 No Content` for an empty module).
    Empty,
    /// Something that matches none of the above.
    Malformed(String),
}

impl ZohoResponse {
    /// Classifies a raw response body.
    pub fn decode(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::Empty;
        }

        let value: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(e) => return Self::Malformed(format!("invalid JSON: {}", e)),
        };

        if !value.is_object() {
            return Self::Malformed("expected a JSON object".to_string());
        }

        let shape = match value.get("data") {
            Some(Value::Array(items)) => {
                let is_mutation = items
                    .first()
                    .and_then(Value::as_object)
                    .is_some_and(|first| first.contains_key("code") && !first.contains_key("id"));
                if is_mutation { Shape::Mutation } else { Shape::Contacts }
            }
            Some(_) => return Self::Malformed("`data` is not an array".to_string()),
            None if ["code", "error", "message"].iter().any(|k| value.get(*k).is_some()) => {
                Shape::Error
            }
            None => return Self::Malformed("missing `data`".to_string()),
        };

        match shape {
            Shape::Contacts => serde_json::from_value(value)
                .map(Self::Contacts)
                .unwrap_or_else(|e| Self::Malformed(format!("invalid contacts page: {}", e))),
            Shape::Mutation => serde_json::from_value(value)
                .map(Self::Mutation)
                .unwrap_or_else(|e| Self::Malformed(format!("invalid mutation response: {}", e))),
            Shape::Error => serde_json::from_value(value)
                .map(Self::Error)
                .unwrap_or_else(|e| Self::Malformed(format!("invalid error body: {}", e))),
        }
    }

    /// Returns a short name of the shape, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Contacts(_) => "contacts",
            Self::Mutation(_) => "mutation",
            Self::Error(_) => "error",
            Self::Empty => "empty",
            Self::Malformed(_) => "malformed",
        }
    }
}
