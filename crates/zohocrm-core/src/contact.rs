//! Contact types shared by providers and the bridge.
//!
//! This module provides the provider-agnostic contact model:
//! - [`NormalizedContact`]: A contact as returned to callers
//! - [`ContactDraft`]: The writable subset used to create or patch a contact
//! - [`PhoneNumber`]: A labeled phone number
//! - [`PhoneLabel`]: The label of a phone number (home, work, mobile, ...)

use std::fmt;

use serde::{Deserialize, Serialize};

/// The label attached to a phone number.
///
/// Providers expose one phone field per label, so at most one number per
/// label survives a conversion. Labels that no provider field corresponds to
/// collapse into [`PhoneLabel::Unmapped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PhoneLabel {
    Home,
    Work,
    Mobile,
    Fax,
    Other,
    /// Any label without a provider field.
    #[serde(other)]
    Unmapped,
}

impl PhoneLabel {
    /// The labels that map onto provider fields, in emission order.
    pub const MAPPED: [PhoneLabel; 5] = [
        Self::Home,
        Self::Work,
        Self::Mobile,
        Self::Fax,
        Self::Other,
    ];

    /// Parses a label case-insensitively. Unknown labels become `Unmapped`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "HOME" => Self::Home,
            "WORK" => Self::Work,
            "MOBILE" => Self::Mobile,
            "FAX" => Self::Fax,
            "OTHER" => Self::Other,
            _ => Self::Unmapped,
        }
    }

    /// Returns the wire name of this label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "HOME",
            Self::Work => "WORK",
            Self::Mobile => "MOBILE",
            Self::Fax => "FAX",
            Self::Other => "OTHER",
            Self::Unmapped => "UNMAPPED",
        }
    }

    /// Returns true if a provider field exists for this label.
    pub fn is_mapped(&self) -> bool {
        !matches!(self, Self::Unmapped)
    }
}

impl fmt::Display for PhoneLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    pub label: PhoneLabel,
    pub phone_number: String,
}

impl PhoneNumber {
    /// Creates a new phone number.
    pub fn new(label: PhoneLabel, phone_number: impl Into<String>) -> Self {
        Self {
            label,
            phone_number: phone_number.into(),
        }
    }
}

/// A contact in the provider-agnostic shape.
///
/// Every normalized contact carries the provider-issued `id`; records without
/// one never become a `NormalizedContact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedContact {
    /// Provider-issued identifier.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Organization name. Not mapped by the Zoho provider.
    pub organization: Option<String>,
    /// Link to the contact in the provider's UI.
    pub contact_url: Option<String>,
    pub avatar_url: Option<String>,
    /// Phone numbers in label order.
    pub phone_numbers: Vec<PhoneNumber>,
}

impl NormalizedContact {
    /// Creates a contact with only an id set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            first_name: None,
            last_name: None,
            email: None,
            organization: None,
            contact_url: None,
            avatar_url: None,
            phone_numbers: Vec::new(),
        }
    }

    /// Builder method to set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder method to set first and last name.
    pub fn with_names(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Builder method to set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Builder method to append a phone number.
    pub fn with_phone(mut self, label: PhoneLabel, number: impl Into<String>) -> Self {
        self.phone_numbers.push(PhoneNumber::new(label, number));
        self
    }

    /// Returns the first phone number with the given label.
    pub fn phone(&self, label: PhoneLabel) -> Option<&str> {
        self.phone_numbers
            .iter()
            .find(|p| p.label == label)
            .map(|p| p.phone_number.as_str())
    }
}

/// The writable part of a contact.
///
/// Used both as a creation template and as a sparse patch: `None` fields are
/// left untouched on the provider side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub organization: Option<String>,
    pub phone_numbers: Vec<PhoneNumber>,
}

impl ContactDraft {
    /// Creates an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the first name.
    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    /// Builder method to set the last name.
    pub fn with_last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    /// Builder method to set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Builder method to set the organization.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Builder method to append a phone number.
    pub fn with_phone(mut self, label: PhoneLabel, number: impl Into<String>) -> Self {
        self.phone_numbers.push(PhoneNumber::new(label, number));
        self
    }
}

impl From<&NormalizedContact> for ContactDraft {
    fn from(contact: &NormalizedContact) -> Self {
        Self {
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            email: contact.email.clone(),
            organization: contact.organization.clone(),
            phone_numbers: contact.phone_numbers.clone(),
        }
    }
}
