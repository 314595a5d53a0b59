//! Conversion between Zoho records and the normalized contact model.
//!
//! The projection is lossy in both directions: Zoho has one field per phone
//! label, and organization, contact URL and avatar URL have no Zoho field at
//! all. Empty strings are treated the same as absent fields.

use zohocrm_core::{ContactDraft, NormalizedContact, PhoneLabel, PhoneNumber};

use super::record::ZohoContact;

/// Converts a Zoho record into a normalized contact.
///
/// Returns `None` for records without an id; callers skip those instead of
/// failing the batch.
pub fn to_normalized(record: &ZohoContact) -> Option<NormalizedContact> {
    let id = non_empty(&record.id)?;

    let phone_numbers = PhoneLabel::MAPPED
        .iter()
        .filter_map(|&label| {
            phone_field(record, label)
                .filter(|number| !number.is_empty())
                .map(|number| PhoneNumber::new(label, number.as_str()))
        })
        .collect();

    Some(NormalizedContact {
        id,
        name: non_empty(&record.full_name),
        first_name: non_empty(&record.first_name),
        last_name: non_empty(&record.last_name),
        email: non_empty(&record.email),
        organization: None,
        contact_url: None,
        avatar_url: None,
        phone_numbers,
    })
}

/// Converts a draft into a sparse Zoho record.
///
/// Only fields set on the draft are emitted. When several numbers share a
/// label the last one wins; unmapped labels and the organization are dropped.
pub fn to_provider(draft: &ContactDraft, existing_id: Option<&str>) -> ZohoContact {
    let mut record = ZohoContact {
        id: existing_id.map(str::to_string),
        first_name: non_empty(&draft.first_name),
        last_name: non_empty(&draft.last_name),
        email: non_empty(&draft.email),
        ..Default::default()
    };

    for phone in &draft.phone_numbers {
        if phone.phone_number.is_empty() {
            continue;
        }
        if let Some(field) = phone_field_mut(&mut record, phone.label) {
            *field = Some(phone.phone_number.clone());
        }
    }

    record
}

fn phone_field(record: &ZohoContact, label: PhoneLabel) -> Option<&String> {
    match label {
        PhoneLabel::Home => record.home_phone.as_ref(),
        PhoneLabel::Work => record.phone.as_ref(),
        PhoneLabel::Mobile => record.mobile.as_ref(),
        PhoneLabel::Fax => record.fax.as_ref(),
        PhoneLabel::Other => record.other_phone.as_ref(),
        PhoneLabel::Unmapped => None,
    }
}

fn phone_field_mut(record: &mut ZohoContact, label: PhoneLabel) -> Option<&mut Option<String>> {
    match label {
        PhoneLabel::Home => Some(&mut record.home_phone),
        PhoneLabel::Work => Some(&mut record.phone),
        PhoneLabel::Mobile => Some(&mut record.mobile),
        PhoneLabel::Fax => Some(&mut record.fax),
        PhoneLabel::Other => Some(&mut record.other_phone),
        PhoneLabel::Unmapped => None,
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> ZohoContact {
        ZohoContact {
            id: Some("3652397000000624046".to_string()),
            full_name: Some("Ada Lovelace".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            home_phone: Some("111".to_string()),
            phone: Some("222".to_string()),
            mobile: Some("333".to_string()),
            fax: Some("444".to_string()),
            other_phone: Some("555".to_string()),
        }
    }

    #[test]
    fn record_without_id_is_skipped() {
        let record = ZohoContact {
            id: None,
            ..full_record()
        };
        assert!(to_normalized(&record).is_none());

        let record = ZohoContact {
            id: Some(String::new()),
            ..full_record()
        };
        assert!(to_normalized(&record).is_none());
    }

    #[test]
    fn phones_are_emitted_in_label_order() {
        let contact = to_normalized(&full_record()).unwrap();
        let labels: Vec<_> = contact.phone_numbers.iter().map(|p| p.label).collect();
        assert_eq!(labels, PhoneLabel::MAPPED.to_vec());
        assert_eq!(contact.phone(PhoneLabel::Work), Some("222"));
        assert_eq!(contact.name.as_deref(), Some("Ada Lovelace"));
        assert!(contact.organization.is_none());
        assert!(contact.contact_url.is_none());
        assert!(contact.avatar_url.is_none());
    }

    #[test]
    fn empty_phone_fields_are_not_emitted() {
        let record = ZohoContact {
            id: Some("1".to_string()),
            mobile: Some("333".to_string()),
            fax: Some(String::new()),
            ..Default::default()
        };
        let contact = to_normalized(&record).unwrap();
        assert_eq!(contact.phone_numbers, vec![PhoneNumber::new(PhoneLabel::Mobile, "333")]);
    }

    #[test]
    fn draft_is_sparse() {
        let draft = ContactDraft::new().with_last_name("Hopper");
        let record = to_provider(&draft, None);
        assert_eq!(
            record,
            ZohoContact {
                last_name: Some("Hopper".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn existing_id_is_carried() {
        let record = to_provider(&ContactDraft::new(), Some("42"));
        assert_eq!(record.id.as_deref(), Some("42"));
    }

    #[test]
    fn duplicate_labels_last_write_wins() {
        let draft = ContactDraft::new()
            .with_phone(PhoneLabel::Mobile, "first")
            .with_phone(PhoneLabel::Mobile, "second");
        assert_eq!(to_provider(&draft, None).mobile.as_deref(), Some("second"));
    }

    #[test]
    fn unmapped_label_and_organization_are_dropped() {
        let draft = ContactDraft::new()
            .with_organization("Analytical Engines Ltd")
            .with_phone(PhoneLabel::Unmapped, "999");
        assert_eq!(to_provider(&draft, None), ZohoContact::default());
    }

    #[test]
    fn round_trip_preserves_mapped_fields() {
        let stored = to_normalized(&full_record()).unwrap();
        let draft = ContactDraft::from(&stored).with_organization("dropped");

        let mut record = to_provider(&draft, Some(&stored.id));
        record.full_name = stored.name.clone();
        let back = to_normalized(&record).unwrap();

        assert_eq!(back, stored);
        assert!(back.organization.is_none());
    }
}
