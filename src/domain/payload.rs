//! Request payloads and their validation.
//!
//! Every field is optional on the wire. Create and full update require the
//! NOT-NULL fields; partial update only copies what was supplied.

use super::{Entity, PhoneNumber, PhonebookEntry, PhonebookEntryRef};
use serde::{Deserialize, Serialize};

/// A single failed field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub object_name: &'static str,
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn not_null(object_name: &'static str, field: &'static str) -> Self {
        Self {
            object_name,
            field,
            message: "NotNull",
        }
    }
}

/// Body of a phone number request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumberPayload {
    pub id: Option<i64>,
    pub number: Option<String>,
    pub phonebook_entry: Option<PhonebookEntryRef>,
}

impl PhoneNumberPayload {
    /// Build a full record, as required by create and full update.
    ///
    /// The payload id is not carried over; callers decide what id applies.
    pub fn into_phone_number(self) -> Result<PhoneNumber, Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.number.is_none() {
            errors.push(FieldError::not_null(PhoneNumber::ENTITY_NAME, "number"));
        }
        if matches!(&self.phonebook_entry, Some(entry) if entry.id.is_none()) {
            errors.push(FieldError::not_null(PhoneNumber::ENTITY_NAME, "phonebookEntry.id"));
        }

        match self.number {
            Some(number) if errors.is_empty() => {
                Ok(PhoneNumber::new(number).with_phonebook_entry(self.phonebook_entry))
            }
            _ => Err(errors),
        }
    }

    /// Checks for a partial update: a supplied entry reference must carry an id.
    pub fn check_partial(&self) -> Result<(), Vec<FieldError>> {
        match &self.phonebook_entry {
            Some(entry) if entry.id.is_none() => Err(vec![FieldError::not_null(
                PhoneNumber::ENTITY_NAME,
                "phonebookEntry.id",
            )]),
            _ => Ok(()),
        }
    }

    /// Overwrite the supplied non-null fields of `existing`.
    pub fn merge_into(self, existing: &mut PhoneNumber) {
        if let Some(number) = self.number {
            existing.set_number(number);
        }
        if let Some(entry) = self.phonebook_entry.filter(|entry| entry.id.is_some()) {
            existing.set_phonebook_entry(Some(entry));
        }
    }
}

/// Body of a phonebook entry request.
///
/// `phoneNumbers` is accepted and ignored: links are stored on the number side.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhonebookEntryPayload {
    pub id: Option<i64>,
    pub description: Option<String>,
}

impl PhonebookEntryPayload {
    pub fn into_phonebook_entry(self) -> Result<PhonebookEntry, Vec<FieldError>> {
        match self.description {
            Some(description) => Ok(PhonebookEntry::new(description)),
            None => Err(vec![FieldError::not_null(
                PhonebookEntry::ENTITY_NAME,
                "description",
            )]),
        }
    }

    pub fn merge_into(self, existing: &mut PhonebookEntry) {
        if let Some(description) = self.description {
            existing.set_description(description);
        }
    }
}
