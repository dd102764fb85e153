//! Phone number record.

use super::{Entity, PhonebookEntryRef, same_identity};
use serde::Serialize;

/// A single phone number, optionally owned by a phonebook entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    id: Option<i64>,
    number: String,
    phonebook_entry: Option<PhonebookEntryRef>,
}

impl PhoneNumber {
    /// Create an unsaved, unowned phone number.
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            id: None,
            number: number.into(),
            phonebook_entry: None,
        }
    }

    /// Point this number at an entry without touching the entry's collection.
    ///
    /// Storage owns the link on the number side, so loading rows and applying
    /// client payloads go through here. In-memory graphs should prefer
    /// [`PhonebookEntry::add_phone_number`](super::PhonebookEntry::add_phone_number).
    pub fn with_phonebook_entry(mut self, entry: Option<PhonebookEntryRef>) -> Self {
        self.phonebook_entry = entry;
        self
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn set_number(&mut self, number: impl Into<String>) {
        self.number = number.into();
    }

    pub fn phonebook_entry(&self) -> Option<&PhonebookEntryRef> {
        self.phonebook_entry.as_ref()
    }

    /// Replace the back-reference. Crate-internal so entry mutators stay the
    /// only way to build a consistent graph from outside.
    pub(crate) fn set_phonebook_entry(&mut self, entry: Option<PhonebookEntryRef>) {
        self.phonebook_entry = entry;
    }

    /// Id of the owning entry, if linked to a persisted one.
    pub fn phonebook_entry_id(&self) -> Option<i64> {
        self.phonebook_entry.as_ref().and_then(|entry| entry.id)
    }
}

impl Entity for PhoneNumber {
    const ENTITY_NAME: &'static str = "phoneNumber";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}

impl Eq for PhoneNumber {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_follows_id() {
        let first = PhoneNumber::new("AAAAAAAAAA").with_id(1);
        let same = PhoneNumber::new("BBBBBBBBBB").with_id(1);
        assert_eq!(first, same);

        let other = PhoneNumber::new("AAAAAAAAAA").with_id(2);
        assert_ne!(first, other);
    }

    #[test]
    fn unsaved_numbers_only_equal_themselves() {
        let unsaved = PhoneNumber::new("AAAAAAAAAA");
        let twin = PhoneNumber::new("AAAAAAAAAA");
        assert_eq!(unsaved, unsaved);
        assert_ne!(unsaved, twin);
        assert_ne!(unsaved, PhoneNumber::new("AAAAAAAAAA").with_id(2));
    }

    #[test]
    fn serializes_unowned_number_with_null_entry() {
        let number = PhoneNumber::new("AAAAAAAAAA").with_id(7);
        let json = serde_json::to_value(&number).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "number": "AAAAAAAAAA", "phonebookEntry": null})
        );
    }

    #[test]
    fn serializes_entry_reference() {
        let number = PhoneNumber::new("AAAAAAAAAA")
            .with_id(7)
            .with_phonebook_entry(Some(PhonebookEntryRef {
                id: Some(3),
                description: Some("home".to_string()),
            }));
        let json = serde_json::to_value(&number).unwrap();
        assert_eq!(json["phonebookEntry"]["id"], 3);
        assert_eq!(json["phonebookEntry"]["description"], "home");
        assert_eq!(number.phonebook_entry_id(), Some(3));
    }
}
