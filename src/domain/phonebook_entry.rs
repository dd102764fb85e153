//! Phonebook entry record and its link to phone numbers.

use super::{Entity, PhoneNumber, same_identity};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};

/// Lightweight reference from a phone number to its owning entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhonebookEntryRef {
    pub id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PhonebookEntryRef {
    pub fn from_id(id: i64) -> Self {
        Self {
            id: Some(id),
            description: None,
        }
    }
}

/// A phonebook entry.
///
/// The entry owns the numbers it currently references. Every member's
/// back-reference points at this entry; the mutators below keep that true.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhonebookEntry {
    id: Option<i64>,
    description: String,
    #[serde(serialize_with = "serialize_members")]
    phone_numbers: Vec<PhoneNumber>,
}

impl PhonebookEntry {
    /// Create an unsaved entry with no numbers.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: None,
            description: description.into(),
            phone_numbers: Vec::new(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.relink_members();
    }

    /// Numbers currently owned by this entry, in no defined order.
    pub fn phone_numbers(&self) -> &[PhoneNumber] {
        &self.phone_numbers
    }

    /// Reference value stored in each member's back-reference.
    pub fn entry_ref(&self) -> PhonebookEntryRef {
        PhonebookEntryRef {
            id: self.id,
            description: Some(self.description.clone()),
        }
    }

    /// Add a number, pointing its back-reference here.
    ///
    /// A member with the same identity is replaced rather than duplicated.
    pub fn add_phone_number(&mut self, mut number: PhoneNumber) -> &mut Self {
        number.set_phonebook_entry(Some(self.entry_ref()));
        match self.phone_numbers.iter_mut().find(|n| **n == number) {
            Some(existing) => *existing = number,
            None => self.phone_numbers.push(number),
        }
        self
    }

    /// Remove a number and clear its back-reference.
    ///
    /// Returns the detached number, or `None` if it was not a member.
    pub fn remove_phone_number(&mut self, number: &PhoneNumber) -> Option<PhoneNumber> {
        let index = self.phone_numbers.iter().position(|n| n == number)?;
        let mut removed = self.phone_numbers.remove(index);
        removed.set_phonebook_entry(None);
        Some(removed)
    }

    /// Replace the whole collection.
    ///
    /// Previous members come back detached; new members point here.
    pub fn set_phone_numbers(
        &mut self,
        numbers: impl IntoIterator<Item = PhoneNumber>,
    ) -> Vec<PhoneNumber> {
        let mut previous = std::mem::take(&mut self.phone_numbers);
        for number in &mut previous {
            number.set_phonebook_entry(None);
        }
        for number in numbers {
            self.add_phone_number(number);
        }
        previous
    }

    fn relink_members(&mut self) {
        let entry_ref = self.entry_ref();
        for number in &mut self.phone_numbers {
            number.set_phonebook_entry(Some(entry_ref.clone()));
        }
    }
}

impl Entity for PhonebookEntry {
    const ENTITY_NAME: &'static str = "phonebookEntry";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self.relink_members();
        self
    }
}

impl PartialEq for PhonebookEntry {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}

impl Eq for PhonebookEntry {}

/// Members are written without their back-reference to keep the JSON acyclic.
fn serialize_members<S: Serializer>(
    numbers: &[PhoneNumber],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Member<'a> {
        id: Option<i64>,
        number: &'a str,
    }

    let mut seq = serializer.serialize_seq(Some(numbers.len()))?;
    for number in numbers {
        seq.serialize_element(&Member {
            id: number.id(),
            number: number.number(),
        })?;
    }
    seq.end()
}
