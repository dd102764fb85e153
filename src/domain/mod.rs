//! Phonebook domain model.
//!
//! Two record types and the payloads clients send for them:
//! - [`PhonebookEntry`]: a description grouping zero or more numbers
//! - [`PhoneNumber`]: a single number, optionally linked to one entry
//!
//! Identity is keyed on the server-assigned id. Before first persistence an
//! entity has no id and equals nothing but itself.

mod payload;
mod phone_number;
mod phonebook_entry;

pub use payload::{FieldError, PhoneNumberPayload, PhonebookEntryPayload};
pub use phone_number::PhoneNumber;
pub use phonebook_entry::{PhonebookEntry, PhonebookEntryRef};

/// A persistable record with a surrogate id.
pub trait Entity {
    /// Name used in alert headers and problem bodies (e.g. `phoneNumber`).
    const ENTITY_NAME: &'static str;

    /// Server-assigned id, `None` until first persistence.
    fn id(&self) -> Option<i64>;

    /// Attach the id assigned by storage.
    fn with_id(self, id: i64) -> Self;
}

/// Identity comparison shared by both entities: same value, or both ids set
/// and equal.
pub(crate) fn same_identity<T: Entity>(a: &T, b: &T) -> bool {
    std::ptr::eq(a, b) || matches!((a.id(), b.id()), (Some(x), Some(y)) if x == y)
}
