use serde::Serialize;
use serde::de::DeserializeOwned;

use super::book::{DocumentChapter, DocumentPage};
use super::message::ScheduledMessage;
use super::record::{
    Appointment, EmergencyContact, Immunization, LegacyDocument, Medication, PetRecord,
};

/// A persisted entity: one row in one table of the record store.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// Table name in the store (also the file stem in the file store)
    const TABLE: &'static str;
    /// Prefix for generated ids, e.g. `MSG` for `MSG-001`
    const ID_PREFIX: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);

    /// Invariants serde cannot express, checked on every decoded row.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Next id for a table: `PREFIX-NNN` where NNN is one more than the highest
/// numeric suffix among `existing_ids` carrying the same prefix. Suffixes
/// that cannot be incremented are ignored.
pub fn next_id<'a, I>(prefix: &str, existing_ids: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix_dash = format!("{}-", prefix);
    let next = existing_ids
        .into_iter()
        .filter_map(|id| id.strip_prefix(&prefix_dash))
        .filter_map(|num| num.parse::<usize>().ok()?.checked_add(1))
        .max()
        .unwrap_or(1);
    format!("{}-{:03}", prefix, next)
}

macro_rules! entity {
    ($ty:ty, $table:literal, $prefix:literal $(, check = $check:path)?) => {
        impl Entity for $ty {
            const TABLE: &'static str = $table;
            const ID_PREFIX: &'static str = $prefix;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            $(
                fn check(&self) -> Result<(), String> {
                    $check(self)
                }
            )?
        }
    };
}

entity!(Appointment, "appointments", "APT");
entity!(Immunization, "immunizations", "IMM");
entity!(Medication, "medications", "MED");
entity!(EmergencyContact, "emergency_contacts", "CON");
entity!(LegacyDocument, "legacy_documents", "DOC");
entity!(PetRecord, "pet_records", "PET");
entity!(
    ScheduledMessage,
    "scheduled_messages",
    "MSG",
    check = ScheduledMessage::check_delivery
);
entity!(DocumentChapter, "memory_book_chapters", "CH");
entity!(DocumentPage, "memory_book_pages", "PG");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_empty() {
        assert_eq!(next_id("MSG", std::iter::empty()), "MSG-001");
    }

    #[test]
    fn test_next_id_skips_gaps_and_foreign_prefixes() {
        let ids = ["MSG-001", "MSG-007", "PG-040", "MSG-bad"];
        assert_eq!(next_id("MSG", ids), "MSG-008");
    }

    #[test]
    fn test_next_id_grows_past_padding() {
        let ids = ["CH-999"];
        assert_eq!(next_id("CH", ids), "CH-1000");
    }

    #[test]
    fn test_next_id_ignores_suffix_at_limit() {
        let top = format!("MSG-{}", usize::MAX);
        let ids = ["MSG-004", top.as_str()];
        assert_eq!(next_id("MSG", ids), "MSG-005");
        assert_eq!(next_id("MSG", [top.as_str()]), "MSG-001");
    }
}
