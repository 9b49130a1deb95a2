use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Common view over every record kind, used by the classifier and the index.
pub trait Record {
    /// The primary date (`occurred_on` or `created_on`)
    fn date(&self) -> NaiveDate;
    /// Free-text fields searched by the index, tags excluded
    fn text_fields(&self) -> Vec<&str>;
    /// Tags (may be empty)
    fn tags(&self) -> &[String];
    /// The category/status/type field compared by category filters
    fn category(&self) -> Option<&str>;
}

/// Discriminant of the record family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Appointment,
    Immunization,
    Medication,
    Contact,
    Document,
    Pet,
}

impl RecordKind {
    pub const ALL: [RecordKind; 6] = [
        RecordKind::Appointment,
        RecordKind::Immunization,
        RecordKind::Medication,
        RecordKind::Contact,
        RecordKind::Document,
        RecordKind::Pet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Appointment => "appointment",
            RecordKind::Immunization => "immunization",
            RecordKind::Medication => "medication",
            RecordKind::Contact => "contact",
            RecordKind::Document => "document",
            RecordKind::Pet => "pet",
        }
    }

    /// Parse a kind name; plural forms are accepted
    pub fn parse_kind(s: &str) -> Option<RecordKind> {
        let s = s.trim().to_lowercase();
        let s = s.strip_suffix('s').unwrap_or(&s);
        RecordKind::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Upcoming,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Upcoming => "upcoming",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub location: String,
    pub occurred_on: NaiveDate,
    /// Free-form time of day, e.g. `09:30`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: AppointmentStatus,
}

// ---------------------------------------------------------------------------
// Immunizations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Immunization {
    #[serde(default)]
    pub id: String,
    pub vaccine: String,
    pub occurred_on: NaiveDate,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

// ---------------------------------------------------------------------------
// Medications
// ---------------------------------------------------------------------------

/// How often a medication is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    OnceDaily,
    TwiceDaily,
    ThreeTimesDaily,
    FourTimesDaily,
    Weekly,
    Monthly,
    AsNeeded,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::OnceDaily => "once_daily",
            Frequency::TwiceDaily => "twice_daily",
            Frequency::ThreeTimesDaily => "three_times_daily",
            Frequency::FourTimesDaily => "four_times_daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::AsNeeded => "as_needed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicationStatus {
    Active,
    Paused,
    Discontinued,
}

impl MedicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MedicationStatus::Active => "active",
            MedicationStatus::Paused => "paused",
            MedicationStatus::Discontinued => "discontinued",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    pub frequency: Frequency,
    pub status: MedicationStatus,
    pub started_on: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

// ---------------------------------------------------------------------------
// Emergency contacts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub relationship: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// 0 = primary, 1 = secondary, anything higher = other
    pub priority: u32,
    #[serde(default)]
    pub notes: String,
    pub created_on: NaiveDate,
}

// ---------------------------------------------------------------------------
// Legacy documents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    Will,
    Insurance,
    Financial,
    Funeral,
    Letter,
    Other,
}

impl DocumentCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentCategory::Will => "will",
            DocumentCategory::Insurance => "insurance",
            DocumentCategory::Financial => "financial",
            DocumentCategory::Funeral => "funeral",
            DocumentCategory::Letter => "letter",
            DocumentCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyDocument {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub category: DocumentCategory,
    #[serde(default)]
    pub content: String,
    /// Where the physical original is kept
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_on: NaiveDate,
}

// ---------------------------------------------------------------------------
// Pet records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetRecordType {
    VetVisit,
    Vaccination,
    Medication,
    Grooming,
    Other,
}

impl PetRecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            PetRecordType::VetVisit => "vet_visit",
            PetRecordType::Vaccination => "vaccination",
            PetRecordType::Medication => "medication",
            PetRecordType::Grooming => "grooming",
            PetRecordType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetRecord {
    #[serde(default)]
    pub id: String,
    pub pet_name: String,
    pub record_type: PetRecordType,
    pub title: String,
    #[serde(default)]
    pub notes: String,
    pub occurred_on: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
}

// ---------------------------------------------------------------------------
// Record impls
// ---------------------------------------------------------------------------

impl Record for Appointment {
    fn date(&self) -> NaiveDate {
        self.occurred_on
    }
    fn text_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.provider.as_str(),
            self.location.as_str(),
            self.notes.as_str(),
        ]
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
    fn category(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl Record for Immunization {
    fn date(&self) -> NaiveDate {
        self.occurred_on
    }
    fn text_fields(&self) -> Vec<&str> {
        vec![
            self.vaccine.as_str(),
            self.provider.as_str(),
            self.location.as_str(),
            self.notes.as_str(),
        ]
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
    fn category(&self) -> Option<&str> {
        None
    }
}

impl Record for Medication {
    fn date(&self) -> NaiveDate {
        self.started_on
    }
    fn text_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.dosage.as_str(), self.notes.as_str()]
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
    fn category(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl Record for EmergencyContact {
    fn date(&self) -> NaiveDate {
        self.created_on
    }
    fn text_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.name.as_str(),
            self.relationship.as_str(),
            self.phone.as_str(),
            self.notes.as_str(),
        ];
        if let Some(email) = &self.email {
            fields.push(email);
        }
        fields
    }
    fn tags(&self) -> &[String] {
        &[]
    }
    fn category(&self) -> Option<&str> {
        Some(&self.relationship)
    }
}

impl Record for LegacyDocument {
    fn date(&self) -> NaiveDate {
        self.created_on
    }
    fn text_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.content.as_str(), self.location.as_str()]
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }
}

impl Record for PetRecord {
    fn date(&self) -> NaiveDate {
        self.occurred_on
    }
    fn text_fields(&self) -> Vec<&str> {
        vec![self.pet_name.as_str(), self.title.as_str(), self.notes.as_str()]
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
    fn category(&self) -> Option<&str> {
        Some(self.record_type.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tagged variant over the whole family
// ---------------------------------------------------------------------------

/// Any record, tagged with its kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnyRecord {
    Appointment(Appointment),
    Immunization(Immunization),
    Medication(Medication),
    Contact(EmergencyContact),
    Document(LegacyDocument),
    Pet(PetRecord),
}

impl AnyRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            AnyRecord::Appointment(_) => RecordKind::Appointment,
            AnyRecord::Immunization(_) => RecordKind::Immunization,
            AnyRecord::Medication(_) => RecordKind::Medication,
            AnyRecord::Contact(_) => RecordKind::Contact,
            AnyRecord::Document(_) => RecordKind::Document,
            AnyRecord::Pet(_) => RecordKind::Pet,
        }
    }

    pub fn id(&self) -> &str {
        self.inner().id()
    }

    /// Short human-readable name (title, vaccine, contact name, ...)
    pub fn display_title(&self) -> &str {
        match self {
            AnyRecord::Appointment(r) => &r.title,
            AnyRecord::Immunization(r) => &r.vaccine,
            AnyRecord::Medication(r) => &r.name,
            AnyRecord::Contact(r) => &r.name,
            AnyRecord::Document(r) => &r.title,
            AnyRecord::Pet(r) => &r.title,
        }
    }

    fn inner(&self) -> &dyn DynRecord {
        match self {
            AnyRecord::Appointment(r) => r,
            AnyRecord::Immunization(r) => r,
            AnyRecord::Medication(r) => r,
            AnyRecord::Contact(r) => r,
            AnyRecord::Document(r) => r,
            AnyRecord::Pet(r) => r,
        }
    }
}

/// Object-safe union of `Record` and the entity id, for `AnyRecord` delegation
trait DynRecord: Record {
    fn id(&self) -> &str;
}

impl<T: Record + Entity> DynRecord for T {
    fn id(&self) -> &str {
        Entity::id(self)
    }
}

impl Record for AnyRecord {
    fn date(&self) -> NaiveDate {
        self.inner().date()
    }
    fn text_fields(&self) -> Vec<&str> {
        self.inner().text_fields()
    }
    fn tags(&self) -> &[String] {
        self.inner().tags()
    }
    fn category(&self) -> Option<&str> {
        self.inner().category()
    }
}

macro_rules! any_record_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for AnyRecord {
                fn from(r: $ty) -> Self {
                    AnyRecord::$variant(r)
                }
            }
        )*
    };
}

any_record_from!(
    Appointment(Appointment),
    Immunization(Immunization),
    Medication(Medication),
    Contact(EmergencyContact),
    Document(LegacyDocument),
    Pet(PetRecord),
);
