//! Record module - patient intake fields recovered from a transcript

use std::collections::BTreeMap;
use std::fmt;

/// One of the fixed intake fields
///
/// Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordField {
    /// Patient name
    Name,
    /// Patient age
    Age,
    /// Condition as described by the patient
    Condition,
    /// Why the patient came in
    ReasonForVisit,
    /// Symptoms, onset and progression
    Symptoms,
    /// Pain on a 1-10 scale
    PainLevel,
    /// Where it hurts and whether it spreads
    PainLocation,
    /// Nausea, dizziness, difficulty breathing and similar
    AdditionalSymptoms,
    /// Recent fever, chills or cough
    FeverOrCough,
    /// Medication or food allergies
    Allergies,
    /// Existing conditions such as diabetes or asthma
    MedicalConditions,
    /// Medications currently taken
    CurrentMedications,
    /// Recent contact with sick people
    ContactWithSickIndividuals,
}

impl RecordField {
    /// Every field, in display order
    pub const ALL: [RecordField; 13] = [
        RecordField::Name,
        RecordField::Age,
        RecordField::Condition,
        RecordField::ReasonForVisit,
        RecordField::Symptoms,
        RecordField::PainLevel,
        RecordField::PainLocation,
        RecordField::AdditionalSymptoms,
        RecordField::FeverOrCough,
        RecordField::Allergies,
        RecordField::MedicalConditions,
        RecordField::CurrentMedications,
        RecordField::ContactWithSickIndividuals,
    ];

    /// Get the field key
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordField::Name => "name",
            RecordField::Age => "age",
            RecordField::Condition => "condition",
            RecordField::ReasonForVisit => "reason_for_visit",
            RecordField::Symptoms => "symptoms",
            RecordField::PainLevel => "pain_level",
            RecordField::PainLocation => "pain_location",
            RecordField::AdditionalSymptoms => "additional_symptoms",
            RecordField::FeverOrCough => "fever_or_cough",
            RecordField::Allergies => "allergies",
            RecordField::MedicalConditions => "medical_conditions",
            RecordField::CurrentMedications => "current_medications",
            RecordField::ContactWithSickIndividuals => "contact_with_sick_individuals",
        }
    }

    /// Parse a field key
    ///
    /// Case, surrounding whitespace, inner spaces and hyphens are normalized,
    /// so `"Reason for visit"` and `"reason-for-visit"` both resolve.
    pub fn parse(s: &str) -> Option<Self> {
        let key = normalize_key(s);
        RecordField::ALL.into_iter().find(|f| f.as_str() == key)
    }

    /// The questionnaire entry that elicits this field
    pub fn question(&self) -> &'static str {
        match self {
            RecordField::Name => "What is the patient's name?",
            RecordField::Age => "What is the patient's age?",
            RecordField::Condition => "What is the patient's condition?",
            RecordField::ReasonForVisit => "Can you tell me why you're here today?",
            RecordField::Symptoms => {
                "When did the patient's symptoms start, and have they gotten worse?"
            }
            RecordField::PainLevel => {
                "How would you rate the patient's pain on a scale from 1 to 10?"
            }
            RecordField::PainLocation => {
                "Where does the patient feel the pain, and does it spread anywhere else?"
            }
            RecordField::AdditionalSymptoms => {
                "Did the patient feel any other symptoms like nausea, dizziness, or difficulty breathing?"
            }
            RecordField::FeverOrCough => {
                "Did the patient have a fever, chills, or a cough recently?"
            }
            RecordField::Allergies => "Is the patient allergic to any medications or foods?",
            RecordField::MedicalConditions => {
                "Does the patient have any medical conditions, such as diabetes, asthma, or heart problems?"
            }
            RecordField::CurrentMedications => "Is the patient taking any medications right now?",
            RecordField::ContactWithSickIndividuals => {
                "Has the patient recently been around anyone who's sick or has similar symptoms?"
            }
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown record field: {}", s))
    }
}

/// Lowercase a key and collapse spaces and hyphens into underscores
pub fn normalize_key(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Patient facts recovered from a finished conversation
///
/// Built once from key/value pairs and never mutated afterwards. Keys that do
/// not name a [`RecordField`] are kept in `unrecognized` instead of being
/// dropped.
///
/// # Examples
///
/// ```
/// use mediassist_domain::{ExtractedRecord, RecordField};
///
/// let record = ExtractedRecord::from_pairs([
///     ("Name".to_string(), "Jane Doe".to_string()),
///     ("favourite_colour".to_string(), "blue".to_string()),
/// ]);
///
/// assert_eq!(record.get(RecordField::Name), Some("Jane Doe"));
/// assert_eq!(record.unrecognized().get("favourite_colour").map(String::as_str), Some("blue"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRecord {
    fields: BTreeMap<RecordField, String>,
    unrecognized: BTreeMap<String, String>,
}

impl ExtractedRecord {
    /// An empty record
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a record from raw key/value pairs
    ///
    /// Empty values are skipped. When a key repeats, the later value wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut record = Self::default();
        for (key, value) in pairs {
            let value: String = value.into();
            if value.trim().is_empty() {
                continue;
            }
            match RecordField::parse(key.as_ref()) {
                Some(field) => {
                    record.fields.insert(field, value);
                }
                None => {
                    record.unrecognized.insert(key.as_ref().trim().to_string(), value);
                }
            }
        }
        record
    }

    /// Value for a field, if present
    pub fn get(&self, field: RecordField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Present fields in display order
    pub fn fields(&self) -> impl Iterator<Item = (RecordField, &str)> {
        self.fields.iter().map(|(f, v)| (*f, v.as_str()))
    }

    /// Fields that were not provided
    pub fn missing(&self) -> Vec<RecordField> {
        RecordField::ALL
            .into_iter()
            .filter(|f| !self.fields.contains_key(f))
            .collect()
    }

    /// Keys that matched no known field
    pub fn unrecognized(&self) -> &BTreeMap<String, String> {
        &self.unrecognized
    }

    /// Number of recognized fields present
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether nothing at all was extracted
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.unrecognized.is_empty()
    }
}
