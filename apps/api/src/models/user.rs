use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PatientRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub clinician_id: Uuid,
}

impl PatientRow {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClinicianRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_phone: Option<String>,
    pub office_phone: Option<String>,
    pub office_address: Option<String>,
    pub structured_notes: bool,
    pub verbose_notes: bool,
    pub parameter_labels: Vec<String>,
    pub parameter_examples: Vec<String>,
}

impl ClinicianRow {
    pub fn display_name(&self) -> String {
        format!("Dr. {} {}", self.first_name, self.last_name)
    }

    /// Best phone number for emergency messages: mobile, then office.
    pub fn contact_phone(&self) -> Option<&str> {
        self.mobile_phone
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .or_else(|| {
                self.office_phone
                    .as_deref()
                    .filter(|p| !p.trim().is_empty())
            })
    }

    pub fn note_preferences(&self) -> NotePreferences {
        NotePreferences {
            structured: self.structured_notes,
            verbose: self.verbose_notes,
            parameter_labels: self.parameter_labels.clone(),
            parameter_examples: self.parameter_examples.clone(),
        }
    }
}

/// Clinician-configured note style, read-only input to the prompt composers.
///
/// `parameter_labels` and `parameter_examples` are paired by position and
/// only used for structured notes; mismatched lengths zip to the shorter.
#[derive(Debug, Clone, Default)]
pub struct NotePreferences {
    pub structured: bool,
    pub verbose: bool,
    pub parameter_labels: Vec<String>,
    pub parameter_examples: Vec<String>,
}
