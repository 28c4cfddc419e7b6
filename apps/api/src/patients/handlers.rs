use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct PatientProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Formatted dd/mm/yyyy; absent when not on record.
    pub date_of_birth: Option<String>,
}

/// Contact card for the clinician a patient is assigned to.
#[derive(Serialize)]
pub struct ClinicianCard {
    pub name: String,
    pub specialization: &'static str,
    pub email: String,
    pub office_address: Option<String>,
    pub office_phone: Option<String>,
    pub mobile_phone: Option<String>,
}

/// GET /api/v1/patients/:id
pub async fn handle_get_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PatientProfile>, AppError> {
    let patient = state
        .store
        .patient(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Patient {id} not found")))?;

    Ok(Json(PatientProfile {
        id: patient.id,
        first_name: patient.first_name,
        last_name: patient.last_name,
        email: patient.email,
        date_of_birth: patient
            .date_of_birth
            .map(|d| d.format("%d/%m/%Y").to_string()),
    }))
}

/// GET /api/v1/patients/:id/clinician
pub async fn handle_get_clinician(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClinicianCard>, AppError> {
    let patient = state
        .store
        .patient(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Patient {id} not found")))?;

    let clinician = state
        .store
        .clinician(patient.clinician_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No clinician assigned to this patient".to_string()))?;

    Ok(Json(ClinicianCard {
        name: clinician.display_name(),
        specialization: "Psychotherapist",
        email: clinician.email,
        office_address: clinician.office_address,
        office_phone: clinician.office_phone,
        mobile_phone: clinician.mobile_phone,
    }))
}
