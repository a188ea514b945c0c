use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Doctor not found: {0}")]
    DoctorNotFound(Uuid),

    #[error("Invalid date range: end date {end} is before start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Failed to retrieve availability: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<AvailabilityError> for AppError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::DoctorNotFound(_) => {
                AppError::NotFound("Doctor not found".to_string())
            }
            AvailabilityError::InvalidRange { .. } => AppError::BadRequest(err.to_string()),
            AvailabilityError::Storage(source) => {
                tracing::error!("Availability storage error: {:#}", source);
                AppError::Internal("Failed to retrieve availability".to_string())
            }
        }
    }
}
