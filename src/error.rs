use chrono::NaiveDate;
use thiserror::Error;

use crate::api::ApiError;
use crate::model::{
    IDENTIFICATION_MAX_LENGTH, IDENTIFICATION_MIN_LENGTH, MAX_AGE, MIN_AGE, PASSWORD_MIN_LENGTH, PHONE_MAX_LENGTH,
    PHONE_MIN_LENGTH,
};

/// Rejections raised before any request leaves the console.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please complete all required fields")]
    MissingFields,
    #[error("Password is required to create a customer")]
    PasswordRequired,
    #[error("Password must have at least {} characters", PASSWORD_MIN_LENGTH)]
    PasswordTooShort,
    #[error("Age must be between {} and {} years", MIN_AGE, MAX_AGE)]
    AgeOutOfRange,
    #[error("Phone must have between {} and {} characters", PHONE_MIN_LENGTH, PHONE_MAX_LENGTH)]
    PhoneLength,
    #[error("Identification must have between {} and {} characters", IDENTIFICATION_MIN_LENGTH, IDENTIFICATION_MAX_LENGTH)]
    IdentificationLength,
    #[error("Initial balance cannot be negative")]
    NegativeBalance,
    #[error("Account {0} is not an active account")]
    InactiveAccount(String),
    #[error("Value must not be zero")]
    ZeroValue,
    #[error("Start date cannot be after end date")]
    StartAfterEnd,
    #[error("Dates cannot be in the future")]
    FutureDate,
    #[error("{0} has no unambiguous day boundary in the selected time zone")]
    UnrepresentableDay(NaiveDate),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to export")]
    EmptyReport,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("PDF error: {0}")]
    Pdf(#[from] genpdf::error::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a number of milliseconds, got {value:?}")]
    InvalidDuration { key: &'static str, value: String },
}

/// Everything a view-model action can end in.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
