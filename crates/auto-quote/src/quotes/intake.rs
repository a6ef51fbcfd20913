use std::sync::Arc;

use crate::catalog::{VehicleCatalog, YearRange};

use super::domain::QuoteData;

pub const MIN_DRIVER_AGE: u32 = 16;
pub const MAX_DRIVER_AGE: u32 = 100;
pub const EARLIEST_VEHICLE_YEAR: i32 = 1990;
pub const MAX_INCIDENTS: u32 = 10;

/// Validation errors raised before a quote is priced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("email address '{0}' is not valid")]
    InvalidEmail(String),
    #[error("phone number must be exactly 10 digits")]
    InvalidPhone,
    #[error("zip code must be exactly 5 digits")]
    InvalidZip,
    #[error("driver age {found} outside {min}..={max}")]
    AgeOutOfRange { min: u32, max: u32, found: u32 },
    #[error("vehicle year {found} outside {min}..={max}")]
    VehicleYearOutOfRange { min: i32, max: i32, found: i32 },
    #[error("{field} count {found} exceeds {max}")]
    TooManyIncidents {
        field: &'static str,
        max: u32,
        found: u32,
    },
    #[error("vehicle {vehicle_make}/{vehicle_model} is not offered as '{vehicle_type}'")]
    VehicleNotOffered {
        vehicle_type: String,
        vehicle_make: String,
        vehicle_model: String,
    },
    #[error("{vehicle_model} was not built in {year} (model years {years})")]
    YearNotBuilt {
        vehicle_model: String,
        year: i32,
        years: YearRange,
    },
}

/// Checks a submitted form against the same rules the quote form enforces.
#[derive(Debug, Clone)]
pub struct IntakeGuard {
    catalog: Arc<VehicleCatalog>,
}

impl IntakeGuard {
    pub fn new(catalog: Arc<VehicleCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &VehicleCatalog {
        &self.catalog
    }

    /// Reject the first rule the submission breaks, checked in form order.
    pub fn check(&self, data: &QuoteData, current_year: i32) -> Result<(), IntakeViolation> {
        let applicant = &data.applicant;
        required("firstName", &applicant.first_name)?;
        required("lastName", &applicant.last_name)?;
        required("email", &applicant.email)?;
        if !is_email(applicant.email.trim()) {
            return Err(IntakeViolation::InvalidEmail(applicant.email.clone()));
        }
        if !is_digits(&applicant.phone, 10) {
            return Err(IntakeViolation::InvalidPhone);
        }
        if !(MIN_DRIVER_AGE..=MAX_DRIVER_AGE).contains(&applicant.age) {
            return Err(IntakeViolation::AgeOutOfRange {
                min: MIN_DRIVER_AGE,
                max: MAX_DRIVER_AGE,
                found: applicant.age,
            });
        }
        if !is_digits(&applicant.zip, 5) {
            return Err(IntakeViolation::InvalidZip);
        }

        let vehicle = &data.vehicle;
        required("vehicleType", &vehicle.vehicle_type)?;
        required("vehicleMake", &vehicle.vehicle_make)?;
        required("vehicleModel", &vehicle.vehicle_model)?;
        let latest = current_year.saturating_add(1);
        if !(EARLIEST_VEHICLE_YEAR..=latest).contains(&vehicle.vehicle_year) {
            return Err(IntakeViolation::VehicleYearOutOfRange {
                min: EARLIEST_VEHICLE_YEAR,
                max: latest,
                found: vehicle.vehicle_year,
            });
        }

        let (type_id, make_id, model_id) = (
            vehicle.vehicle_type.trim(),
            vehicle.vehicle_make.trim(),
            vehicle.vehicle_model.trim(),
        );
        if !self.catalog.is_selectable(type_id, make_id, model_id) {
            return Err(IntakeViolation::VehicleNotOffered {
                vehicle_type: type_id.to_string(),
                vehicle_make: make_id.to_string(),
                vehicle_model: model_id.to_string(),
            });
        }
        if let Some(years) = self.catalog.year_range(make_id, model_id) {
            if !years.contains(vehicle.vehicle_year) {
                return Err(IntakeViolation::YearNotBuilt {
                    vehicle_model: model_id.to_string(),
                    year: vehicle.vehicle_year,
                    years,
                });
            }
        }

        let coverage = &data.coverage;
        for (field, found) in [
            ("accidents", coverage.accidents),
            ("violations", coverage.violations),
        ] {
            if found > MAX_INCIDENTS {
                return Err(IntakeViolation::TooManyIncidents {
                    field,
                    max: MAX_INCIDENTS,
                    found,
                });
            }
        }
        required("drivingHistory", &coverage.driving_history)?;
        required("coverageLevel", &coverage.coverage_level)?;

        Ok(())
    }
}

fn required(field: &'static str, value: &str) -> Result<(), IntakeViolation> {
    if value.trim().is_empty() {
        Err(IntakeViolation::MissingField { field })
    } else {
        Ok(())
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|byte| byte.is_ascii_digit())
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.contains(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
