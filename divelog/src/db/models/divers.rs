//! Database models for divers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    db::{
        errors::{DbError, Result},
        models::aptitudes::{Aptitude, AptitudeIds},
    },
    types::{DiveGroupId, DiverId, SafetySheetId},
};

/// A persisted diver with its aptitudes resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiverDBResponse {
    pub id: DiverId,
    pub version: i32,
    pub dive_group_id: DiveGroupId,
    pub safety_sheet_id: SafetySheetId,
    pub last_name: String,
    pub first_name: String,
    pub aptitudes: Vec<Aptitude>,
    pub phone: String,
    pub emergency_phone: String,
    pub birth_date: NaiveDate,
}

/// Request for inserting a diver.
///
/// Mirrors the shape of a diver before it is persisted: parent ids and the birth date may still
/// be unset, and [`DiverCreateDBRequest::validate`] rejects the request until they are filled in.
#[derive(Debug, Clone, Default)]
pub struct DiverCreateDBRequest {
    pub dive_group_id: Option<DiveGroupId>,
    pub safety_sheet_id: Option<SafetySheetId>,
    pub last_name: String,
    pub first_name: String,
    pub aptitudes: AptitudeIds,
    pub phone: Option<String>,
    pub emergency_phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Request for updating a diver. Every column is rewritten.
#[derive(Debug, Clone, Default)]
pub struct DiverUpdateDBRequest {
    /// Version the caller last saw; the stored row receives `version + 1`
    pub version: Option<i32>,
    pub dive_group_id: Option<DiveGroupId>,
    pub safety_sheet_id: Option<SafetySheetId>,
    pub last_name: String,
    pub first_name: String,
    pub aptitudes: AptitudeIds,
    pub phone: Option<String>,
    pub emergency_phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Fields checked before any write, in the order they are reported.
pub(crate) struct ValidDiver<'a> {
    pub dive_group_id: DiveGroupId,
    pub safety_sheet_id: SafetySheetId,
    pub last_name: &'a str,
    pub first_name: &'a str,
    pub birth_date: NaiveDate,
    pub phone: &'a str,
    pub emergency_phone: &'a str,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or(DbError::Validation {
        entity: "diver",
        field,
    })
}

fn required_text<'a>(value: &'a str, field: &'static str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(DbError::Validation {
            entity: "diver",
            field,
        });
    }
    Ok(value)
}

fn validate_fields<'a>(
    last_name: &'a str,
    first_name: &'a str,
    birth_date: Option<NaiveDate>,
    dive_group_id: Option<DiveGroupId>,
    safety_sheet_id: Option<SafetySheetId>,
    phone: &'a Option<String>,
    emergency_phone: &'a Option<String>,
) -> Result<ValidDiver<'a>> {
    Ok(ValidDiver {
        last_name: required_text(last_name, "last_name")?,
        first_name: required_text(first_name, "first_name")?,
        birth_date: required(birth_date, "birth_date")?,
        dive_group_id: required(dive_group_id, "dive_group_id")?,
        safety_sheet_id: required(safety_sheet_id, "safety_sheet_id")?,
        // Phones are stored as empty strings, never NULL
        phone: phone.as_deref().unwrap_or_default(),
        emergency_phone: emergency_phone.as_deref().unwrap_or_default(),
    })
}

impl DiverCreateDBRequest {
    pub(crate) fn validate(&self) -> Result<ValidDiver<'_>> {
        validate_fields(
            &self.last_name,
            &self.first_name,
            self.birth_date,
            self.dive_group_id,
            self.safety_sheet_id,
            &self.phone,
            &self.emergency_phone,
        )
    }
}

impl DiverUpdateDBRequest {
    /// Validates the diver fields and returns the version to write.
    pub(crate) fn validate(&self) -> Result<(ValidDiver<'_>, i32)> {
        let valid = validate_fields(
            &self.last_name,
            &self.first_name,
            self.birth_date,
            self.dive_group_id,
            self.safety_sheet_id,
            &self.phone,
            &self.emergency_phone,
        )?;
        let next_version = required(self.version, "version")?
            .checked_add(1)
            .ok_or(DbError::Validation {
                entity: "diver",
                field: "version",
            })?;
        Ok((valid, next_version))
    }
}

impl From<DiverUpdateDBRequest> for DiverCreateDBRequest {
    fn from(request: DiverUpdateDBRequest) -> Self {
        Self {
            dive_group_id: request.dive_group_id,
            safety_sheet_id: request.safety_sheet_id,
            last_name: request.last_name,
            first_name: request.first_name,
            aptitudes: request.aptitudes,
            phone: request.phone,
            emergency_phone: request.emergency_phone,
            birth_date: request.birth_date,
        }
    }
}

/// A not-yet-persisted diver carries no version
impl From<DiverCreateDBRequest> for DiverUpdateDBRequest {
    fn from(request: DiverCreateDBRequest) -> Self {
        Self {
            version: None,
            dive_group_id: request.dive_group_id,
            safety_sheet_id: request.safety_sheet_id,
            last_name: request.last_name,
            first_name: request.first_name,
            aptitudes: request.aptitudes,
            phone: request.phone,
            emergency_phone: request.emergency_phone,
            birth_date: request.birth_date,
        }
    }
}

impl From<DiverDBResponse> for DiverUpdateDBRequest {
    fn from(diver: DiverDBResponse) -> Self {
        Self {
            version: Some(diver.version),
            dive_group_id: Some(diver.dive_group_id),
            safety_sheet_id: Some(diver.safety_sheet_id),
            aptitudes: AptitudeIds::from(diver.aptitudes.as_slice()),
            last_name: diver.last_name,
            first_name: diver.first_name,
            phone: Some(diver.phone),
            emergency_phone: Some(diver.emergency_phone),
            birth_date: Some(diver.birth_date),
        }
    }
}

/// Which divers to list, and in which order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiverFilter {
    /// Every diver, by id ascending
    All,
    /// The `n` most recently seen distinct divers, by safety sheet timestamp descending
    Latest(i64),
    /// Divers of a dive group, youngest last (birth date ascending)
    DiveGroup(DiveGroupId),
    /// Divers under a safety sheet, by dive group id ascending
    SafetySheet(SafetySheetId),
}
