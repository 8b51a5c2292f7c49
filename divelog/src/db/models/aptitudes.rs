//! Database models for aptitudes (diver qualifications).

use std::num::ParseIntError;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::AptitudeId;

/// Separator used when an aptitude set is stored in a single text column.
pub const APTITUDE_SEPARATOR: char = ';';

/// Database entity model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Aptitude {
    #[sqlx(rename = "id_aptitude")]
    pub id: AptitudeId,
    pub version: i32,
    #[sqlx(rename = "libelle_court")]
    pub short_label: String,
    #[sqlx(rename = "libelle_long")]
    pub long_label: String,
}

/// Request for creating an aptitude
#[derive(Debug, Clone)]
pub struct AptitudeCreateDBRequest {
    pub short_label: String,
    pub long_label: String,
}

/// Request for updating an aptitude; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct AptitudeUpdateDBRequest {
    pub short_label: Option<String>,
    pub long_label: Option<String>,
}

/// Response type (same as entity)
pub type AptitudeDBResponse = Aptitude;

/// Filter for listing aptitudes
#[derive(Debug, Clone)]
pub struct AptitudeFilter {
    pub skip: i64,
    pub limit: i64,
}

impl AptitudeFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

/// Ordered set of aptitude ids as stored on a diver row.
///
/// The column format is the ids joined by [`APTITUDE_SEPARATOR`], e.g. `"1;4;7"`. An empty string
/// means no aptitudes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AptitudeIds(Vec<AptitudeId>);

impl AptitudeIds {
    pub fn new(ids: Vec<AptitudeId>) -> Self {
        let mut deduped = Vec::with_capacity(ids.len());
        for id in ids {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        Self(deduped)
    }

    /// Parse a stored column value. Blank tokens are skipped.
    pub fn parse(column: &str) -> Result<Self, ParseIntError> {
        let ids = column
            .split(APTITUDE_SEPARATOR)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::parse::<AptitudeId>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(ids))
    }

    pub fn to_column_string(&self) -> String {
        self.0
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(&APTITUDE_SEPARATOR.to_string())
    }

    pub fn as_slice(&self) -> &[AptitudeId] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[Aptitude]> for AptitudeIds {
    fn from(aptitudes: &[Aptitude]) -> Self {
        Self::new(aptitudes.iter().map(|a| a.id).collect())
    }
}

impl FromIterator<AptitudeId> for AptitudeIds {
    fn from_iter<I: IntoIterator<Item = AptitudeId>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
