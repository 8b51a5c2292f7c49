//! Common type definitions.
//!
//! All entity IDs are database-generated `BIGSERIAL` keys wrapped in type aliases so signatures
//! read by what they identify:
//!
//! - [`DiverId`]: row of `db_plongeur`
//! - [`DiveGroupId`]: row of `db_palanque`
//! - [`SafetySheetId`]: row of `db_fiche_securite`
//! - [`AptitudeId`]: row of `db_aptitude`

// Type aliases for IDs
pub type DiverId = i64;
pub type DiveGroupId = i64;
pub type SafetySheetId = i64;
pub type AptitudeId = i64;
