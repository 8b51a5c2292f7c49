//! Fixtures for repository tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sqlx::PgConnection;

use crate::{
    db::models::divers::DiverCreateDBRequest,
    types::{DiveGroupId, SafetySheetId},
};

/// Noon UTC on the given day
pub fn sheet_at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub async fn create_safety_sheet(conn: &mut PgConnection, timestamp: DateTime<Utc>) -> SafetySheetId {
    sqlx::query_scalar("INSERT INTO db_fiche_securite (timestamp) VALUES ($1) RETURNING id_fiche_securite")
        .bind(timestamp)
        .fetch_one(&mut *conn)
        .await
        .expect("Failed to create safety sheet")
}

pub async fn create_dive_group(conn: &mut PgConnection, safety_sheet_id: SafetySheetId) -> DiveGroupId {
    sqlx::query_scalar("INSERT INTO db_palanque (id_fiche_securite) VALUES ($1) RETURNING id_palanque")
        .bind(safety_sheet_id)
        .fetch_one(&mut *conn)
        .await
        .expect("Failed to create dive group")
}

pub async fn count_divers(conn: &mut PgConnection) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM db_plongeur")
        .fetch_one(&mut *conn)
        .await
        .expect("Failed to count divers")
}

/// A complete, valid diver born on the first of January of `birth_year`
pub fn diver_request(
    dive_group_id: DiveGroupId,
    safety_sheet_id: SafetySheetId,
    last_name: &str,
    first_name: &str,
    birth_year: i32,
) -> DiverCreateDBRequest {
    DiverCreateDBRequest {
        dive_group_id: Some(dive_group_id),
        safety_sheet_id: Some(safety_sheet_id),
        last_name: last_name.to_string(),
        first_name: first_name.to_string(),
        birth_date: NaiveDate::from_ymd_opt(birth_year, 1, 1),
        ..Default::default()
    }
}
