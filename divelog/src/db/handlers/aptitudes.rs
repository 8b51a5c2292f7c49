//! Database repository for aptitudes.

use std::collections::HashMap;

use sqlx::PgConnection;
use tracing::instrument;

use crate::{
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::aptitudes::{
            Aptitude, AptitudeCreateDBRequest, AptitudeDBResponse, AptitudeFilter, AptitudeUpdateDBRequest,
        },
    },
    types::AptitudeId,
};

const APTITUDE_COLUMNS: &str = "id_aptitude, version, libelle_court, libelle_long";

pub struct Aptitudes<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Aptitudes<'c> {
    type CreateRequest = AptitudeCreateDBRequest;
    type UpdateRequest = AptitudeUpdateDBRequest;
    type Response = AptitudeDBResponse;
    type Id = AptitudeId;
    type Filter = AptitudeFilter;

    #[instrument(skip(self, request), fields(short_label = %request.short_label), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let aptitude = sqlx::query_as::<_, Aptitude>(&format!(
            "INSERT INTO db_aptitude (libelle_court, libelle_long) VALUES ($1, $2) RETURNING {APTITUDE_COLUMNS}"
        ))
        .bind(&request.short_label)
        .bind(&request.long_label)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(aptitude)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let aptitude = sqlx::query_as::<_, Aptitude>(&format!(
            "SELECT {APTITUDE_COLUMNS} FROM db_aptitude WHERE id_aptitude = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(aptitude)
    }

    /// Resolve a set of ids; ids with no matching row are absent from the map
    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<Self::Id>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let aptitudes = sqlx::query_as::<_, Aptitude>(&format!(
            "SELECT {APTITUDE_COLUMNS} FROM db_aptitude WHERE id_aptitude = ANY($1)"
        ))
        .bind(ids.as_slice())
        .fetch_all(&mut *self.db)
        .await?;

        Ok(aptitudes.into_iter().map(|a| (a.id, a)).collect())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let aptitudes = sqlx::query_as::<_, Aptitude>(&format!(
            "SELECT {APTITUDE_COLUMNS} FROM db_aptitude ORDER BY libelle_court ASC LIMIT $1 OFFSET $2"
        ))
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(aptitudes)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let aptitude = sqlx::query_as::<_, Aptitude>(&format!(
            r#"
            UPDATE db_aptitude
            SET libelle_court = COALESCE($2, libelle_court),
                libelle_long = COALESCE($3, libelle_long),
                version = version + 1
            WHERE id_aptitude = $1
            RETURNING {APTITUDE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.short_label.as_deref())
        .bind(request.long_label.as_deref())
        .fetch_one(&mut *self.db)
        .await?;

        Ok(aptitude)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM db_aptitude WHERE id_aptitude = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl<'c> Aptitudes<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Fetch aptitudes in the order of `ids`, skipping ids that don't exist
    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    pub async fn get_by_ids(&mut self, ids: &[AptitudeId]) -> Result<Vec<Aptitude>> {
        let mut found = self.get_bulk(ids.to_vec()).await?;
        Ok(ids.iter().filter_map(|id| found.remove(id)).collect())
    }
}
