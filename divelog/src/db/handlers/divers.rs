//! Database repository for divers.

use std::collections::{HashMap, HashSet};

use anyhow::Context;
use chrono::NaiveDate;
use sqlx::{FromRow, PgConnection};
use tracing::{debug, instrument};

use crate::{
    db::{
        errors::Result,
        handlers::{aptitudes::Aptitudes, repository::Repository},
        models::{
            aptitudes::AptitudeIds,
            dive_groups::{DiveGroup, DiveGroupSync},
            divers::{DiverCreateDBRequest, DiverDBResponse, DiverFilter, DiverUpdateDBRequest},
        },
    },
    types::{DiveGroupId, DiverId, SafetySheetId},
};

const DIVER_COLUMNS: &str = "id_plongeur, version, id_palanque, id_fiche_securite, nom, prenom, aptitudes, \
                             telephone, telephone_urgence, date_naissance";

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Diver {
    #[sqlx(rename = "id_plongeur")]
    id: DiverId,
    version: i32,
    #[sqlx(rename = "id_palanque")]
    dive_group_id: DiveGroupId,
    #[sqlx(rename = "id_fiche_securite")]
    safety_sheet_id: SafetySheetId,
    #[sqlx(rename = "nom")]
    last_name: String,
    #[sqlx(rename = "prenom")]
    first_name: String,
    aptitudes: String,
    #[sqlx(rename = "telephone")]
    phone: String,
    #[sqlx(rename = "telephone_urgence")]
    emergency_phone: String,
    #[sqlx(rename = "date_naissance")]
    birth_date: NaiveDate,
}

pub struct Divers<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Divers<'c> {
    type CreateRequest = DiverCreateDBRequest;
    type UpdateRequest = DiverUpdateDBRequest;
    type Response = DiverDBResponse;
    type Id = DiverId;
    type Filter = DiverFilter;

    #[instrument(skip(self, request), fields(dive_group_id = ?request.dive_group_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let valid = request.validate()?;

        let row = sqlx::query_as::<_, Diver>(&format!(
            r#"
            INSERT INTO db_plongeur (
                id_palanque, id_fiche_securite, nom, prenom, aptitudes,
                telephone, telephone_urgence, date_naissance
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {DIVER_COLUMNS}
            "#
        ))
        .bind(valid.dive_group_id)
        .bind(valid.safety_sheet_id)
        .bind(valid.last_name)
        .bind(valid.first_name)
        .bind(request.aptitudes.to_column_string())
        .bind(valid.phone)
        .bind(valid.emergency_phone)
        .bind(valid.birth_date)
        .fetch_one(&mut *self.db)
        .await?;

        debug!(diver_id = row.id, "Inserted diver");
        self.single_response(row).await
    }

    /// Returns `None` unless exactly one row carries the id
    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let rows = sqlx::query_as::<_, Diver>(&format!("SELECT {DIVER_COLUMNS} FROM db_plongeur WHERE id_plongeur = $1"))
            .bind(id)
            .fetch_all(&mut *self.db)
            .await?;

        if rows.len() != 1 {
            return Ok(None);
        }
        Ok(self.to_responses(rows).await?.pop())
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<Self::Id>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, Diver>(&format!("SELECT {DIVER_COLUMNS} FROM db_plongeur WHERE id_plongeur = ANY($1)"))
            .bind(ids.as_slice())
            .fetch_all(&mut *self.db)
            .await?;

        let divers = self.to_responses(rows).await?;
        Ok(divers.into_iter().map(|d| (d.id, d)).collect())
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let rows = match *filter {
            DiverFilter::All => {
                sqlx::query_as::<_, Diver>(&format!("SELECT {DIVER_COLUMNS} FROM db_plongeur ORDER BY id_plongeur ASC"))
                    .fetch_all(&mut *self.db)
                    .await?
            }
            DiverFilter::Latest(count) => {
                if count <= 0 {
                    return Ok(Vec::new());
                }
                // One row per person (name, first name, birth date), taken from their most recent sheet
                sqlx::query_as::<_, Diver>(&format!(
                    r#"
                    SELECT {DIVER_COLUMNS} FROM (
                        SELECT DISTINCT ON (p.nom, p.prenom, p.date_naissance) p.*, f.timestamp AS seen_at
                        FROM db_plongeur p
                        JOIN db_fiche_securite f ON f.id_fiche_securite = p.id_fiche_securite
                        ORDER BY p.nom, p.prenom, p.date_naissance, f.timestamp DESC, p.id_plongeur DESC
                    ) latest
                    ORDER BY seen_at DESC, id_plongeur DESC
                    LIMIT $1
                    "#
                ))
                .bind(count)
                .fetch_all(&mut *self.db)
                .await?
            }
            DiverFilter::DiveGroup(dive_group_id) => {
                sqlx::query_as::<_, Diver>(&format!(
                    "SELECT {DIVER_COLUMNS} FROM db_plongeur WHERE id_palanque = $1 ORDER BY date_naissance ASC, id_plongeur ASC"
                ))
                .bind(dive_group_id)
                .fetch_all(&mut *self.db)
                .await?
            }
            DiverFilter::SafetySheet(safety_sheet_id) => {
                sqlx::query_as::<_, Diver>(&format!(
                    "SELECT {DIVER_COLUMNS} FROM db_plongeur WHERE id_fiche_securite = $1 ORDER BY id_palanque ASC, id_plongeur ASC"
                ))
                .bind(safety_sheet_id)
                .fetch_all(&mut *self.db)
                .await?
            }
        };

        self.to_responses(rows).await
    }

    /// Rewrites every column and bumps the version. The stored version is not compared first:
    /// concurrent updates of the same diver are last-writer-wins.
    #[instrument(skip(self, request), fields(version = ?request.version), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let (valid, next_version) = request.validate()?;

        let row = sqlx::query_as::<_, Diver>(&format!(
            r#"
            UPDATE db_plongeur
            SET id_palanque = $1,
                id_fiche_securite = $2,
                nom = $3,
                prenom = $4,
                aptitudes = $5,
                telephone = $6,
                telephone_urgence = $7,
                date_naissance = $8,
                version = $9
            WHERE id_plongeur = $10
            RETURNING {DIVER_COLUMNS}
            "#
        ))
        .bind(valid.dive_group_id)
        .bind(valid.safety_sheet_id)
        .bind(valid.last_name)
        .bind(valid.first_name)
        .bind(request.aptitudes.to_column_string())
        .bind(valid.phone)
        .bind(valid.emergency_phone)
        .bind(valid.birth_date)
        .bind(next_version)
        .bind(id)
        .fetch_one(&mut *self.db)
        .await?;

        self.single_response(row).await
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM db_plongeur WHERE id_plongeur = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl<'c> Divers<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    pub async fn list_all(&mut self) -> Result<Vec<DiverDBResponse>> {
        self.list(&DiverFilter::All).await
    }

    /// The `count` divers seen most recently at the club
    pub async fn list_latest(&mut self, count: i64) -> Result<Vec<DiverDBResponse>> {
        self.list(&DiverFilter::Latest(count)).await
    }

    pub async fn list_by_dive_group(&mut self, dive_group_id: DiveGroupId) -> Result<Vec<DiverDBResponse>> {
        self.list(&DiverFilter::DiveGroup(dive_group_id)).await
    }

    pub async fn list_by_safety_sheet(&mut self, safety_sheet_id: SafetySheetId) -> Result<Vec<DiverDBResponse>> {
        self.list(&DiverFilter::SafetySheet(safety_sheet_id)).await
    }

    /// Write a dive group's divers back to the database.
    ///
    /// Divers stored under the group whose id is not in `group.divers` are deleted, then members
    /// with an id are updated and members without one are inserted. Every member is written under
    /// `group.id`, whatever dive group its request names. Returns `None` without touching the
    /// database when the group has no divers.
    ///
    /// Every member is validated before the first write. The statements themselves are not wrapped
    /// in a transaction: pass a transaction's connection to [`Divers::new`] if a failure halfway
    /// through must leave the group untouched.
    #[instrument(skip(self, group), fields(dive_group_id = group.id, count = group.divers.len()), err)]
    pub async fn sync_dive_group(&mut self, group: &DiveGroup) -> Result<Option<DiveGroupSync>> {
        if group.divers.is_empty() {
            return Ok(None);
        }

        let members: Vec<_> = group.members().collect();
        for member in &members {
            match member.id {
                Some(_) => {
                    member.diver.validate()?;
                }
                None => {
                    DiverCreateDBRequest::from(member.diver.clone()).validate()?;
                }
            }
        }

        let keep = group.persisted_ids();
        let deleted = sqlx::query("DELETE FROM db_plongeur WHERE id_palanque = $1 AND id_plongeur <> ALL($2)")
            .bind(group.id)
            .bind(keep.as_slice())
            .execute(&mut *self.db)
            .await?
            .rows_affected();

        let mut divers = Vec::with_capacity(members.len());
        let (mut updated, mut inserted) = (0, 0);
        for member in &members {
            let diver = match member.id {
                Some(id) => {
                    updated += 1;
                    self.update(id, &member.diver).await?
                }
                None => {
                    inserted += 1;
                    self.create(&DiverCreateDBRequest::from(member.diver.clone())).await?
                }
            };
            divers.push(diver);
        }

        debug!(deleted, updated, inserted, "Synced dive group divers");
        Ok(Some(DiveGroupSync {
            dive_group_id: group.id,
            divers,
            deleted,
            updated,
            inserted,
        }))
    }

    async fn single_response(&mut self, row: Diver) -> Result<DiverDBResponse> {
        let id = row.id;
        self.to_responses(vec![row])
            .await?
            .pop()
            .with_context(|| format!("diver {id} vanished while resolving aptitudes"))
            .map_err(Into::into)
    }

    /// Map rows to responses, resolving every referenced aptitude with a single lookup
    async fn to_responses(&mut self, rows: Vec<Diver>) -> Result<Vec<DiverDBResponse>> {
        let mut parsed = Vec::with_capacity(rows.len());
        let mut wanted = HashSet::new();
        for row in rows {
            let ids = AptitudeIds::parse(&row.aptitudes)
                .with_context(|| format!("malformed aptitudes column on diver {}: {:?}", row.id, row.aptitudes))?;
            wanted.extend(ids.as_slice().iter().copied());
            parsed.push((row, ids));
        }

        let aptitudes = Aptitudes::new(&mut *self.db).get_bulk(wanted.into_iter().collect()).await?;

        Ok(parsed
            .into_iter()
            .map(|(row, ids)| DiverDBResponse {
                id: row.id,
                version: row.version,
                dive_group_id: row.dive_group_id,
                safety_sheet_id: row.safety_sheet_id,
                last_name: row.last_name,
                first_name: row.first_name,
                aptitudes: ids.as_slice().iter().filter_map(|id| aptitudes.get(id).cloned()).collect(),
                phone: row.phone,
                emergency_phone: row.emergency_phone,
                birth_date: row.birth_date,
            })
            .collect())
    }
}
