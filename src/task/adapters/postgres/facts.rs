//! `PostgreSQL` adapter for the trigger-fact store.
//!
//! Predicates read the business tables (documents, claims, case events,
//! invoices, flights) owned by other subsystems; this adapter only ever
//! issues the closed set of `EXISTS` queries the [`FactCheck`] language
//! allows.

use super::repository::TaskPgPool;
use crate::dossier::domain::DossierId;
use crate::task::{
    domain::FactCheck,
    ports::{FactStore, FactStoreError, FactStoreResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Text, Uuid as SqlUuid};

/// `PostgreSQL`-backed read-only fact store.
#[derive(Debug, Clone)]
pub struct PostgresFactStore {
    pool: TaskPgPool,
}

#[derive(QueryableByName)]
struct ExistsRow {
    #[diesel(sql_type = Bool)]
    satisfied: bool,
}

impl PostgresFactStore {
    /// Creates a new fact store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FactStore for PostgresFactStore {
    async fn is_satisfied(
        &self,
        dossier_id: DossierId,
        check: &FactCheck,
    ) -> FactStoreResult<bool> {
        let pool = self.pool.clone();
        let check = check.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(FactStoreError::query)?;
            run_check(&mut connection, dossier_id, &check)
        })
        .await
        .map_err(FactStoreError::query)?
    }
}

fn run_check(
    connection: &mut PgConnection,
    dossier_id: DossierId,
    check: &FactCheck,
) -> FactStoreResult<bool> {
    let row: ExistsRow = match check {
        FactCheck::DocumentApproved { document_type } => diesel::sql_query(concat!(
            "SELECT EXISTS(SELECT 1 FROM documents ",
            "WHERE dossier_id = $1 AND document_type = $2 AND status = 'approved') ",
            "AS satisfied",
        ))
        .bind::<SqlUuid, _>(dossier_id.into_inner())
        .bind::<Text, _>(document_type)
        .get_result(connection)
        .map_err(FactStoreError::query)?,

        FactCheck::ClaimStatusIn { statuses } => {
            let names: Vec<&str> = statuses.iter().map(|status| status.as_str()).collect();
            diesel::sql_query(concat!(
                "SELECT EXISTS(SELECT 1 FROM claims ",
                "WHERE dossier_id = $1 AND status = ANY(string_to_array($2, ','))) ",
                "AS satisfied",
            ))
            .bind::<SqlUuid, _>(dossier_id.into_inner())
            .bind::<Text, _>(names.join(","))
            .get_result(connection)
            .map_err(FactStoreError::query)?
        }

        FactCheck::CaseEventRecorded { event_type } => diesel::sql_query(concat!(
            "SELECT EXISTS(SELECT 1 FROM case_events ",
            "WHERE dossier_id = $1 AND event_type = $2) AS satisfied",
        ))
        .bind::<SqlUuid, _>(dossier_id.into_inner())
        .bind::<Text, _>(event_type)
        .get_result(connection)
        .map_err(FactStoreError::query)?,

        FactCheck::InvoiceSent => diesel::sql_query(concat!(
            "SELECT EXISTS(SELECT 1 FROM invoices ",
            "WHERE dossier_id = $1 AND sent_at IS NOT NULL) AS satisfied",
        ))
        .bind::<SqlUuid, _>(dossier_id.into_inner())
        .get_result(connection)
        .map_err(FactStoreError::query)?,

        FactCheck::FlightHasWaybill => diesel::sql_query(concat!(
            "SELECT EXISTS(SELECT 1 FROM flights ",
            "WHERE dossier_id = $1 AND air_waybill IS NOT NULL) AS satisfied",
        ))
        .bind::<SqlUuid, _>(dossier_id.into_inner())
        .get_result(connection)
        .map_err(FactStoreError::query)?,
    };
    Ok(row.satisfied)
}
