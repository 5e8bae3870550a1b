//! `PostgreSQL` repository implementation for dossier lifecycle storage.

use super::{
    models::{DossierRow, HistoryRow, NewAuditRow, NewDossierRow, NewHistoryRow},
    schema::{audit_logs, dossiers, status_history},
};
use crate::dossier::{
    domain::{
        ActorId, AuditEntry, CaseReference, Dossier, DossierId, DossierStatus, FlowKind,
        HistoryEventId, PersistedDossierData, PersistedHistoryData, StatusHistoryEvent,
    },
    ports::{
        AuditLog, AuditLogError, AuditLogResult, DossierRepository, DossierRepositoryError,
        DossierRepositoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by dossier adapters.
pub type DossierPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed dossier repository.
#[derive(Debug, Clone)]
pub struct PostgresDossierRepository {
    pool: DossierPgPool,
}

/// Outcome of the compare-and-set transition transaction.
enum TransitionOutcome {
    Committed,
    Missing,
    Stale(String),
}

impl PostgresDossierRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: DossierPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> DossierRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> DossierRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(DossierRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(DossierRepositoryError::persistence)?
    }
}

#[async_trait]
impl DossierRepository for PostgresDossierRepository {
    async fn insert(&self, dossier: &Dossier) -> DossierRepositoryResult<()> {
        let dossier_id = dossier.id();
        let reference = dossier.reference().clone();
        let new_row = to_new_dossier_row(dossier);

        self.run_blocking(move |connection| {
            diesel::insert_into(dossiers::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_reference_unique_violation(info.as_ref()) =>
                    {
                        DossierRepositoryError::DuplicateReference(reference.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        DossierRepositoryError::DuplicateDossier(dossier_id)
                    }
                    _ => DossierRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: DossierId) -> DossierRepositoryResult<Option<Dossier>> {
        self.run_blocking(move |connection| {
            let row = dossiers::table
                .filter(dossiers::id.eq(id.into_inner()))
                .select(DossierRow::as_select())
                .first::<DossierRow>(connection)
                .optional()
                .map_err(DossierRepositoryError::persistence)?;
            row.map(row_to_dossier).transpose()
        })
        .await
    }

    async fn commit_transition(
        &self,
        dossier: &Dossier,
        event: &StatusHistoryEvent,
    ) -> DossierRepositoryResult<()> {
        let dossier_id = dossier.id();
        let expected_from = event.from().as_str();
        let new_status = dossier.status().as_str().to_owned();
        let updated_at = dossier.updated_at();
        let history_row = to_new_history_row(event);

        let outcome = self
            .run_blocking(move |connection| {
                connection
                    .transaction::<TransitionOutcome, DieselError, _>(|conn| {
                        // Row lock is the per-dossier serialization point.
                        let current: Option<String> = dossiers::table
                            .filter(dossiers::id.eq(dossier_id.into_inner()))
                            .for_update()
                            .select(dossiers::status)
                            .first::<String>(conn)
                            .optional()?;

                        let Some(stored_status) = current else {
                            return Ok(TransitionOutcome::Missing);
                        };
                        if stored_status != expected_from {
                            return Ok(TransitionOutcome::Stale(stored_status));
                        }

                        diesel::update(
                            dossiers::table.filter(dossiers::id.eq(dossier_id.into_inner())),
                        )
                        .set((
                            dossiers::status.eq(&new_status),
                            dossiers::updated_at.eq(updated_at),
                        ))
                        .execute(conn)?;

                        diesel::insert_into(status_history::table)
                            .values(&history_row)
                            .execute(conn)?;

                        Ok(TransitionOutcome::Committed)
                    })
                    .map_err(DossierRepositoryError::persistence)
            })
            .await?;

        match outcome {
            TransitionOutcome::Committed => Ok(()),
            TransitionOutcome::Missing => Err(DossierRepositoryError::NotFound(dossier_id)),
            TransitionOutcome::Stale(stored) => {
                let stored = DossierStatus::try_from(stored.as_str())
                    .map_err(DossierRepositoryError::persistence)?;
                Err(DossierRepositoryError::StaleTransition { dossier_id, stored })
            }
        }
    }

    async fn update_legal_hold(&self, dossier: &Dossier) -> DossierRepositoryResult<()> {
        let dossier_id = dossier.id();
        let legal_hold = dossier.is_on_legal_hold();
        let reason = dossier.legal_hold_reason().map(str::to_owned);
        let updated_at = dossier.updated_at();

        self.run_blocking(move |connection| {
            let affected = diesel::update(
                dossiers::table.filter(dossiers::id.eq(dossier_id.into_inner())),
            )
            .set((
                dossiers::legal_hold.eq(legal_hold),
                dossiers::legal_hold_reason.eq(reason),
                dossiers::updated_at.eq(updated_at),
            ))
            .execute(connection)
            .map_err(DossierRepositoryError::persistence)?;

            if affected == 0 {
                return Err(DossierRepositoryError::NotFound(dossier_id));
            }
            Ok(())
        })
        .await
    }

    async fn history_for(
        &self,
        id: DossierId,
    ) -> DossierRepositoryResult<Vec<StatusHistoryEvent>> {
        self.run_blocking(move |connection| {
            let rows = status_history::table
                .filter(status_history::dossier_id.eq(id.into_inner()))
                .order(status_history::recorded_at.asc())
                .select(HistoryRow::as_select())
                .load::<HistoryRow>(connection)
                .map_err(DossierRepositoryError::persistence)?;
            rows.into_iter().map(row_to_event).collect()
        })
        .await
    }
}

/// `PostgreSQL`-backed audit log.
#[derive(Debug, Clone)]
pub struct PostgresAuditLog {
    pool: DossierPgPool,
}

impl PostgresAuditLog {
    /// Creates a new audit log from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: DossierPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLog for PostgresAuditLog {
    async fn record(&self, entry: &AuditEntry) -> AuditLogResult<()> {
        let row = NewAuditRow {
            id: entry.id.into_inner(),
            actor_id: entry.actor_id.as_str().to_owned(),
            action: entry.action.as_str().to_owned(),
            target: entry.target.clone(),
            reason: entry.reason.clone(),
            metadata: entry.metadata.clone(),
            recorded_at: entry.recorded_at,
        };
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AuditLogError::persistence)?;
            diesel::insert_into(audit_logs::table)
                .values(&row)
                .execute(&mut connection)
                .map_err(AuditLogError::persistence)?;
            Ok(())
        })
        .await
        .map_err(AuditLogError::persistence)?
    }
}

fn to_new_dossier_row(dossier: &Dossier) -> NewDossierRow {
    NewDossierRow {
        id: dossier.id().into_inner(),
        reference: dossier.reference().as_str().to_owned(),
        flow: dossier.flow().as_str().to_owned(),
        status: dossier.status().as_str().to_owned(),
        legal_hold: dossier.is_on_legal_hold(),
        legal_hold_reason: dossier.legal_hold_reason().map(str::to_owned),
        created_at: dossier.created_at(),
        updated_at: dossier.updated_at(),
    }
}

fn to_new_history_row(event: &StatusHistoryEvent) -> NewHistoryRow {
    NewHistoryRow {
        id: event.id().into_inner(),
        dossier_id: event.dossier_id().into_inner(),
        from_status: event.from().as_str().to_owned(),
        to_status: event.to().as_str().to_owned(),
        actor_id: event.actor_id().as_str().to_owned(),
        privileged: event.privileged(),
        reason: event.reason().map(str::to_owned),
        recorded_at: event.recorded_at(),
    }
}

fn row_to_dossier(row: DossierRow) -> DossierRepositoryResult<Dossier> {
    let reference =
        CaseReference::new(row.reference).map_err(DossierRepositoryError::persistence)?;
    let flow =
        FlowKind::try_from(row.flow.as_str()).map_err(DossierRepositoryError::persistence)?;
    let status = DossierStatus::try_from(row.status.as_str())
        .map_err(DossierRepositoryError::persistence)?;

    Ok(Dossier::from_persisted(PersistedDossierData {
        id: DossierId::from_uuid(row.id),
        reference,
        flow,
        status,
        legal_hold: row.legal_hold,
        legal_hold_reason: row.legal_hold_reason,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn row_to_event(row: HistoryRow) -> DossierRepositoryResult<StatusHistoryEvent> {
    let from = DossierStatus::try_from(row.from_status.as_str())
        .map_err(DossierRepositoryError::persistence)?;
    let to = DossierStatus::try_from(row.to_status.as_str())
        .map_err(DossierRepositoryError::persistence)?;
    let actor_id = ActorId::new(row.actor_id).map_err(DossierRepositoryError::persistence)?;

    Ok(StatusHistoryEvent::from_persisted(PersistedHistoryData {
        id: HistoryEventId::from_uuid(row.id),
        dossier_id: DossierId::from_uuid(row.dossier_id),
        from,
        to,
        actor_id,
        privileged: row.privileged,
        reason: row.reason,
        recorded_at: row.recorded_at,
    }))
}

fn is_reference_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_dossiers_reference_unique")
}
