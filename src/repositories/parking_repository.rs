use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::{Connection, PgPool, Postgres};
use tracing::debug;

use super::{ParkingSession, ParkingStore};
use crate::models::{EntryAllocation, NewOccupancy, OccupancyRecord, OccupancyState};
use crate::services::slot_allocation::lowest_free_slot;
use crate::utils::errors::{AppError, AppResult};

/// Llave del advisory lock que serializa la asignación de puestos
const SLOT_ALLOCATION_LOCK: i64 = 0x5041_5251;

pub struct PgParkingStore {
    pool: PgPool,
}

impl PgParkingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParkingStore for PgParkingStore {
    async fn open_session(&self) -> AppResult<Box<dyn ParkingSession>> {
        let conn = self.pool.acquire().await.map_err(AppError::DatabaseConnection)?;
        Ok(Box::new(PgParkingSession { conn }))
    }
}

/// Sesión sobre una conexión del pool. La conexión vuelve al pool al soltar
/// la sesión.
pub struct PgParkingSession {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl ParkingSession for PgParkingSession {
    async fn find_vehicle_document(&mut self, plate: &str) -> AppResult<Option<String>> {
        let row: Option<(Option<String>,)> = sqlx::query_as(
            "SELECT documento FROM vehiculos WHERE REPLACE(placa, '-', '') = $1 LIMIT 1",
        )
        .bind(plate)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row
            .and_then(|(document,)| document)
            .filter(|document| !document.is_empty()))
    }

    async fn beneficiary_exists(&mut self, document: &str) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM beneficiarios WHERE documento = $1)",
        )
        .bind(document)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(result.0)
    }

    async fn find_open_record(&mut self, plate: &str) -> AppResult<Option<OccupancyRecord>> {
        let record = sqlx::query_as::<_, OccupancyRecord>(
            r#"
            SELECT id, placa, documento, estado, fecha_ingreso, fecha_salida, puesto, valor_parqueo
            FROM registros
            WHERE placa = $1 AND estado = $2
            ORDER BY fecha_ingreso DESC
            LIMIT 1
            "#,
        )
        .bind(plate)
        .bind(OccupancyState::Occupying)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(record)
    }

    async fn close_record(&mut self, id: i64, exited_at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE registros SET estado = $1, fecha_salida = $2 WHERE id = $3 AND estado = $4",
        )
        .bind(OccupancyState::Departed)
        .bind(exited_at)
        .bind(id)
        .bind(OccupancyState::Occupying)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn register_entry(&mut self, entry: NewOccupancy, capacity: i32) -> AppResult<EntryAllocation> {
        let mut tx = self.conn.begin().await?;

        // Se libera solo al terminar la transacción
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SLOT_ALLOCATION_LOCK)
            .execute(&mut *tx)
            .await?;

        let already_inside: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM registros WHERE placa = $1 AND estado = $2)",
        )
        .bind(&entry.plate)
        .bind(OccupancyState::Occupying)
        .fetch_one(&mut *tx)
        .await?;

        if already_inside {
            tx.rollback().await?;
            return Ok(EntryAllocation::AlreadyInside);
        }

        let occupied: Vec<i32> = sqlx::query_scalar("SELECT puesto FROM registros WHERE estado = $1")
            .bind(OccupancyState::Occupying)
            .fetch_all(&mut *tx)
            .await?;

        let Some(slot) = lowest_free_slot(&occupied, capacity) else {
            tx.rollback().await?;
            return Ok(EntryAllocation::Full);
        };

        debug!("🅿️ Puesto {} libre para {} ({} ocupados)", slot, entry.plate, occupied.len());

        sqlx::query(
            r#"
            INSERT INTO registros (placa, documento, estado, fecha_ingreso, puesto, valor_parqueo)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&entry.plate)
        .bind(&entry.document)
        .bind(OccupancyState::Occupying)
        .bind(entry.entered_at)
        .bind(slot)
        .bind(entry.fee)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(EntryAllocation::Assigned(slot))
    }

    async fn occupied_slots(&mut self) -> AppResult<Vec<i32>> {
        let slots = sqlx::query_scalar("SELECT puesto FROM registros WHERE estado = $1 ORDER BY puesto")
            .bind(OccupancyState::Occupying)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(slots)
    }

    async fn ping(&mut self) -> AppResult<()> {
        self.conn.ping().await?;
        Ok(())
    }
}
