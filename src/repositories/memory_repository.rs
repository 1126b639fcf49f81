//! Registros en memoria
//!
//! Misma interfaz que PostgreSQL, para pruebas y demos locales. La asignación
//! de puestos ocurre bajo un único lock, igual que el advisory lock en la base.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{ParkingSession, ParkingStore};
use crate::models::{EntryAllocation, NewOccupancy, OccupancyRecord, OccupancyState};
use crate::services::slot_allocation::lowest_free_slot;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::normalize_plate;

#[derive(Debug, Default)]
struct MemoryState {
    /// placa tal como se registró (puede tener guiones) -> documento
    vehicles: HashMap<String, Option<String>>,
    beneficiaries: HashSet<String>,
    records: Vec<OccupancyRecord>,
    next_id: i64,
    writes: usize,
    unavailable: Option<String>,
    failing: Option<(StoreOperation, String)>,
    concurrent_exit: bool,
}

/// Operaciones de sesión en las que se puede inyectar una falla
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    FindVehicle,
    BeneficiaryExists,
    FindOpenRecord,
    CloseRecord,
    RegisterEntry,
    OccupiedSlots,
    Ping,
}

impl MemoryState {
    fn check_available(&self, operation: StoreOperation) -> AppResult<()> {
        if let Some(reason) = &self.unavailable {
            return Err(AppError::Database(sqlx::Error::Protocol(reason.clone())));
        }
        match &self.failing {
            Some((failing, reason)) if *failing == operation => {
                Err(AppError::Database(sqlx::Error::Protocol(reason.clone())))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryParkingStore {
    state: Arc<Mutex<MemoryState>>,
    open_sessions: Arc<AtomicUsize>,
}

impl MemoryParkingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_vehicle(&self, plate: &str, document: Option<&str>) {
        let mut state = self.state.lock().await;
        state.vehicles.insert(plate.to_string(), document.map(str::to_string));
    }

    pub async fn add_beneficiary(&self, document: &str) {
        let mut state = self.state.lock().await;
        state.beneficiaries.insert(document.to_string());
    }

    /// Simular una base caída: toda operación falla con `reason`
    pub async fn set_unavailable(&self, reason: Option<&str>) {
        let mut state = self.state.lock().await;
        state.unavailable = reason.map(str::to_string);
    }

    /// Hacer fallar solo `operation`, con la sesión ya abierta
    pub async fn fail_operation(&self, operation: StoreOperation, reason: &str) {
        let mut state = self.state.lock().await;
        state.failing = Some((operation, reason.to_string()));
    }

    /// El próximo `close_record` encuentra el registro ya cerrado por otra solicitud
    pub async fn simulate_concurrent_exit(&self) {
        self.state.lock().await.concurrent_exit = true;
    }

    pub async fn records(&self) -> Vec<OccupancyRecord> {
        self.state.lock().await.records.clone()
    }

    /// Número de escrituras (inserts y updates) aplicadas
    pub async fn write_count(&self) -> usize {
        self.state.lock().await.writes
    }

    /// Sesiones abiertas en este momento
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ParkingStore for MemoryParkingStore {
    async fn open_session(&self) -> AppResult<Box<dyn ParkingSession>> {
        if let Some(reason) = &self.state.lock().await.unavailable {
            return Err(AppError::DatabaseConnection(sqlx::Error::Protocol(reason.clone())));
        }

        self.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryParkingSession {
            state: self.state.clone(),
            open_sessions: self.open_sessions.clone(),
        }))
    }
}

pub struct MemoryParkingSession {
    state: Arc<Mutex<MemoryState>>,
    open_sessions: Arc<AtomicUsize>,
}

impl Drop for MemoryParkingSession {
    fn drop(&mut self) {
        self.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ParkingSession for MemoryParkingSession {
    async fn find_vehicle_document(&mut self, plate: &str) -> AppResult<Option<String>> {
        let state = self.state.lock().await;
        state.check_available(StoreOperation::FindVehicle)?;

        Ok(state
            .vehicles
            .iter()
            .find(|(stored, _)| normalize_plate(stored) == plate)
            .and_then(|(_, document)| document.clone())
            .filter(|document| !document.is_empty()))
    }

    async fn beneficiary_exists(&mut self, document: &str) -> AppResult<bool> {
        let state = self.state.lock().await;
        state.check_available(StoreOperation::BeneficiaryExists)?;
        Ok(state.beneficiaries.contains(document))
    }

    async fn find_open_record(&mut self, plate: &str) -> AppResult<Option<OccupancyRecord>> {
        let state = self.state.lock().await;
        state.check_available(StoreOperation::FindOpenRecord)?;

        Ok(state
            .records
            .iter()
            .filter(|record| record.plate == plate && record.is_open())
            .max_by_key(|record| (record.entered_at, record.id))
            .cloned())
    }

    async fn close_record(&mut self, id: i64, exited_at: DateTime<Utc>) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        state.check_available(StoreOperation::CloseRecord)?;

        if std::mem::take(&mut state.concurrent_exit) {
            if let Some(record) = state.records.iter_mut().find(|record| record.id == id) {
                record.state = OccupancyState::Departed;
                record.exited_at = Some(exited_at);
            }
        }

        let Some(record) = state
            .records
            .iter_mut()
            .find(|record| record.id == id && record.is_open())
        else {
            return Ok(false);
        };

        record.state = OccupancyState::Departed;
        record.exited_at = Some(exited_at);
        state.writes += 1;
        Ok(true)
    }

    async fn register_entry(&mut self, entry: NewOccupancy, capacity: i32) -> AppResult<EntryAllocation> {
        let mut state = self.state.lock().await;
        state.check_available(StoreOperation::RegisterEntry)?;

        if state
            .records
            .iter()
            .any(|record| record.plate == entry.plate && record.is_open())
        {
            return Ok(EntryAllocation::AlreadyInside);
        }

        let occupied: Vec<i32> = state
            .records
            .iter()
            .filter(|record| record.is_open())
            .map(|record| record.slot)
            .collect();

        let Some(slot) = lowest_free_slot(&occupied, capacity) else {
            return Ok(EntryAllocation::Full);
        };

        state.next_id += 1;
        let id = state.next_id;
        state.records.push(OccupancyRecord {
            id,
            plate: entry.plate,
            document: entry.document,
            state: OccupancyState::Occupying,
            entered_at: entry.entered_at,
            exited_at: None,
            slot,
            fee: entry.fee,
        });
        state.writes += 1;

        Ok(EntryAllocation::Assigned(slot))
    }

    async fn occupied_slots(&mut self) -> AppResult<Vec<i32>> {
        let state = self.state.lock().await;
        state.check_available(StoreOperation::OccupiedSlots)?;

        let mut slots: Vec<i32> = state
            .records
            .iter()
            .filter(|record| record.is_open())
            .map(|record| record.slot)
            .collect();
        slots.sort_unstable();
        Ok(slots)
    }

    async fn ping(&mut self) -> AppResult<()> {
        self.state.lock().await.check_available(StoreOperation::Ping)
    }
}
