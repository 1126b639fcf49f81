//! Repositorios
//!
//! Acceso a los tres registros persistidos: vehículos, beneficiarios y
//! registros de ocupación. Cada llamada del controlador abre una sesión
//! propia y la libera al soltarla, tanto en éxito como en error.

pub mod memory_repository;
pub mod parking_repository;

pub use memory_repository::{MemoryParkingStore, StoreOperation};
pub use parking_repository::PgParkingStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{EntryAllocation, NewOccupancy, OccupancyRecord};
use crate::utils::errors::AppResult;

/// Fuente de sesiones contra los registros
#[async_trait]
pub trait ParkingStore: Send + Sync {
    async fn open_session(&self) -> AppResult<Box<dyn ParkingSession>>;
}

/// Operaciones sobre los registros dentro de una sesión
#[async_trait]
pub trait ParkingSession: Send {
    /// Documento del dueño de la placa (ya normalizada). `None` si el vehículo
    /// no existe o no tiene documento asociado.
    async fn find_vehicle_document(&mut self, plate: &str) -> AppResult<Option<String>>;

    async fn beneficiary_exists(&mut self, document: &str) -> AppResult<bool>;

    /// Registro `ingreso` más reciente de la placa
    async fn find_open_record(&mut self, plate: &str) -> AppResult<Option<OccupancyRecord>>;

    /// Pasa el registro a `salida`. Devuelve `false` si ya no estaba abierto.
    async fn close_record(&mut self, id: i64, exited_at: DateTime<Utc>) -> AppResult<bool>;

    /// Asigna el puesto libre más bajo e inserta el registro, de forma atómica
    /// frente a otros ingresos.
    async fn register_entry(&mut self, entry: NewOccupancy, capacity: i32) -> AppResult<EntryAllocation>;

    async fn occupied_slots(&mut self) -> AppResult<Vec<i32>>;

    async fn ping(&mut self) -> AppResult<()>;
}
