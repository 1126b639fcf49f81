//! Controlador de acceso
//!
//! Valida la placa, consulta el registro de vehículos y de beneficiarios, y
//! alterna el vehículo entre ingreso y salida asignando o liberando puesto.
//! Cada llamada hace como máximo una escritura, y solo después de que todas
//! las lecturas terminaron bien.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::parking::{ENTRY_FEE, NUM_SLOTS};
use crate::models::{AccessOutcome, DenialReason, EntryAllocation, NewOccupancy, OccupancySnapshot};
use crate::repositories::ParkingStore;
use crate::utils::errors::{bad_request_error, AppError, AppResult};
use crate::utils::validation::validate_plate;

pub const PLATE_MISSING: &str = "Placa no proporcionada";

#[derive(Clone)]
pub struct AccessController {
    store: Arc<dyn ParkingStore>,
    capacity: i32,
}

impl AccessController {
    pub fn new(store: Arc<dyn ParkingStore>) -> Self {
        Self {
            store,
            capacity: NUM_SLOTS,
        }
    }

    pub async fn process_plate_event(&self, raw_plate: &str) -> AppResult<AccessOutcome> {
        let plate = validate_plate(raw_plate).map_err(|error| {
            debug!("⚠️ Placa {:?} rechazada: {}", raw_plate, error.code);
            bad_request_error(PLATE_MISSING)
        })?;

        // La sesión se libera al salir de esta función, por cualquier camino
        let mut session = self.store.open_session().await?;

        let Some(document) = session.find_vehicle_document(&plate).await? else {
            info!("🚫 Placa {} sin vehículo registrado", plate);
            return Ok(AccessOutcome::Denied(DenialReason::VehicleNotRegistered));
        };

        if !session.beneficiary_exists(&document).await? {
            info!("🚫 Placa {}: documento {} no es beneficiario", plate, document);
            return Ok(AccessOutcome::Denied(DenialReason::DocumentNotAuthorized));
        }

        if let Some(record) = session.find_open_record(&plate).await? {
            if !session.close_record(record.id, Utc::now()).await? {
                return Err(AppError::Conflict(format!(
                    "El ingreso de {} ya fue cerrado por otra solicitud",
                    plate
                )));
            }
            info!("🚗⬅️ Salida de {} del puesto {}", plate, record.slot);
            return Ok(AccessOutcome::Exit {
                plate,
                slot: record.slot,
            });
        }

        let entry = NewOccupancy {
            plate: plate.clone(),
            document,
            entered_at: Utc::now(),
            fee: ENTRY_FEE,
        };

        match session.register_entry(entry, self.capacity).await? {
            EntryAllocation::Assigned(slot) => {
                info!("🚗➡️ Ingreso de {} al puesto {}", plate, slot);
                Ok(AccessOutcome::Entry { plate, slot })
            }
            EntryAllocation::Full => {
                warn!("🅿️ Sin puestos para {}", plate);
                Ok(AccessOutcome::Denied(DenialReason::NoSlotsAvailable))
            }
            EntryAllocation::AlreadyInside => Err(AppError::Conflict(format!(
                "El vehículo {} ya tiene un ingreso abierto",
                plate
            ))),
        }
    }

    pub async fn occupancy(&self) -> AppResult<OccupancySnapshot> {
        let mut session = self.store.open_session().await?;
        let occupied_slots = session.occupied_slots().await?;
        debug!("📊 {} de {} puestos ocupados", occupied_slots.len(), self.capacity);

        Ok(OccupancySnapshot {
            total: self.capacity,
            occupied_slots,
        })
    }

    pub async fn health_check(&self) -> AppResult<()> {
        let mut session = self.store.open_session().await?;
        session.ping().await
    }
}
