//! Resultado del control de acceso por placa

/// Motivo por el que se niega el paso. No es un error: la llamada termina bien.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    VehicleNotRegistered,
    DocumentNotAuthorized,
    NoSlotsAvailable,
}

impl DenialReason {
    pub fn message(&self) -> &'static str {
        match self {
            DenialReason::VehicleNotRegistered => "Vehículo no registrado",
            DenialReason::DocumentNotAuthorized => "Documento no registrado",
            DenialReason::NoSlotsAvailable => "No hay puestos disponibles",
        }
    }
}

/// Resultado de procesar un evento de placa
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessOutcome {
    Denied(DenialReason),
    Entry { plate: String, slot: i32 },
    Exit { plate: String, slot: i32 },
}

impl AccessOutcome {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, AccessOutcome::Denied(_))
    }

    pub fn slot(&self) -> Option<i32> {
        match self {
            AccessOutcome::Entry { slot, .. } | AccessOutcome::Exit { slot, .. } => Some(*slot),
            AccessOutcome::Denied(_) => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            AccessOutcome::Denied(reason) => reason.message().to_string(),
            AccessOutcome::Entry { plate, .. } => format!("Ingreso registrado para {}", plate),
            AccessOutcome::Exit { plate, .. } => format!("Salida confirmada para {}", plate),
        }
    }
}

/// Foto de la ocupación actual
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancySnapshot {
    pub total: i32,
    pub occupied_slots: Vec<i32>,
}

impl OccupancySnapshot {
    pub fn occupied(&self) -> i32 {
        self.occupied_slots.len() as i32
    }

    pub fn available(&self) -> i32 {
        (self.total - self.occupied()).max(0)
    }
}
