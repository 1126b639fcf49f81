use serde::{Deserialize, Serialize};

use crate::models::{AccessOutcome, OccupancySnapshot};

// Request de validación de placa
#[derive(Debug, Default, Deserialize)]
pub struct PlateRequest {
    #[serde(default)]
    pub placa: Option<String>,
}

// Response de validación de placa
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlateValidationResponse {
    pub mensaje: String,
    pub permitido: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salida: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub puesto: Option<i32>,
}

impl From<AccessOutcome> for PlateValidationResponse {
    fn from(outcome: AccessOutcome) -> Self {
        let salida = match &outcome {
            AccessOutcome::Entry { .. } => Some(false),
            AccessOutcome::Exit { .. } => Some(true),
            AccessOutcome::Denied(_) => None,
        };

        Self {
            mensaje: outcome.message(),
            permitido: outcome.is_allowed(),
            salida,
            puesto: outcome.slot(),
        }
    }
}

// Response de ocupación actual
#[derive(Debug, Clone, Serialize)]
pub struct OccupancyResponse {
    pub total: i32,
    pub ocupados: i32,
    pub disponibles: i32,
    pub puestos_ocupados: Vec<i32>,
}

impl From<OccupancySnapshot> for OccupancyResponse {
    fn from(snapshot: OccupancySnapshot) -> Self {
        Self {
            total: snapshot.total,
            ocupados: snapshot.occupied(),
            disponibles: snapshot.available(),
            puestos_ocupados: snapshot.occupied_slots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DenialReason;
    use serde_json::json;

    #[test]
    fn test_denied_response_omits_exit_and_slot() {
        let response = PlateValidationResponse::from(AccessOutcome::Denied(DenialReason::VehicleNotRegistered));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "mensaje": "Vehículo no registrado", "permitido": false })
        );
    }

    #[test]
    fn test_entry_response_shape() {
        let response = PlateValidationResponse::from(AccessOutcome::Entry {
            plate: "XYZ001".to_string(),
            slot: 1,
        });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "mensaje": "Ingreso registrado para XYZ001",
                "permitido": true,
                "salida": false,
                "puesto": 1
            })
        );
    }

    #[test]
    fn test_exit_response_shape() {
        let response = PlateValidationResponse::from(AccessOutcome::Exit {
            plate: "XYZ001".to_string(),
            slot: 4,
        });
        assert_eq!(response.mensaje, "Salida confirmada para XYZ001");
        assert_eq!(response.salida, Some(true));
        assert_eq!(response.puesto, Some(4));
    }

    #[test]
    fn test_missing_placa_deserializes_as_none() {
        let request: PlateRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.placa.is_none());
        let request: PlateRequest = serde_json::from_value(json!({ "placa": null })).unwrap();
        assert!(request.placa.is_none());
    }

    #[test]
    fn test_occupancy_response_counts() {
        let response = OccupancyResponse::from(OccupancySnapshot {
            total: 20,
            occupied_slots: vec![1, 2, 5],
        });
        assert_eq!(response.ocupados, 3);
        assert_eq!(response.disponibles, 17);
    }
}
