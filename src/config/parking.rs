//! Constantes del parqueadero. Se fijan al compilar, no por entorno.

use rust_decimal::Decimal;

/// Total de puestos disponibles
pub const NUM_SLOTS: i32 = 20;

/// Tarifa por ingreso. Reservada: no hay cálculo de cobro.
pub const ENTRY_FEE: Decimal = Decimal::ZERO;
