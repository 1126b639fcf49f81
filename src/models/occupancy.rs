//! Modelo de registro de ocupación
//!
//! Mapea la tabla `registros`: una sesión de parqueo por fila, creada en el
//! ingreso y cerrada una sola vez en la salida.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
    Decode, Encode, FromRow, Postgres, Type,
};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Estado de un registro, guardado como texto `ingreso` / `salida`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OccupancyState {
    /// El vehículo está dentro
    #[serde(rename = "ingreso")]
    Occupying,
    #[serde(rename = "salida")]
    Departed,
}

#[derive(Debug, Error)]
#[error("estado de registro desconocido: '{0}'")]
pub struct UnknownStateError(String);

impl OccupancyState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OccupancyState::Occupying => "ingreso",
            OccupancyState::Departed => "salida",
        }
    }
}

impl fmt::Display for OccupancyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OccupancyState {
    type Err = UnknownStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ingreso" => Ok(OccupancyState::Occupying),
            "salida" => Ok(OccupancyState::Departed),
            other => Err(UnknownStateError(other.to_string())),
        }
    }
}

impl Type<Postgres> for OccupancyState {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for OccupancyState {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as Decode<Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

impl Encode<'_, Postgres> for OccupancyState {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> IsNull {
        <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

/// Registro de ocupación - mapea la tabla registros
#[derive(Debug, Clone, FromRow)]
pub struct OccupancyRecord {
    pub id: i64,
    #[sqlx(rename = "placa")]
    pub plate: String,
    #[sqlx(rename = "documento")]
    pub document: String,
    #[sqlx(rename = "estado")]
    pub state: OccupancyState,
    #[sqlx(rename = "fecha_ingreso")]
    pub entered_at: DateTime<Utc>,
    #[sqlx(rename = "fecha_salida")]
    pub exited_at: Option<DateTime<Utc>>,
    #[sqlx(rename = "puesto")]
    pub slot: i32,
    /// Reservado, siempre cero
    #[sqlx(rename = "valor_parqueo")]
    pub fee: Decimal,
}

impl OccupancyRecord {
    pub fn is_open(&self) -> bool {
        self.state == OccupancyState::Occupying
    }
}

/// Datos de un ingreso nuevo, antes de tener puesto asignado
#[derive(Debug, Clone)]
pub struct NewOccupancy {
    pub plate: String,
    pub document: String,
    pub entered_at: DateTime<Utc>,
    pub fee: Decimal,
}

/// Resultado de intentar asignar un puesto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAllocation {
    Assigned(i32),
    Full,
    /// La placa ya tiene un ingreso abierto (otra solicitud ganó la carrera)
    AlreadyInside,
}
