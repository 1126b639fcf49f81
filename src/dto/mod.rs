//! DTOs de la API HTTP

pub mod parking_dto;

pub use parking_dto::*;
