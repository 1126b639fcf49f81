//! Asignación de puestos
//!
//! Se asigna el puesto libre más bajo en `[1, capacidad]`. Con ocupación
//! contigua desde el puesto 1 coincide con `ocupados + 1`, pero sigue siendo
//! correcto cuando los vehículos salen en desorden.

use std::collections::BTreeSet;

/// Puesto libre más bajo, o `None` si el parqueadero está lleno
pub fn lowest_free_slot(occupied: &[i32], capacity: i32) -> Option<i32> {
    if occupied.len() as i64 >= capacity as i64 {
        return None;
    }

    let taken: BTreeSet<i32> = occupied.iter().copied().collect();
    (1..=capacity).find(|slot| !taken.contains(slot))
}
