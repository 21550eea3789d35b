use std::collections::BTreeMap;
use once_cell::sync::Lazy;
use serde::Serialize;
use crate::models::position::{Distance, Position};

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Warehouse {
    pub position: Position,
    pub stock: u32,
}

pub static WAREHOUSES: Lazy<BTreeMap<&'static str, Warehouse>> = Lazy::new(|| {
    BTreeMap::from([
        ("bangalore", Warehouse { position: Position::new(12.9716, 77.5946), stock: 1200 }),
        ("chennai", Warehouse { position: Position::new(13.0827, 80.2707), stock: 800 }),
        ("hyderabad", Warehouse { position: Position::new(17.3850, 78.4867), stock: 450 }),
    ])
});

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct NearestWarehouse {
    pub key: &'static str,
    pub warehouse: Warehouse,
    pub distance: Distance,
}

pub fn lookup(key: &str) -> Option<Position> {
    WAREHOUSES.get(key).map(|w| w.position)
}

pub fn positions() -> BTreeMap<&'static str, Position> {
    WAREHOUSES.iter().map(|(key, w)| (*key, w.position)).collect()
}

/// Closest warehouse to `from` holding at least `quantity` units. Ties go to
/// the first key in registry order.
pub fn nearest_with_stock(from: &Position, quantity: u32) -> Option<NearestWarehouse> {
    nearest_in(WAREHOUSES.iter().map(|(key, w)| (*key, *w)), from, quantity)
}

fn nearest_in(
    warehouses: impl Iterator<Item = (&'static str, Warehouse)>,
    from: &Position,
    quantity: u32,
) -> Option<NearestWarehouse> {
    warehouses
        .filter(|(_, w)| w.stock >= quantity)
        .map(|(key, warehouse)| NearestWarehouse {
            key,
            warehouse,
            distance: from.distance_to(&warehouse.position),
        })
        .fold(None, |best: Option<NearestWarehouse>, candidate| match best {
            Some(best) if best.distance.km <= candidate.distance.km => Some(best),
            _ => Some(candidate),
        })
}
