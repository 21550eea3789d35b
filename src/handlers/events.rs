use crate::models::updates::{Destination, MapUpdate};

#[derive(Debug, PartialEq)]
pub enum Command {
    Animate(Destination),
    AnimateToNearest { quantity: u32 },
    SendUpdate(MapUpdate),
}
