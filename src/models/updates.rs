use serde::{Deserialize, Serialize};
use crate::models::error::CommandError;
use crate::models::position::{Bounds, Distance, Position, Route};
use crate::models::warehouse;

// Inbound

#[derive(Deserialize, Debug, PartialEq)]
pub enum InboundCommand {
    SelectDestination(String),
    NearestWarehouse { quantity: u32 },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InboundFrame {
    Key(String),
    Command(InboundCommand),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub key: String,
    pub position: Position,
}

impl Destination {
    pub fn resolve(key: String) -> Result<Destination, CommandError> {
        match warehouse::lookup(&key) {
            Some(position) => Ok(Destination { key, position }),
            None => Err(CommandError::UnknownDestination(key)),
        }
    }
}

/// What a client asked the vehicle to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Warehouse(Destination),
    /// Closest warehouse to the vehicle that can supply `quantity` units.
    NearestWithStock(u32),
}

impl Selection {
    /// Parses a destination picker frame: `"chennai"`,
    /// `{"SelectDestination":"chennai"}` or `{"NearestWarehouse":{"quantity":5}}`.
    /// Warehouse keys are resolved against the registry.
    pub fn parse(message: &str) -> Result<Selection, CommandError> {
        let key = match serde_json::from_str::<InboundFrame>(message) {
            Ok(InboundFrame::Key(key)) => key,
            Ok(InboundFrame::Command(InboundCommand::SelectDestination(key))) => key,
            Ok(InboundFrame::Command(InboundCommand::NearestWarehouse { quantity })) => {
                return Ok(Selection::NearestWithStock(quantity));
            }
            Err(e) => return Err(CommandError::Malformed(e.to_string())),
        };

        Destination::resolve(key).map(Selection::Warehouse)
    }
}

// Outbound

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum MapUpdate {
    Marker(Position),
    PanTo(Position),
    DrawRoute(Route),
    ClearRoute,
    FitBounds(Bounds),
    Remaining(Distance),
    Notice(String),
    Error(String),
}
