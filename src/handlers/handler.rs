use tokio::sync::mpsc;
use tracing::warn;
use crate::handlers::events::Command;
use crate::models::updates::{MapUpdate, Selection};

/// Where map updates for one session go. Sending never blocks the animation.
pub trait UpdateSender: Send + Sync + 'static {
    fn send_update(&self, update: MapUpdate);
}

impl UpdateSender for mpsc::UnboundedSender<MapUpdate> {
    fn send_update(&self, update: MapUpdate) {
        // receiver gone means the session is closing
        self.send(update).ok();
    }
}

pub trait UpdateHandler<M> {
    fn inbound_update(&mut self, message: M) -> Vec<Command>;
}

pub struct WebSocketUpdateHandler;

impl UpdateHandler<String> for WebSocketUpdateHandler {
    fn inbound_update(&mut self, message: String) -> Vec<Command> {
        match Selection::parse(&message) {
            Ok(Selection::Warehouse(destination)) => vec![Command::Animate(destination)],
            Ok(Selection::NearestWithStock(quantity)) => vec![Command::AnimateToNearest { quantity }],
            Err(e) => {
                warn!("Rejected message {:?}: {}", message, e);
                vec![Command::SendUpdate(MapUpdate::Error(e.to_string()))]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::models::position::Position;
    use crate::models::updates::Destination;
    use super::*;

    #[test]
    fn selection_becomes_animate() {
        let commands = WebSocketUpdateHandler.inbound_update("\"hyderabad\"".to_string());
        assert_eq!(commands, vec![Command::Animate(Destination {
            key: "hyderabad".to_string(),
            position: Position::new(17.3850, 78.4867),
        })]);
    }

    #[test]
    fn nearest_request_becomes_animate_to_nearest() {
        let commands = WebSocketUpdateHandler.inbound_update(r#"{"NearestWarehouse":{"quantity":3}}"#.to_string());
        assert_eq!(commands, vec![Command::AnimateToNearest { quantity: 3 }]);
    }

    #[test]
    fn unknown_key_becomes_error() {
        let commands = WebSocketUpdateHandler.inbound_update("\"nowhere\"".to_string());
        assert_eq!(commands, vec![Command::SendUpdate(MapUpdate::Error(
            "Unknown destination: nowhere".to_string()
        ))]);
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        tx.send_update(MapUpdate::ClearRoute);
    }
}
