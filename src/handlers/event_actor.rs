use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use crate::handlers::events::Command;
use crate::handlers::handler::{UpdateHandler, UpdateSender, WebSocketUpdateHandler};
use crate::handlers::tracker::Tracker;
use crate::models::error::CommandError;
use crate::models::position::Position;
use crate::models::updates::MapUpdate;
use crate::models::warehouse;

pub struct EventActor {
    inbound: mpsc::Receiver<String>,
    outbound: Arc<dyn UpdateSender>,
    handler: Box<dyn UpdateHandler<String> + Sync + Send>,
    tracker: Tracker,
}

impl EventActor {
    pub fn new(inbound: mpsc::Receiver<String>,
               outbound: Arc<dyn UpdateSender>,
               tracker: Tracker) -> Self {
        Self {
            inbound,
            outbound,
            handler: Box::new(WebSocketUpdateHandler),
            tracker,
        }
    }

    pub async fn run_actor(mut self) {
        self.outbound.send_update(MapUpdate::Marker(self.tracker.vehicle().current()));

        while let Some(message) = self.inbound.recv().await {
            for command in self.handler.inbound_update(message) {
                match command {
                    Command::Animate(destination) => self.head_to(&destination.key, destination.position),
                    Command::AnimateToNearest { quantity } => {
                        let from = self.tracker.vehicle().current();
                        match warehouse::nearest_with_stock(&from, quantity) {
                            Some(nearest) => {
                                info!(quantity, km = nearest.distance.km, "Nearest stocked warehouse is {}", nearest.key);
                                self.head_to(nearest.key, nearest.warehouse.position);
                            }
                            None => {
                                let e = CommandError::NoWarehouseWithStock(quantity);
                                warn!("{}", e);
                                self.outbound.send_update(MapUpdate::Error(e.to_string()));
                            }
                        }
                    }
                    Command::SendUpdate(update) => self.outbound.send_update(update),
                }
            }
        }

        debug!("Inbound channel closed");
        self.tracker.cancel();
    }

    fn head_to(&mut self, key: &str, position: Position) {
        info!(redirected = self.tracker.is_animating(), "Vehicle heading to {}", key);
        self.tracker.animate_vehicle(position);
    }
}
