use std::sync::Arc;
use tokio::sync::watch;
use crate::models::position::Position;

/// Current marker position of one session's vehicle. Clones share the same state.
#[derive(Clone)]
pub struct VehicleState {
    position: Arc<watch::Sender<Position>>,
}

impl VehicleState {
    pub fn new(start: Position) -> Self {
        let (position, _) = watch::channel(start);
        Self { position: Arc::new(position) }
    }

    pub fn current(&self) -> Position {
        *self.position.borrow()
    }

    pub fn move_to(&self, position: Position) {
        self.position.send_replace(position);
    }
}
