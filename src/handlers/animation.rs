use std::time::Duration;
use tokio::time::{self, Instant};
use crate::handlers::handler::UpdateSender;
use crate::models::position::{Position, Route};
use crate::models::updates::MapUpdate;
use crate::models::vehicle::VehicleState;

pub const ARRIVED_NOTICE: &str = "Vehicle reached the warehouse!";
pub const FALLBACK_STEPS: u32 = 100;

/// Positions skipped per tick so long routes still finish in about 100 ticks.
pub fn route_step(len: usize) -> usize {
    (len / 100).max(1)
}

/// Walks a route `route_step(len)` points at a time.
pub struct RouteFrames {
    route: Route,
    cursor: usize,
    step: usize,
}

impl RouteFrames {
    pub fn new(route: Route) -> Self {
        let step = route_step(route.len());
        Self { route, cursor: 0, step }
    }
}

impl Iterator for RouteFrames {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let position = *self.route.get(self.cursor)?;
        self.cursor += self.step;
        Some(position)
    }
}

/// Linear interpolation from `start` towards `end`. Yields `steps` points,
/// the first being `start`; the last one stops a step short of `end`.
pub struct StraightFrames {
    start: Position,
    end: Position,
    step: u32,
    steps: u32,
}

impl StraightFrames {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end, step: 0, steps: FALLBACK_STEPS }
    }
}

impl Iterator for StraightFrames {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.step >= self.steps {
            return None;
        }
        let position = self.start.lerp(&self.end, f64::from(self.step) / f64::from(self.steps));
        self.step += 1;
        Some(position)
    }
}

/// Plays `frames` one per `tick`, moving the vehicle and keeping the map on it.
/// The tick after the last frame reports arrival. Returns the number of
/// frames played.
pub async fn play(
    frames: impl Iterator<Item = Position>,
    tick: Duration,
    destination: Position,
    vehicle: &VehicleState,
    sender: &dyn UpdateSender,
) -> usize {
    let mut interval = time::interval_at(Instant::now() + tick, tick);
    let mut played = 0;

    for position in frames {
        interval.tick().await;
        vehicle.move_to(position);
        sender.send_update(MapUpdate::Marker(position));
        sender.send_update(MapUpdate::PanTo(position));
        sender.send_update(MapUpdate::Remaining(position.distance_to(&destination)));
        played += 1;
    }

    interval.tick().await;
    sender.send_update(MapUpdate::Notice(ARRIVED_NOTICE.to_string()));
    played
}
