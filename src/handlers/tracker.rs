use std::sync::Arc;
use tracing::{info, instrument};
use crate::config::AnimationTiming;
use crate::handlers::animation::{self, RouteFrames, StraightFrames};
use crate::handlers::handler::UpdateSender;
use crate::handlers::routing::RouteProvider;
use crate::handlers::task::AutoCancelTask;
use crate::models::position::{Bounds, Position, Route};
use crate::models::updates::MapUpdate;
use crate::models::vehicle::VehicleState;

/// Moves one vehicle towards selected destinations.
///
/// Each selection runs as a single task covering the route request and the
/// animation. Selecting again aborts that task first, so only one animation
/// ever drives the marker.
pub struct Tracker {
    router: Arc<dyn RouteProvider>,
    sender: Arc<dyn UpdateSender>,
    vehicle: VehicleState,
    timing: AnimationTiming,
    animation: Option<AutoCancelTask<()>>,
}

impl Tracker {
    pub fn new(
        router: Arc<dyn RouteProvider>,
        sender: Arc<dyn UpdateSender>,
        vehicle: VehicleState,
        timing: AnimationTiming,
    ) -> Self {
        Self { router, sender, vehicle, timing, animation: None }
    }

    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    pub fn is_animating(&self) -> bool {
        self.animation.as_ref().map_or(false, |task| !task.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.animation.take() {
            if !task.is_finished() {
                info!("Cancelling animation in progress");
            }
        }
    }

    pub fn animate_vehicle(&mut self, destination: Position) {
        self.cancel();

        let router = self.router.clone();
        let sender = self.sender.clone();
        let vehicle = self.vehicle.clone();
        let timing = self.timing;

        self.animation = Some(AutoCancelTask(tokio::spawn(async move {
            run_animation(router, sender, vehicle, timing, destination).await;
        })));
    }
}

#[instrument(skip(router, sender, vehicle, timing))]
async fn run_animation(
    router: Arc<dyn RouteProvider>,
    sender: Arc<dyn UpdateSender>,
    vehicle: VehicleState,
    timing: AnimationTiming,
    destination: Position,
) {
    let start = vehicle.current();

    match router.get_route(start, destination).await {
        Some(route) => {
            info!("Animating along route of {} points", route.len());
            draw_route(sender.as_ref(), &route);
            animation::play(RouteFrames::new(route), timing.route_tick, destination, &vehicle, sender.as_ref()).await;
        }
        None => {
            info!("Using straight path as fallback");
            animation::play(StraightFrames::new(start, destination), timing.fallback_tick, destination, &vehicle, sender.as_ref()).await;
        }
    };
}

fn draw_route(sender: &dyn UpdateSender, route: &Route) {
    sender.send_update(MapUpdate::ClearRoute);
    sender.send_update(MapUpdate::DrawRoute(route.clone()));
    if let Some(bounds) = Bounds::of(route) {
        sender.send_update(MapUpdate::FitBounds(bounds));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;
    use async_trait::async_trait;
    use tokio::sync::mpsc;
    use crate::handlers::animation::ARRIVED_NOTICE;
    use super::*;

    const HOME: Position = Position::new(12.9716, 77.5946);
    const CHENNAI: Position = Position::new(13.0827, 80.2707);

    struct FixedRouter {
        route: Option<Route>,
        calls: Mutex<Vec<(Position, Position)>>,
    }

    impl FixedRouter {
        fn new(route: Option<Route>) -> Arc<Self> {
            Arc::new(Self { route, calls: Mutex::new(vec![]) })
        }
    }

    #[async_trait]
    impl RouteProvider for FixedRouter {
        async fn get_route(&self, start: Position, end: Position) -> Option<Route> {
            self.calls.lock().unwrap().push((start, end));
            self.route.clone()
        }
    }

    fn tracker(router: Arc<FixedRouter>) -> (Tracker, mpsc::UnboundedReceiver<MapUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let tracker = Tracker::new(router, Arc::new(tx), VehicleState::new(HOME), AnimationTiming::default());
        (tracker, rx)
    }

    async fn collect_until_notice(rx: &mut mpsc::UnboundedReceiver<MapUpdate>) -> Vec<MapUpdate> {
        let mut updates = vec![];
        while let Some(update) = rx.recv().await {
            let done = matches!(update, MapUpdate::Notice(_));
            updates.push(update);
            if done {
                break;
            }
        }
        updates
    }

    fn markers(updates: &[MapUpdate]) -> Vec<Position> {
        updates.iter()
            .filter_map(|u| match u {
                MapUpdate::Marker(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn follows_route() {
        let mut route: Route = (0..10).map(|i| HOME.lerp(&CHENNAI, f64::from(i) / 10.0)).collect();
        route.push(CHENNAI);
        let router = FixedRouter::new(Some(route.clone()));
        let (mut tracker, mut rx) = tracker(router.clone());

        tracker.animate_vehicle(CHENNAI);
        let updates = collect_until_notice(&mut rx).await;

        assert_eq!(router.calls.lock().unwrap().as_slice(), &[(HOME, CHENNAI)]);
        assert_eq!(updates[0], MapUpdate::ClearRoute);
        assert_eq!(updates[1], MapUpdate::DrawRoute(route.clone()));
        assert_eq!(updates[2], MapUpdate::FitBounds(Bounds { south_west: HOME, north_east: CHENNAI }));
        assert_eq!(markers(&updates), route);
        assert_eq!(updates.last(), Some(&MapUpdate::Notice(ARRIVED_NOTICE.to_string())));
        assert_eq!(tracker.vehicle().current(), CHENNAI);
    }

    #[tokio::test(start_paused = true)]
    async fn falls_back_to_straight_line() {
        let (mut tracker, mut rx) = tracker(FixedRouter::new(None));

        tracker.animate_vehicle(CHENNAI);
        let updates = collect_until_notice(&mut rx).await;

        assert!(!updates.iter().any(|u| matches!(u, MapUpdate::DrawRoute(_))));
        let markers = markers(&updates);
        assert_eq!(markers.len(), 100);
        assert_eq!(markers[0], HOME);
        assert_eq!(markers[99], HOME.lerp(&CHENNAI, 0.99));
        assert_eq!(tracker.vehicle().current(), HOME.lerp(&CHENNAI, 0.99));
    }

    #[tokio::test(start_paused = true)]
    async fn new_selection_cancels_previous() {
        let (mut tracker, mut rx) = tracker(FixedRouter::new(None));

        tracker.animate_vehicle(CHENNAI);
        // let ten fallback ticks run
        tokio::time::sleep(Duration::from_millis(1050)).await;
        let halfway = tracker.vehicle().current();
        assert_ne!(halfway, HOME);

        let hyderabad = Position::new(17.3850, 78.4867);
        tracker.animate_vehicle(hyderabad);

        let updates = collect_until_notice(&mut rx).await;
        let notices = updates.iter().filter(|u| matches!(u, MapUpdate::Notice(_))).count();
        assert_eq!(notices, 1);

        // second run starts where the first one was interrupted
        let markers = markers(&updates);
        assert_eq!(markers.len(), 10 + 100);
        assert_eq!(markers[10], halfway);
        assert_eq!(tracker.vehicle().current(), halfway.lerp(&hyderabad, 0.99));

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_animation() {
        let (mut tracker, mut rx) = tracker(FixedRouter::new(None));

        tracker.animate_vehicle(CHENNAI);
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(tracker.is_animating());
        tracker.cancel();
        assert!(!tracker.is_animating());

        tokio::time::sleep(Duration::from_secs(20)).await;
        let mut count = 0;
        while let Ok(update) = rx.try_recv() {
            assert!(!matches!(update, MapUpdate::Notice(_)));
            count += 1;
        }
        assert_eq!(count, 2 * 3);
    }
}
