use std::sync::Arc;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error};
use crate::config::AnimationTiming;
use crate::handlers::event_actor::EventActor;
use crate::handlers::routing::RouteProvider;
use crate::handlers::task::AutoCancelTask;
use crate::handlers::tracker::Tracker;
use crate::models::updates::MapUpdate;
use crate::models::vehicle::VehicleState;

/// Server side of one tracking session. Dropping it stops the session's
/// actor and any animation it started.
pub struct TrackingSessionHandler {
    serial: u64,
    vehicle: VehicleState,
    _handle: AutoCancelTask<()>,
}

impl TrackingSessionHandler {
    /// Starts the session actor and returns the handler together with the
    /// channel ends a client connection attaches to.
    pub fn new(serial: u64,
               router: Arc<dyn RouteProvider>,
               vehicle: VehicleState,
               timing: AnimationTiming) -> (Self, mpsc::Sender<String>, mpsc::UnboundedReceiver<MapUpdate>) {
        let (inbound, inbound_recv) = mpsc::channel(8);
        let (outbound_send, outbound) = mpsc::unbounded_channel();
        let outbound_send = Arc::new(outbound_send);

        let tracker = Tracker::new(router, outbound_send.clone(), vehicle.clone(), timing);
        let operator = EventActor::new(inbound_recv, outbound_send, tracker);

        let handler = Self {
            serial,
            vehicle,
            _handle: AutoCancelTask(tokio::spawn(operator.run_actor())),
        };
        (handler, inbound, outbound)
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }
}

pub struct WebsocketActor {
    recv_task: AutoCancelTask<()>,
    send_task: AutoCancelTask<()>,
}

impl WebsocketActor {
    pub fn new(socket: WebSocket,
               inbound: mpsc::Sender<String>,
               mut outbound: mpsc::UnboundedReceiver<MapUpdate>) -> Self {
        let (mut ws_sender, mut ws_receiver) = socket.split();

        let inbound_task = tokio::spawn(async move {
            while let Some(Ok(msg)) = ws_receiver.next().await {
                debug!("Received message from client: {:?}", msg);
                match msg {
                    Message::Text(text) => {
                        if inbound.send(text).await.is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        });

        let outbound_task = tokio::spawn(async move {
            while let Some(update) = outbound.recv().await {
                let text = match serde_json::to_string(&update) {
                    Ok(text) => text,
                    Err(e) => {
                        error!("Error serializing update {:?}: {}", update, e);
                        continue;
                    }
                };
                if ws_sender.send(Message::Text(text)).await.is_err() {
                    return;
                }
            }
            ws_sender.send(Message::Close(None)).await.ok();
        });

        Self {
            recv_task: AutoCancelTask(inbound_task),
            send_task: AutoCancelTask(outbound_task),
        }
    }

    /// Runs until either direction of the connection finishes.
    pub async fn run_actor(mut self) {
        tokio::select! {
            _ = &mut self.recv_task.0 => (),
            _ = &mut self.send_task.0 => ()
        }
    }
}
