pub mod animation;
pub mod event_actor;
pub mod events;
pub mod handler;
pub mod routing;
pub mod task;
pub mod tracker;
pub mod websocket_actor;
