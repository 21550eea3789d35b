pub mod error;
pub mod position;
pub mod updates;
pub mod vehicle;
pub mod warehouse;
