use thiserror::Error;

/// Ways a routing request can fail. These never leave the router; the
/// tracker only sees "no route" and falls back to a straight line.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No route found")]
    NoRoute,

    #[error("Malformed coordinate {0:?}")]
    MalformedCoordinate(Vec<f64>),
}

/// Problems with a message received from a client.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Error deserializing command: {0}")]
    Malformed(String),

    #[error("Unknown destination: {0}")]
    UnknownDestination(String),

    #[error("No warehouse holds {0} units")]
    NoWarehouseWithStock(u32),
}
