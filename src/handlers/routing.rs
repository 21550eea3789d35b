use std::time::Duration;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};
use crate::models::error::RouteError;
use crate::models::position::{Position, Route};

#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Driving route from `start` to `end`, `None` when no route could be obtained.
    async fn get_route(&self, start: Position, end: Position) -> Option<Route>;
}

/// Client for an OSRM compatible routing service.
pub struct OsrmRouter {
    client: reqwest::Client,
    base_url: String,
}

impl OsrmRouter {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RouteError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn route_url(&self, start: &Position, end: &Position) -> String {
        // OSRM wants lng,lat pairs
        format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url, start.lon, start.lat, end.lon, end.lat
        )
    }

    async fn fetch_route(&self, start: &Position, end: &Position) -> Result<Route, RouteError> {
        let url = self.route_url(start, end);
        debug!("Requesting route {}", url);

        let body = self.client.get(url)
            .send().await?
            .error_for_status()?
            .bytes().await?;

        parse_route(&body)
    }
}

#[async_trait]
impl RouteProvider for OsrmRouter {
    async fn get_route(&self, start: Position, end: Position) -> Option<Route> {
        match self.fetch_route(&start, &end).await {
            Ok(route) => Some(route),
            Err(e) => {
                error!("Error fetching route: {}", e);
                None
            }
        }
    }
}

#[derive(Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    coordinates: Vec<Vec<f64>>,
}

/// Extracts the first route of a GeoJSON route response as lat/lon positions.
pub fn parse_route(body: &[u8]) -> Result<Route, RouteError> {
    let response: OsrmResponse = serde_json::from_slice(body)?;
    let first = response.routes.into_iter().next().ok_or(RouteError::NoRoute)?;

    let route = first.geometry.coordinates.into_iter()
        .map(|pair| {
            if pair.len() < 2 {
                return Err(RouteError::MalformedCoordinate(pair));
            }
            Ok(Position::new(pair[1], pair[0]))
        })
        .collect::<Result<Route, RouteError>>()?;

    if route.is_empty() {
        return Err(RouteError::NoRoute);
    }
    Ok(route)
}
