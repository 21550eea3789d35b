use std::env;
use std::str::FromStr;
use std::time::Duration;
use once_cell::sync::Lazy;
use crate::models::position::Position;

pub static CONFIG: Lazy<Config> = Lazy::new(Config::init);

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub osrm_url: String,
    pub route_timeout: Duration,
    pub timing: AnimationTiming,
    pub start: Position,
    pub static_dir: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTiming {
    pub route_tick: Duration,
    pub fallback_tick: Duration,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            route_tick: Duration::from_millis(50),
            fallback_tick: Duration::from_millis(100),
        }
    }
}

impl Config {
    pub fn init() -> Config {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Config {
        Config {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(var("PORT"), 3000),
            osrm_url: var("OSRM_URL")
                .unwrap_or_else(|| "https://router.project-osrm.org".to_string())
                .trim_end_matches('/')
                .to_string(),
            route_timeout: Duration::from_secs(parse_or(var("ROUTE_TIMEOUT_SECS"), 10)),
            timing: AnimationTiming {
                route_tick: Duration::from_millis(parse_or(var("ROUTE_TICK_MS"), 50)),
                fallback_tick: Duration::from_millis(parse_or(var("FALLBACK_TICK_MS"), 100)),
            },
            start: Position::new(
                parse_or(var("START_LAT"), 12.9716),
                parse_or(var("START_LON"), 77.5946),
            ),
            static_dir: var("STATIC_DIR").unwrap_or_else(|| "static".to_string()),
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|s| s.parse::<T>().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::from_lookup(|_| None);

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.osrm_url, "https://router.project-osrm.org");
        assert_eq!(config.route_timeout, Duration::from_secs(10));
        assert_eq!(config.timing, AnimationTiming::default());
        assert_eq!(config.start, Position::new(12.9716, 77.5946));
    }

    #[test]
    fn overrides_and_bad_values() {
        let vars = HashMap::from([
            ("PORT", "8080"),
            ("OSRM_URL", "http://localhost:5000/"),
            ("ROUTE_TICK_MS", "not-a-number"),
            ("FALLBACK_TICK_MS", "20"),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.port, 8080);
        assert_eq!(config.osrm_url, "http://localhost:5000");
        assert_eq!(config.timing.route_tick, Duration::from_millis(50));
        assert_eq!(config.timing.fallback_tick, Duration::from_millis(20));
    }
}
