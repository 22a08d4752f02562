use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::entities::Position;
use crate::error::{invalid_config_error, Error};
use crate::location::DEFAULT_LOCATION_TIMEOUT;
use crate::map::MapConfig;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub data_dir: PathBuf,
    pub location_timeout: Duration,
    /// When set, every location query answers with this position.
    pub fixed_position: Option<Position>,
    pub map: MapConfig,
}

impl Config {
    /// Reads `GEONOTES_*` variables, loading a `.env` file first if present.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Self::from_lookup(|name| env::var(name))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let optional = |name: &str| match lookup(name) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(err) => Err(Error::from(err)),
        };

        let addr = match optional("GEONOTES_ADDR")? {
            Some(value) => value
                .parse()
                .map_err(|_| invalid_config_error("GEONOTES_ADDR"))?,
            None => SocketAddr::from(([127, 0, 0, 1], 3000)),
        };

        let data_dir = optional("GEONOTES_DATA_DIR")?
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));

        let location_timeout = match optional("GEONOTES_LOCATION_TIMEOUT_MS")? {
            Some(value) => value
                .parse()
                .map(Duration::from_millis)
                .map_err(|_| invalid_config_error("GEONOTES_LOCATION_TIMEOUT_MS"))?,
            None => DEFAULT_LOCATION_TIMEOUT,
        };

        let fixed_position = match optional("GEONOTES_FIXED_POSITION")? {
            Some(value) => Some(
                parse_position(&value)
                    .ok_or_else(|| invalid_config_error("GEONOTES_FIXED_POSITION"))?,
            ),
            None => None,
        };

        let mut map = MapConfig::default();
        if let Some(url) = optional("GEONOTES_TILE_URL")? {
            map.tiles.url_template = url;
        }

        Ok(Self {
            addr,
            data_dir,
            location_timeout,
            fixed_position,
            map,
        })
    }
}

fn parse_position(value: &str) -> Option<Position> {
    let (lat, lng) = value.split_once(',')?;
    let latitude: f64 = lat.trim().parse().ok()?;
    let longitude: f64 = lng.trim().parse().ok()?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }

    Some(Position {
        latitude,
        longitude,
    })
}

#[cfg(test)]
fn lookup_from(
    pairs: &'static [(&'static str, &'static str)],
) -> impl Fn(&str) -> Result<String, env::VarError> {
    move |name| {
        pairs
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.to_string())
            .ok_or(env::VarError::NotPresent)
    }
}

#[test]
fn defaults_when_unset() {
    let config = Config::from_lookup(lookup_from(&[])).unwrap();

    assert_eq!(config.addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
    assert_eq!(config.data_dir, PathBuf::from("./data"));
    assert_eq!(config.location_timeout, Duration::from_secs(10));
    assert!(config.fixed_position.is_none());
    assert_eq!(config.map, MapConfig::default());
}

#[test]
fn reads_overrides() {
    let config = Config::from_lookup(lookup_from(&[
        ("GEONOTES_ADDR", "0.0.0.0:8080"),
        ("GEONOTES_DATA_DIR", "/var/lib/geonotes"),
        ("GEONOTES_LOCATION_TIMEOUT_MS", "2500"),
        ("GEONOTES_FIXED_POSITION", "51.5, -0.12"),
        ("GEONOTES_TILE_URL", "https://tiles.example/{z}/{x}/{y}.png"),
    ]))
    .unwrap();

    assert_eq!(config.addr.port(), 8080);
    assert_eq!(config.data_dir, PathBuf::from("/var/lib/geonotes"));
    assert_eq!(config.location_timeout, Duration::from_millis(2500));
    assert_eq!(
        config.fixed_position,
        Some(Position {
            latitude: 51.5,
            longitude: -0.12,
        })
    );
    assert_eq!(
        config.map.tiles.url_template,
        "https://tiles.example/{z}/{x}/{y}.png"
    );
}

#[test]
fn rejects_malformed_values() {
    let err = Config::from_lookup(lookup_from(&[("GEONOTES_FIXED_POSITION", "north")])).unwrap_err();
    assert_eq!(err.code, 101);

    let err = Config::from_lookup(lookup_from(&[("GEONOTES_FIXED_POSITION", "95,0")])).unwrap_err();
    assert_eq!(err.code, 101);

    let err = Config::from_lookup(lookup_from(&[("GEONOTES_ADDR", "localhost")])).unwrap_err();
    assert_eq!(err.code, 101);
}
