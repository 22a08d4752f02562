mod providers;

pub use providers::{FixedLocation, NoLocation, PositionReporter, ReportedLocation};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::entities::Position;

pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocationError {
    /// The platform has no geolocation capability.
    Unavailable,
    /// The platform rejected the query; carries its reason.
    Denied(String),
    Timeout,
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "Geolocation not available in this environment"),
            Self::Denied(reason) => write!(f, "{}", reason),
            Self::Timeout => write!(f, "Timeout expired"),
        }
    }
}

impl std::error::Error for LocationError {}

#[async_trait]
pub trait LocationProvider {
    async fn current_position(&self) -> Result<Position, LocationError>;
}

pub type DynLocation = Arc<dyn LocationProvider + Send + Sync>;

/// Single-shot position query bounded by `timeout`.
#[tracing::instrument(skip(provider))]
pub async fn locate(
    provider: &(dyn LocationProvider + Send + Sync),
    timeout: Duration,
) -> Result<Position, LocationError> {
    let result = match tokio::time::timeout(timeout, provider.current_position()).await {
        Ok(result) => result,
        Err(_) => Err(LocationError::Timeout),
    };

    if let Err(err) = &result {
        tracing::warn!("location query failed: {}", err);
    }

    result
}

#[test]
fn locate_returns_fixed_position() {
    use tokio_test::block_on;

    let position = Position {
        latitude: 10.0,
        longitude: 20.0,
    };
    let provider = FixedLocation::new(position);

    let result = block_on(locate(&provider, Duration::from_millis(50)));
    assert_eq!(result, Ok(position));
}

#[test]
fn locate_reports_unavailable() {
    use tokio_test::block_on;

    let result = block_on(locate(&NoLocation, Duration::from_millis(50)));
    assert_eq!(result, Err(LocationError::Unavailable));
}

#[test]
fn locate_times_out_without_a_fix() {
    use tokio_test::block_on;

    let (provider, _reporter) = ReportedLocation::new();

    let result = block_on(locate(&provider, Duration::from_millis(20)));
    assert_eq!(result, Err(LocationError::Timeout));
}

#[test]
fn denied_reason_is_the_status_text() {
    let err = LocationError::Denied("User denied Geolocation".into());
    assert_eq!(err.to_string(), "User denied Geolocation");
}
