use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use super::{LocationError, LocationProvider};
use crate::entities::Position;

/// Always answers with the same position.
#[derive(Clone, Copy, Debug)]
pub struct FixedLocation {
    position: Position,
}

impl FixedLocation {
    pub fn new(position: Position) -> Self {
        Self { position }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Position, LocationError> {
        Ok(self.position)
    }
}

/// A platform without geolocation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationProvider for NoLocation {
    async fn current_position(&self) -> Result<Position, LocationError> {
        Err(LocationError::Unavailable)
    }
}

type Report = Option<Result<Position, String>>;

/// Answers with the next fix pushed through its [`PositionReporter`].
/// Each report is consumed by the query that receives it, so a later query
/// waits for a fresh one.
#[derive(Debug)]
pub struct ReportedLocation {
    sender: Arc<watch::Sender<Report>>,
}

/// Write half of [`ReportedLocation`], held by whatever talks to the device.
#[derive(Clone, Debug)]
pub struct PositionReporter {
    sender: Arc<watch::Sender<Report>>,
}

impl ReportedLocation {
    pub fn new() -> (Self, PositionReporter) {
        let (sender, _) = watch::channel(None);
        let sender = Arc::new(sender);

        (
            Self {
                sender: sender.clone(),
            },
            PositionReporter { sender },
        )
    }

    fn take(&self) -> Report {
        let mut taken = None;
        self.sender.send_if_modified(|slot| {
            taken = slot.take();
            false
        });
        taken
    }
}

impl PositionReporter {
    pub fn report(&self, position: Position) {
        self.sender.send_replace(Some(Ok(position)));
    }

    pub fn report_denied(&self, reason: String) {
        self.sender.send_replace(Some(Err(reason)));
    }
}

#[async_trait]
impl LocationProvider for ReportedLocation {
    async fn current_position(&self) -> Result<Position, LocationError> {
        // subscribe before the first take so a report landing in between wakes us
        let mut receiver = self.sender.subscribe();

        loop {
            if let Some(report) = self.take() {
                return report.map_err(LocationError::Denied);
            }

            if receiver.changed().await.is_err() {
                return Err(LocationError::Unavailable);
            }
        }
    }
}

#[test]
fn reported_location_waits_for_first_report() {
    use std::time::Duration;
    use tokio_test::block_on;

    let (provider, reporter) = ReportedLocation::new();
    let position = Position {
        latitude: 1.0,
        longitude: 2.0,
    };

    let result = block_on(async {
        let query = provider.current_position();
        let report = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            reporter.report(position);
        };
        let (result, ()) = tokio::join!(query, report);
        result
    });

    assert_eq!(result, Ok(position));
}

#[test]
fn reported_denial_is_surfaced() {
    use tokio_test::block_on;

    let (provider, reporter) = ReportedLocation::new();
    reporter.report_denied("User denied Geolocation".into());

    let result = block_on(provider.current_position());
    assert_eq!(
        result,
        Err(LocationError::Denied("User denied Geolocation".into()))
    );

    reporter.report(Position {
        latitude: 3.0,
        longitude: 4.0,
    });
    assert!(block_on(provider.current_position()).is_ok());
}

#[test]
fn reported_fix_is_not_reused() {
    use super::locate;
    use std::time::Duration;
    use tokio_test::block_on;

    let (provider, reporter) = ReportedLocation::new();
    let position = Position {
        latitude: 5.0,
        longitude: 6.0,
    };
    reporter.report(position);

    block_on(async {
        let timeout = Duration::from_millis(20);
        assert_eq!(locate(&provider, timeout).await, Ok(position));
        assert_eq!(
            locate(&provider, timeout).await,
            Err(LocationError::Timeout)
        );

        reporter.report(position);
        assert_eq!(locate(&provider, timeout).await, Ok(position));
    });
}
