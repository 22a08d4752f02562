use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::entities::Position;
use crate::error::{invalid_input_error, Error};
use crate::location::PositionReporter;

/// Either a fix or the platform's refusal.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportParams {
    Fix(Position),
    Denied { denied: String },
}

pub async fn report(
    Extension(reporter): Extension<Option<PositionReporter>>,
    Json(params): Json<ReportParams>,
) -> Result<StatusCode, Error> {
    // a fixed position was configured, nothing listens for reports
    let reporter = reporter.ok_or_else(invalid_input_error)?;

    match params {
        ReportParams::Fix(position) => {
            if !position.latitude.is_finite() || !position.longitude.is_finite() {
                return Err(invalid_input_error());
            }
            reporter.report(position);
        }
        ReportParams::Denied { denied } => reporter.report_denied(denied),
    }

    Ok(StatusCode::NO_CONTENT)
}
