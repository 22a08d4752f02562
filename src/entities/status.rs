use serde::{Deserialize, Serialize};

/// Transient status line. `seq` identifies the message for its timed clear.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub seq: u64,
    pub text: String,
}
