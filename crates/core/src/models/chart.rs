use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single data point for the frontend's performance chart.
///
/// The core records one after every successful order execution or price
/// refresh; the frontend just renders the series. The history is
/// session-scoped, like the portfolio it samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuePoint {
    /// When the sample was taken
    pub at: DateTime<Utc>,

    /// Total portfolio value at that moment
    pub total_value: f64,
}
