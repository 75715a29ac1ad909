use serde::Serialize;

use super::quote::QuoteSample;

/// Day-over-day percentage change per rate
///
/// A field is `None` (serialized as `null`) when the previous value is zero
/// or the result would not be a finite number.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Variations {
    pub oficial: Option<f64>,
    pub solidario: Option<f64>,
    pub blue: Option<f64>,
    pub mep: Option<f64>,
    pub ccl: Option<f64>,
    pub dai: Option<f64>,
}

impl Variations {
    pub fn between(previous: &QuoteSample, current: &QuoteSample) -> Self {
        Self {
            oficial: percent_change(previous.oficial, current.oficial),
            solidario: percent_change(previous.solidario, current.solidario),
            blue: percent_change(previous.blue, current.blue),
            mep: percent_change(previous.mep, current.mep),
            ccl: percent_change(previous.ccl, current.ccl),
            dai: percent_change(previous.dai, current.dai),
        }
    }
}

/// `round(((current - previous) / previous) * 100, 2)`
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }

    let change = ((current - previous) / previous) * 100.0;
    if !change.is_finite() {
        return None;
    }

    Some((change * 100.0).round() / 100.0)
}

/// Response body of the day summary endpoint
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DaySummary {
    #[serde(flatten)]
    pub quote: QuoteSample,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variations: Option<Variations>,
}
