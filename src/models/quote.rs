use serde::{Deserialize, Serialize};

/// One observation of the six tracked exchange rates
///
/// `time` is in Unix epoch seconds. Rates are ARS per USD (or per DAI).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, sqlx::FromRow)]
pub struct QuoteSample {
    pub oficial: f64,
    pub solidario: f64,
    pub blue: f64,
    pub mep: f64,
    pub ccl: f64,
    pub dai: f64,
    pub time: i64,
}

/// Mean of every sample in a window; `time` is the latest sample time in it
pub type QuoteAggregate = QuoteSample;

/// Raw row returned by the averaging queries
///
/// `AVG` over an empty window yields a row of NULLs, so every column is
/// optional here and `oficial` acts as the "window has data" sentinel.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct RateRow {
    pub time: Option<i64>,
    pub oficial: Option<f64>,
    pub solidario: Option<f64>,
    pub blue: Option<f64>,
    pub mep: Option<f64>,
    pub ccl: Option<f64>,
    pub dai: Option<f64>,
}

impl RateRow {
    pub fn is_populated(&self) -> bool {
        self.oficial.is_some()
    }

    pub fn into_sample(self) -> Option<QuoteSample> {
        match self {
            RateRow {
                time: Some(time),
                oficial: Some(oficial),
                solidario: Some(solidario),
                blue: Some(blue),
                mep: Some(mep),
                ccl: Some(ccl),
                dai: Some(dai),
            } => Some(QuoteSample {
                oficial,
                solidario,
                blue,
                mep,
                ccl,
                dai,
                time,
            }),
            _ => None,
        }
    }
}
