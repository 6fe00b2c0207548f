//! Badge rendering metrics.

use crate::countdown::Direction;
use lazy_static::lazy_static;
use prometheus_client::encoding::{EncodeLabelSet, EncodeLabelValue, LabelValueEncoder};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;
use std::fmt::{Error, Write};

lazy_static! {
    static ref TRACK_RENDERS: Family<RenderLabels, Counter> = Family::default();
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct RenderLabels {
    outcome: RenderOutcome,
}

/// How a badge request was answered.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum RenderOutcome {
    /// A countdown toward a future date.
    Toward,
    /// The target date itself.
    At,
    /// A count-up since a past date.
    Since,
    /// The URL could not be parsed; the error badge was served.
    Invalid,
}

impl From<Direction> for RenderOutcome {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Toward => Self::Toward,
            Direction::At => Self::At,
            Direction::Since => Self::Since,
        }
    }
}

impl EncodeLabelValue for RenderOutcome {
    fn encode(&self, encoder: &mut LabelValueEncoder) -> Result<(), Error> {
        let label = match self {
            RenderOutcome::Toward => "toward",
            RenderOutcome::At => "at",
            RenderOutcome::Since => "since",
            RenderOutcome::Invalid => "invalid",
        };
        encoder.write_str(label)
    }
}

/// Register the `badge_renders` metric family with the registry.
pub fn register_badge_renders(registry: &mut Registry) {
    registry.register(
        "badge_renders",
        "Number of badges rendered, by outcome",
        TRACK_RENDERS.clone(),
    );
}

/// Badge render metrics. Can be cheaply cloned.
#[derive(Default)]
pub struct RenderMetrics;

impl RenderMetrics {
    /// Tracks one rendered badge.
    pub fn track<O: Into<RenderOutcome>>(outcome: O) {
        TRACK_RENDERS
            .get_or_create(&RenderLabels {
                outcome: outcome.into(),
            })
            .inc();
    }
}
