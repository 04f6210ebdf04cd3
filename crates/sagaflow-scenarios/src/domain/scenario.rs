//! Scenario keys and their step sequences.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sagaflow_core::error::FlowError;
use serde::{Deserialize, Serialize};

use super::catalog;
use super::step::{Condition, Step};

/// One of the three fixed choreography variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScenarioKey {
    /// Order completes.
    #[default]
    Success,
    /// Payment is rejected and the order is cancelled.
    PaymentFailure,
    /// Shipping fails after payment; the saga compensates.
    ShipmentFailure,
}

impl ScenarioKey {
    /// Every scenario, in menu order.
    pub const ALL: [Self; 3] = [Self::Success, Self::PaymentFailure, Self::ShipmentFailure];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::PaymentFailure => "paymentFailure",
            Self::ShipmentFailure => "shipmentFailure",
        }
    }

    /// Menu title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Success => "Success Flow",
            Self::PaymentFailure => "Payment Failure",
            Self::ShipmentFailure => "Shipment Failure",
        }
    }

    /// The ordered steps of this scenario.
    #[must_use]
    pub const fn steps(self) -> &'static [Step] {
        match self {
            Self::Success => &catalog::SUCCESS,
            Self::PaymentFailure => &catalog::PAYMENT_FAILURE,
            Self::ShipmentFailure => &catalog::SHIPMENT_FAILURE,
        }
    }

    /// Sum of every step's delay.
    #[must_use]
    pub fn total_duration(self) -> Duration {
        self.steps().iter().map(Step::delay).sum()
    }

    /// Condition of the final step.
    #[must_use]
    pub fn outcome(self) -> Condition {
        self.steps()
            .last()
            .map_or(Condition::Normal, Step::effective_condition)
    }
}

impl fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKey {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| FlowError::InvalidScenario(s.to_owned()))
    }
}
