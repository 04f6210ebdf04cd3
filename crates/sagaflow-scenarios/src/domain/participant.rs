//! Participants drawn as columns in the choreography.

use std::fmt;
use std::str::FromStr;

use sagaflow_core::error::FlowError;
use serde::{Deserialize, Serialize};

/// A named logical component of the order system. Carries no behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Participant {
    /// The caller placing the order.
    Client,
    /// Accepts order commands.
    OrderService,
    /// Event-sourced order state.
    OrderAggregate,
    /// The saga orchestrator.
    Saga,
    /// Accepts payment commands.
    PaymentService,
    /// Answers user payment-detail queries.
    UserService,
    /// Event-sourced payment state.
    PaymentAggregate,
    /// Accepts shipment commands.
    ShipmentService,
    /// Event-sourced shipment state.
    ShipmentAggregate,
}

impl Participant {
    /// Every participant, in lane order.
    pub const ALL: [Self; 9] = [
        Self::Client,
        Self::OrderService,
        Self::OrderAggregate,
        Self::Saga,
        Self::PaymentService,
        Self::UserService,
        Self::PaymentAggregate,
        Self::ShipmentService,
        Self::ShipmentAggregate,
    ];

    /// Stable identifier, as used in step records.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::OrderService => "orderService",
            Self::OrderAggregate => "orderAggregate",
            Self::Saga => "saga",
            Self::PaymentService => "paymentService",
            Self::UserService => "userService",
            Self::PaymentAggregate => "paymentAggregate",
            Self::ShipmentService => "shipmentService",
            Self::ShipmentAggregate => "shipmentAggregate",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Client => "Client",
            Self::OrderService => "OrderService",
            Self::OrderAggregate => "OrderAggregate",
            Self::Saga => "Saga (Orchestrator)",
            Self::PaymentService => "PaymentService",
            Self::UserService => "UserService",
            Self::PaymentAggregate => "PaymentAggregate",
            Self::ShipmentService => "ShipmentService",
            Self::ShipmentAggregate => "ShipmentAggregate",
        }
    }

    /// Zero-based column position.
    #[must_use]
    pub const fn lane(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Participant {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|participant| participant.id() == s)
            .ok_or_else(|| FlowError::UnknownParticipant(s.to_owned()))
    }
}
