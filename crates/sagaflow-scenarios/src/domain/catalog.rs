//! The three hand-authored choreographies.
//!
//! All three share the order-creation and payment-validation prelude
//! (steps 1–8) and diverge at the payment aggregate.

use super::participant::Participant::{
    Client, OrderAggregate, OrderService, PaymentAggregate, PaymentService, Saga,
    ShipmentAggregate, ShipmentService, UserService,
};
use super::step::Condition::{Failure, Success};
use super::step::MessageKind::{Command, Event, Query, Response};
use super::step::Step;

/// Order placed, paid, shipped and completed.
pub const SUCCESS: [Step; 17] = [
    Step::new(1, Client, OrderService, "CreateOrderCommand", Command, 500),
    Step::new(2, OrderService, OrderAggregate, "@CommandHandler", Command, 300),
    Step::new(3, OrderAggregate, OrderAggregate, "apply(OrderCreatedEvent)", Event, 400),
    Step::new(4, OrderAggregate, Saga, "OrderCreatedEvent", Event, 500),
    Step::new(5, Saga, PaymentService, "ValidatePaymentCommand", Command, 600),
    Step::new(6, PaymentService, PaymentAggregate, "@CommandHandler", Command, 300),
    Step::new(7, PaymentAggregate, UserService, "GetUserPaymentDetailQuery", Query, 400),
    Step::new(8, UserService, PaymentAggregate, "UserDTO", Response, 300),
    Step::new(9, PaymentAggregate, PaymentAggregate, "apply(PaymentProcessedEvent)", Event, 400)
        .when(Success),
    Step::new(10, PaymentAggregate, Saga, "PaymentProcessedEvent", Event, 500).when(Success),
    Step::new(11, Saga, ShipmentService, "ShipOrderCommand", Command, 600).when(Success),
    Step::new(12, ShipmentService, ShipmentAggregate, "@CommandHandler", Command, 300)
        .when(Success),
    Step::new(13, ShipmentAggregate, ShipmentAggregate, "apply(OrderShipEvent)", Event, 400)
        .when(Success),
    Step::new(14, ShipmentAggregate, Saga, "OrderShipEvent", Event, 500).when(Success),
    Step::new(15, Saga, OrderService, "CompleteOrderCommand", Command, 600).when(Success),
    Step::new(16, OrderService, OrderAggregate, "@CommandHandler", Command, 300).when(Success),
    Step::new(17, OrderAggregate, OrderAggregate, "apply(OrderCompletedEvent)", Event, 400)
        .when(Success),
];

/// Payment rejected; the saga cancels the order.
pub const PAYMENT_FAILURE: [Step; 13] = [
    Step::new(1, Client, OrderService, "CreateOrderCommand", Command, 500),
    Step::new(2, OrderService, OrderAggregate, "@CommandHandler", Command, 300),
    Step::new(3, OrderAggregate, OrderAggregate, "apply(OrderCreatedEvent)", Event, 400),
    Step::new(4, OrderAggregate, Saga, "OrderCreatedEvent", Event, 500),
    Step::new(5, Saga, PaymentService, "ValidatePaymentCommand", Command, 600),
    Step::new(6, PaymentService, PaymentAggregate, "@CommandHandler", Command, 300),
    Step::new(7, PaymentAggregate, UserService, "GetUserPaymentDetailQuery", Query, 400),
    Step::new(8, UserService, PaymentAggregate, "UserDTO", Response, 300),
    Step::new(9, PaymentAggregate, PaymentAggregate, "apply(PaymentFailedEvent)", Event, 400)
        .when(Failure),
    Step::new(10, PaymentAggregate, Saga, "PaymentFailedEvent", Event, 500).when(Failure),
    Step::new(11, Saga, OrderService, "CancelOrderCommand", Command, 600).when(Failure),
    Step::new(12, OrderService, OrderAggregate, "@CommandHandler", Command, 300).when(Failure),
    Step::new(13, OrderAggregate, OrderAggregate, "apply(OrderCancelledEvent)", Event, 400)
        .when(Failure),
];

/// Payment succeeds but shipping fails; the saga refunds and cancels.
pub const SHIPMENT_FAILURE: [Step; 20] = [
    Step::new(1, Client, OrderService, "CreateOrderCommand", Command, 500),
    Step::new(2, OrderService, OrderAggregate, "@CommandHandler", Command, 300),
    Step::new(3, OrderAggregate, OrderAggregate, "apply(OrderCreatedEvent)", Event, 400),
    Step::new(4, OrderAggregate, Saga, "OrderCreatedEvent", Event, 500),
    Step::new(5, Saga, PaymentService, "ValidatePaymentCommand", Command, 600),
    Step::new(6, PaymentService, PaymentAggregate, "@CommandHandler", Command, 300),
    Step::new(7, PaymentAggregate, UserService, "GetUserPaymentDetailQuery", Query, 400),
    Step::new(8, UserService, PaymentAggregate, "UserDTO", Response, 300),
    Step::new(9, PaymentAggregate, PaymentAggregate, "apply(PaymentProcessedEvent)", Event, 400)
        .when(Success),
    Step::new(10, PaymentAggregate, Saga, "PaymentProcessedEvent", Event, 500).when(Success),
    Step::new(11, Saga, ShipmentService, "ShipOrderCommand", Command, 600).when(Success),
    Step::new(12, ShipmentService, ShipmentAggregate, "@CommandHandler", Command, 300)
        .when(Success),
    Step::new(13, ShipmentAggregate, ShipmentAggregate, "apply(ShipmentFailedEvent)", Event, 400)
        .when(Failure),
    Step::new(14, ShipmentAggregate, Saga, "ShipmentFailedEvent", Event, 500).when(Failure),
    Step::new(15, Saga, PaymentService, "RefundPaymentCommand", Command, 600).when(Failure),
    Step::new(16, PaymentService, PaymentAggregate, "@CommandHandler", Command, 300)
        .when(Failure),
    Step::new(17, PaymentAggregate, PaymentAggregate, "apply(PaymentRefundedEvent)", Event, 400)
        .when(Failure),
    Step::new(18, PaymentAggregate, Saga, "PaymentRefundedEvent", Event, 500).when(Failure),
    Step::new(19, Saga, OrderService, "CancelOrderCommand", Command, 600).when(Failure),
    Step::new(20, OrderService, OrderAggregate, "@CommandHandler", Command, 300).when(Failure),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::step::Condition;

    fn assert_ids_contiguous(steps: &[Step]) {
        for (index, step) in steps.iter().enumerate() {
            assert_eq!(step.id as usize, index + 1, "step {} out of place", step.id);
        }
    }

    #[test]
    fn test_every_scenario_has_contiguous_ids() {
        assert_ids_contiguous(&SUCCESS);
        assert_ids_contiguous(&PAYMENT_FAILURE);
        assert_ids_contiguous(&SHIPMENT_FAILURE);
    }

    #[test]
    fn test_every_delay_is_positive() {
        let all = SUCCESS.iter().chain(&PAYMENT_FAILURE).chain(&SHIPMENT_FAILURE);

        assert!(all.into_iter().all(|step| step.delay_ms > 0));
    }

    #[test]
    fn test_scenarios_share_the_order_and_payment_prelude() {
        assert_eq!(SUCCESS[..8], PAYMENT_FAILURE[..8]);
        assert_eq!(SUCCESS[..8], SHIPMENT_FAILURE[..8]);
    }

    #[test]
    fn test_prelude_steps_are_unconditioned() {
        assert!(SUCCESS[..8].iter().all(|step| step.condition.is_none()));
    }

    #[test]
    fn test_payment_failure_path_is_tagged_failure() {
        assert!(
            PAYMENT_FAILURE[8..]
                .iter()
                .all(|step| step.condition == Some(Condition::Failure))
        );
    }
}
