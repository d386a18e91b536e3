use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::errors::ServiceError;

/// Order lifecycle states, stored as uppercase strings.
///
/// PENDING -> READY -> SERVED -> PAID is the normal service flow;
/// ARCHIVED is the end-of-day terminal state and is reachable from
/// every other state.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Ready,
    Served,
    Paid,
    Archived,
}

impl OrderStatus {
    /// Terminal states drop an order out of the active work queue.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Archived)
    }

    /// Returns true if `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (_, Archived) => true,
            (Pending, Ready) => true,
            (Ready, Served) => true,
            (Served, Paid) => true,
            _ => false,
        }
    }

    /// Parses a status string, mapping unknown values to a 400-class error.
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        raw.parse::<OrderStatus>()
            .map_err(|_| ServiceError::InvalidStatus(format!("Unknown order status: {raw}")))
    }
}

/// Validates a status transition, returning the error surfaced to clients
/// when the step is not part of the lifecycle.
pub fn check_transition(from: OrderStatus, to: OrderStatus) -> Result<(), ServiceError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(ServiceError::InvalidStatus(format!(
            "Cannot transition from status '{from}' to '{to}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn normal_service_flow_is_accepted() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Served));
        assert!(Served.can_transition_to(Paid));
    }

    #[test]
    fn every_state_can_archive() {
        for status in OrderStatus::iter() {
            assert!(
                status.can_transition_to(OrderStatus::Archived),
                "{status} should be archivable"
            );
        }
    }

    #[test]
    fn backward_and_skipping_transitions_are_rejected() {
        use OrderStatus::*;
        assert!(!Paid.can_transition_to(Pending));
        assert!(!Ready.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Served));
        assert!(!Pending.can_transition_to(Paid));
        assert!(!Served.can_transition_to(Ready));
        assert!(!Archived.can_transition_to(Paid));
    }

    #[test]
    fn statuses_round_trip_as_uppercase_strings() {
        assert_eq!(OrderStatus::Pending.to_string(), "PENDING");
        assert_eq!(OrderStatus::parse("READY").unwrap(), OrderStatus::Ready);
        assert_eq!(
            OrderStatus::parse("ARCHIVED").unwrap(),
            OrderStatus::Archived
        );
        assert!(OrderStatus::parse("SHIPPED").is_err());
    }

    #[test]
    fn terminal_states_leave_the_work_queue() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Ready.is_terminal());
        assert!(!OrderStatus::Served.is_terminal());
        assert!(OrderStatus::Paid.is_terminal());
        assert!(OrderStatus::Archived.is_terminal());
    }
}
