//! Loan and reservation state transitions
//!
//! Every status write in the application goes through these appliers; the
//! repositories persist exactly the update structs produced here. Loan states:
//! Active and Renewed are mutually open, Returned is terminal. Reservation
//! states: Fulfilled, Cancelled and Expired are terminal.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::models::loan::{Loan, LoanStatus};
use crate::models::reservation::{Reservation, ReservationStatus};

/// Action requested on a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanAction {
    Return,
    Renew,
}

impl std::fmt::Display for LoanAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LoanAction::Return => "return",
            LoanAction::Renew => "renew",
        })
    }
}

/// Action requested on a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationAction {
    Fulfill,
    Cancel,
}

impl std::fmt::Display for ReservationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ReservationAction::Fulfill => "fulfill",
            ReservationAction::Cancel => "cancel",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Cannot {action} a loan with status {status}")]
    InvalidLoanTransition { status: LoanStatus, action: LoanAction },

    #[error("Cannot {action} a reservation with status {status}")]
    InvalidReservationTransition {
        status: ReservationStatus,
        action: ReservationAction,
    },

    #[error("Renewal limit reached ({count}/{limit})")]
    RenewalLimitReached { count: i16, limit: i16 },
}

/// Lending policy applied on renewal
#[derive(Debug, Clone)]
pub struct LoanPolicy {
    pub renewal_period_days: i64,
    pub renewal_limit: i16,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            renewal_period_days: 15,
            renewal_limit: 3,
        }
    }
}

/// Field updates a legal loan transition produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanUpdate {
    pub status: LoanStatus,
    /// New due date; set only by Renew
    pub due_date: Option<DateTime<Utc>>,
    /// Actual return date; set only by Return
    pub returned_date: Option<DateTime<Utc>>,
    pub renewal_count: i16,
}

/// Field updates a legal reservation transition produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationUpdate {
    pub status: ReservationStatus,
    /// Fulfillment does not auto-create a loan; staff must check the book out
    /// as a separate action.
    pub requires_followup_loan: bool,
}

/// Validate and apply a loan action against its current stored status.
pub fn apply_loan_transition(
    loan: &Loan,
    action: LoanAction,
    policy: &LoanPolicy,
    now: DateTime<Utc>,
) -> Result<LoanUpdate, TransitionError> {
    match (loan.status, action) {
        (LoanStatus::Active | LoanStatus::Renewed, LoanAction::Return) => Ok(LoanUpdate {
            status: LoanStatus::Returned,
            due_date: None,
            returned_date: Some(now),
            renewal_count: loan.renewal_count,
        }),
        (LoanStatus::Active | LoanStatus::Renewed, LoanAction::Renew) => {
            if loan.renewal_count >= policy.renewal_limit {
                return Err(TransitionError::RenewalLimitReached {
                    count: loan.renewal_count,
                    limit: policy.renewal_limit,
                });
            }
            Ok(LoanUpdate {
                status: LoanStatus::Renewed,
                due_date: Some(now + Duration::days(policy.renewal_period_days)),
                returned_date: None,
                renewal_count: loan.renewal_count + 1,
            })
        }
        (status, action) => Err(TransitionError::InvalidLoanTransition { status, action }),
    }
}

/// Validate and apply a reservation action against its current stored status.
pub fn apply_reservation_transition(
    reservation: &Reservation,
    action: ReservationAction,
) -> Result<ReservationUpdate, TransitionError> {
    match (reservation.status, action) {
        (ReservationStatus::Active, ReservationAction::Fulfill) => Ok(ReservationUpdate {
            status: ReservationStatus::Fulfilled,
            requires_followup_loan: true,
        }),
        (ReservationStatus::Active, ReservationAction::Cancel) => Ok(ReservationUpdate {
            status: ReservationStatus::Cancelled,
            requires_followup_loan: false,
        }),
        (status, action) => Err(TransitionError::InvalidReservationTransition { status, action }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn at(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).unwrap()
    }

    fn loan(status: LoanStatus, renewal_count: i16) -> Loan {
        Loan {
            id: Uuid::new_v4(),
            book_id: Uuid::new_v4(),
            person_id: Uuid::new_v4(),
            loan_date: at(2024, 1, 1),
            due_date: at(2024, 1, 16),
            returned_date: None,
            status,
            renewal_count,
            notes: None,
        }
    }

    fn reservation(status: ReservationStatus) -> Reservation {
        Reservation {
            id: Uuid::new_v4(),
            book_id: Uuid::new_v4(),
            person_id: Uuid::new_v4(),
            reserved_at: at(2024, 1, 1),
            expires_at: at(2024, 1, 8),
            status,
        }
    }

    #[test]
    fn test_return_active_loan() {
        let now = at(2024, 1, 10);
        let update =
            apply_loan_transition(&loan(LoanStatus::Active, 0), LoanAction::Return, &LoanPolicy::default(), now)
                .unwrap();
        assert_eq!(update.status, LoanStatus::Returned);
        assert_eq!(update.returned_date, Some(now));
        assert_eq!(update.due_date, None);
    }

    #[test]
    fn test_return_renewed_loan() {
        let update = apply_loan_transition(
            &loan(LoanStatus::Renewed, 1),
            LoanAction::Return,
            &LoanPolicy::default(),
            at(2024, 2, 1),
        )
        .unwrap();
        assert_eq!(update.status, LoanStatus::Returned);
    }

    #[test]
    fn test_return_returned_loan_is_invalid() {
        let err = apply_loan_transition(
            &loan(LoanStatus::Returned, 0),
            LoanAction::Return,
            &LoanPolicy::default(),
            at(2024, 2, 1),
        )
        .unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidLoanTransition {
                status: LoanStatus::Returned,
                action: LoanAction::Return,
            }
        );
    }

    #[test]
    fn test_renew_extends_due_date_fifteen_days_from_today() {
        let now = at(2024, 1, 10);
        // prior due date is irrelevant; the new one is anchored on "today"
        let update =
            apply_loan_transition(&loan(LoanStatus::Active, 0), LoanAction::Renew, &LoanPolicy::default(), now)
                .unwrap();
        assert_eq!(update.status, LoanStatus::Renewed);
        assert_eq!(update.due_date, Some(at(2024, 1, 25)));
        assert_eq!(update.renewal_count, 1);
    }

    #[test]
    fn test_renew_renewed_loan_increments_count() {
        let update = apply_loan_transition(
            &loan(LoanStatus::Renewed, 2),
            LoanAction::Renew,
            &LoanPolicy::default(),
            at(2024, 1, 10),
        )
        .unwrap();
        assert_eq!(update.renewal_count, 3);
    }

    #[test]
    fn test_renew_blocked_at_limit() {
        let policy = LoanPolicy {
            renewal_period_days: 15,
            renewal_limit: 2,
        };
        let err = apply_loan_transition(
            &loan(LoanStatus::Renewed, 2),
            LoanAction::Renew,
            &policy,
            at(2024, 1, 10),
        )
        .unwrap_err();
        assert_eq!(err, TransitionError::RenewalLimitReached { count: 2, limit: 2 });
    }

    #[test]
    fn test_renew_returned_loan_is_invalid() {
        let err = apply_loan_transition(
            &loan(LoanStatus::Returned, 0),
            LoanAction::Renew,
            &LoanPolicy::default(),
            at(2024, 1, 10),
        )
        .unwrap_err();
        assert!(matches!(err, TransitionError::InvalidLoanTransition { .. }));
    }

    #[test]
    fn test_fulfill_active_reservation() {
        let update =
            apply_reservation_transition(&reservation(ReservationStatus::Active), ReservationAction::Fulfill)
                .unwrap();
        assert_eq!(update.status, ReservationStatus::Fulfilled);
        assert!(update.requires_followup_loan);
    }

    #[test]
    fn test_cancel_active_reservation() {
        let update =
            apply_reservation_transition(&reservation(ReservationStatus::Active), ReservationAction::Cancel)
                .unwrap();
        assert_eq!(update.status, ReservationStatus::Cancelled);
        assert!(!update.requires_followup_loan);
    }

    #[test]
    fn test_cancel_fulfilled_reservation_is_invalid() {
        let err = apply_reservation_transition(
            &reservation(ReservationStatus::Fulfilled),
            ReservationAction::Cancel,
        )
        .unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidReservationTransition {
                status: ReservationStatus::Fulfilled,
                action: ReservationAction::Cancel,
            }
        );
    }

    #[test]
    fn test_stored_expired_reservation_is_terminal() {
        for action in [ReservationAction::Fulfill, ReservationAction::Cancel] {
            let err = apply_reservation_transition(&reservation(ReservationStatus::Expired), action)
                .unwrap_err();
            assert!(matches!(
                err,
                TransitionError::InvalidReservationTransition { .. }
            ));
        }
    }
}
