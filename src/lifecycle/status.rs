//! Derived display statuses
//!
//! "Overdue" and "Expired" are presentation-time derivations from stored status
//! plus the current time; they are never written back. Day counts use calendar
//! ceiling arithmetic: one minute past due already counts as one late day.

use chrono::{DateTime, Utc};

use crate::models::book::BookAvailability;
use crate::models::loan::LoanStatus;
use crate::models::reservation::ReservationStatus;

const SECONDS_PER_DAY: i64 = 86_400;

/// Derived view of a loan's status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanStatusView {
    pub label: &'static str,
    pub is_late: bool,
    pub late_days: i64,
}

/// Derived view of a reservation's status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationStatusView {
    pub label: &'static str,
    pub is_expired: bool,
    pub days_remaining: i64,
}

/// Ceiling of a signed duration in whole days.
fn days_ceil(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let secs = (to - from).num_seconds();
    (secs + SECONDS_PER_DAY - 1).div_euclid(SECONDS_PER_DAY)
}

/// Derive the display status of a loan.
///
/// An open loan (Active or Renewed) past its due date shows as "Overdue" with a
/// positive late-day count; a returned loan always shows as "Returned" no matter
/// what its dates say.
pub fn derive_loan_status(
    stored: LoanStatus,
    due_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> LoanStatusView {
    match stored {
        LoanStatus::Active | LoanStatus::Renewed if due_date < now => LoanStatusView {
            label: "Overdue",
            is_late: true,
            late_days: days_ceil(due_date, now).max(0),
        },
        _ => LoanStatusView {
            label: stored.label(),
            is_late: false,
            late_days: 0,
        },
    }
}

/// Derive the display status of a reservation.
///
/// `days_remaining` may be negative or zero; callers treat non-positive values
/// as already expired regardless of the stored status.
pub fn derive_reservation_status(
    stored: ReservationStatus,
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ReservationStatusView {
    let days_remaining = days_ceil(now, expires_at);
    if stored == ReservationStatus::Active && expires_at < now {
        ReservationStatusView {
            label: "Expired",
            is_expired: true,
            days_remaining,
        }
    } else {
        ReservationStatusView {
            label: stored.label(),
            is_expired: false,
            days_remaining,
        }
    }
}

/// Derive a book's availability from the authoritative open loan and
/// reservation counts. The maintenance flag wins; a fully lent title shows
/// Loaned; remaining copies all claimed by reservations show Reserved.
pub fn derive_book_availability(
    under_maintenance: bool,
    copies_total: i16,
    open_loans: i64,
    active_reservations: i64,
) -> BookAvailability {
    if under_maintenance {
        return BookAvailability::UnderMaintenance;
    }
    let free = i64::from(copies_total) - open_loans;
    if free <= 0 {
        BookAvailability::Loaned
    } else if active_reservations >= free {
        BookAvailability::Reserved
    } else {
        BookAvailability::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_active_loan_past_due_is_overdue() {
        // due 2024-01-15, checked 2024-01-20: exactly 5 late days
        let view = derive_loan_status(LoanStatus::Active, at(2024, 1, 15), at(2024, 1, 20));
        assert_eq!(view.label, "Overdue");
        assert!(view.is_late);
        assert_eq!(view.late_days, 5);
    }

    #[test]
    fn test_one_minute_late_counts_as_one_day() {
        let due = at(2024, 3, 1);
        let view = derive_loan_status(LoanStatus::Active, due, due + Duration::minutes(1));
        assert!(view.is_late);
        assert_eq!(view.late_days, 1);
    }

    #[test]
    fn test_loan_not_yet_due_keeps_stored_label() {
        let view = derive_loan_status(LoanStatus::Active, at(2024, 1, 15), at(2024, 1, 10));
        assert_eq!(view.label, "Active");
        assert!(!view.is_late);
        assert_eq!(view.late_days, 0);
    }

    #[test]
    fn test_returned_loan_never_overdue() {
        let view = derive_loan_status(LoanStatus::Returned, at(2020, 1, 1), at(2024, 1, 1));
        assert_eq!(view.label, "Returned");
        assert!(!view.is_late);
        assert_eq!(view.late_days, 0);
    }

    #[test]
    fn test_renewed_loan_past_due_is_overdue() {
        let view = derive_loan_status(LoanStatus::Renewed, at(2024, 1, 15), at(2024, 1, 16));
        assert_eq!(view.label, "Overdue");
        assert!(view.is_late);
    }

    #[test]
    fn test_late_days_monotonic_as_clock_advances() {
        let due = at(2024, 1, 15);
        let mut previous = 0;
        for hours in 0..120 {
            let view = derive_loan_status(LoanStatus::Active, due, due + Duration::hours(hours));
            assert!(view.late_days >= previous);
            previous = view.late_days;
        }
    }

    #[test]
    fn test_derivation_is_pure() {
        let a = derive_loan_status(LoanStatus::Active, at(2024, 1, 15), at(2024, 1, 20));
        let b = derive_loan_status(LoanStatus::Active, at(2024, 1, 15), at(2024, 1, 20));
        assert_eq!(a, b);
    }

    #[test]
    fn test_reservation_expired_one_hour_ago() {
        let now = at(2024, 6, 1);
        let view =
            derive_reservation_status(ReservationStatus::Active, now - Duration::hours(1), now);
        assert_eq!(view.label, "Expired");
        assert!(view.is_expired);
        assert!(view.days_remaining <= 0);
    }

    #[test]
    fn test_reservation_days_remaining_rounds_up() {
        let now = at(2024, 6, 1);
        let view = derive_reservation_status(
            ReservationStatus::Active,
            now + Duration::days(2) + Duration::hours(1),
            now,
        );
        assert_eq!(view.label, "Active");
        assert!(!view.is_expired);
        assert_eq!(view.days_remaining, 3);
    }

    #[test]
    fn test_reservation_days_remaining_goes_negative() {
        let now = at(2024, 6, 10);
        let view =
            derive_reservation_status(ReservationStatus::Active, now - Duration::days(3), now);
        assert!(view.is_expired);
        assert_eq!(view.days_remaining, -3);
    }

    #[test]
    fn test_fulfilled_reservation_keeps_label_past_expiry() {
        let now = at(2024, 6, 10);
        let view =
            derive_reservation_status(ReservationStatus::Fulfilled, now - Duration::days(3), now);
        assert_eq!(view.label, "Fulfilled");
        assert!(!view.is_expired);
    }

    #[test]
    fn test_availability_maintenance_wins() {
        assert_eq!(
            derive_book_availability(true, 3, 0, 0),
            BookAvailability::UnderMaintenance
        );
    }

    #[test]
    fn test_availability_all_copies_out() {
        assert_eq!(derive_book_availability(false, 2, 2, 0), BookAvailability::Loaned);
    }

    #[test]
    fn test_availability_remaining_copies_reserved() {
        assert_eq!(
            derive_book_availability(false, 2, 1, 1),
            BookAvailability::Reserved
        );
    }

    #[test]
    fn test_availability_free_copy() {
        assert_eq!(
            derive_book_availability(false, 2, 1, 0),
            BookAvailability::Available
        );
    }
}
