//! Lending lifecycle engine
//!
//! Pure domain rules for loans and reservations: derived display statuses
//! ([`status`]) and the legal state transitions ([`transitions`]). Nothing in
//! this module touches the database or the clock; callers pass `now` in, which
//! keeps every function deterministic and freely callable from concurrent
//! readers.

pub mod status;
pub mod transitions;

pub use status::{
    derive_book_availability, derive_loan_status, derive_reservation_status, LoanStatusView,
    ReservationStatusView,
};
pub use transitions::{
    apply_loan_transition, apply_reservation_transition, LoanAction, LoanPolicy, LoanUpdate,
    ReservationAction, ReservationUpdate, TransitionError,
};
