//! Data models for the Sabedoria library

pub mod book;
pub mod loan;
pub mod person;
pub mod reservation;
pub mod staff;

// Re-export commonly used types
pub use book::{Book, BookAvailability, BookDetails, BookShort};
pub use loan::{Loan, LoanDetails, LoanStatus};
pub use person::{Person, PersonShort};
pub use reservation::{Reservation, ReservationDetails, ReservationStatus};
pub use staff::{StaffAccount, StaffClaims, StaffRole};
