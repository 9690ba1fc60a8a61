//! Loan management service
//!
//! Checkout, return and renew. Status changes are produced by the lifecycle
//! transition applier and persisted as-is; this service never writes a status
//! on its own.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::LibraryConfig,
    error::AppResult,
    lifecycle::transitions::{apply_loan_transition, LoanAction, LoanPolicy},
    models::loan::{CreateLoan, LoanDetails, LoanQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    config: LibraryConfig,
}

impl LoansService {
    pub fn new(repository: Repository, config: LibraryConfig) -> Self {
        Self { repository, config }
    }

    fn policy(&self) -> LoanPolicy {
        LoanPolicy {
            renewal_period_days: self.config.renewal_period_days,
            renewal_limit: self.config.renewal_limit,
        }
    }

    /// List loans with joined book/person and derived display status
    pub async fn list(&self, query: &LoanQuery) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.list(query).await
    }

    /// Check a book out to a person
    pub async fn checkout(&self, loan: CreateLoan) -> AppResult<LoanDetails> {
        let created = self
            .repository
            .loans
            .create(&loan, self.config.loan_period_days)
            .await?;

        tracing::info!(
            "Loan {} created: book {} to person {}, due {}",
            created.id,
            created.book_id,
            created.person_id,
            created.due_date
        );
        self.repository.loans.get_details(created.id).await
    }

    /// Return a loan
    pub async fn return_loan(&self, loan_id: Uuid) -> AppResult<LoanDetails> {
        let loan = self.repository.loans.get_by_id(loan_id).await?;
        let update = apply_loan_transition(&loan, LoanAction::Return, &self.policy(), Utc::now())?;
        self.repository.loans.apply_update(loan_id, &update).await?;

        tracing::info!("Loan {} returned (book {})", loan_id, loan.book_id);
        self.repository.loans.get_details(loan_id).await
    }

    /// Renew a loan, extending its due date from today
    pub async fn renew_loan(&self, loan_id: Uuid) -> AppResult<LoanDetails> {
        let loan = self.repository.loans.get_by_id(loan_id).await?;
        let update = apply_loan_transition(&loan, LoanAction::Renew, &self.policy(), Utc::now())?;
        let renewed = self.repository.loans.apply_update(loan_id, &update).await?;

        tracing::info!(
            "Loan {} renewed ({}/{}), new due date {}",
            loan_id,
            renewed.renewal_count,
            self.config.renewal_limit,
            renewed.due_date
        );
        self.repository.loans.get_details(loan_id).await
    }

    /// Count open loans
    pub async fn count_active(&self) -> AppResult<i64> {
        self.repository.loans.count_active().await
    }

    /// Count overdue loans
    pub async fn count_overdue(&self) -> AppResult<i64> {
        self.repository.loans.count_overdue().await
    }
}
