use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    Account, ApplicationCounts, ApplyForm, ApplyStatus, Candidate, CandidateProfile, Contact,
    Employer, EmployerProfile, JobDraft, JobFilter, JobPosting, NewAccount, NewApplyForm,
    NewContact, NewPolicy, NewSampleCv, Page, PageRequest, Policy, ProfileDraft, PurgeReport,
    Role, SampleCv,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryDatabase;
pub use postgres::PgDatabase;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("record not found")]
    NotFound,

    /// Unique or foreign-key constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db) => match db.code().as_deref() {
                Some("23505") => DbError::Conflict(format!(
                    "duplicate value violates {}",
                    db.constraint().unwrap_or("a unique constraint")
                )),
                Some("23503") => DbError::Conflict(format!(
                    "record is still referenced ({})",
                    db.constraint().unwrap_or("foreign key")
                )),
                _ => DbError::Sqlx(err),
            },
            _ => DbError::Sqlx(err),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Inserts the account and, when given, its profile in one transaction.
    async fn create_account(
        &self,
        account: NewAccount,
        profile: Option<ProfileDraft>,
    ) -> DbResult<Account>;
    async fn find_account(&self, id: &str) -> DbResult<Option<Account>>;
    /// Looks up by email (case-insensitive) or exact username.
    async fn find_account_by_login(&self, login: &str) -> DbResult<Option<Account>>;
    async fn list_accounts(&self, role: Option<Role>, page: PageRequest) -> DbResult<Page<Account>>;
    /// Cascades to the linked candidate or employer profile.
    async fn delete_account(&self, id: &str) -> DbResult<()>;
}

#[async_trait]
pub trait CandidateRepository: Send + Sync {
    async fn find_candidate(&self, id: &str) -> DbResult<Option<Candidate>>;
    async fn find_candidate_by_account(&self, account_id: &str) -> DbResult<Option<Candidate>>;
    async fn update_candidate(&self, id: &str, profile: CandidateProfile) -> DbResult<Candidate>;
    async fn set_candidate_avatar(&self, id: &str, path: &str) -> DbResult<Candidate>;
    async fn set_candidate_cv(&self, id: &str, path: &str) -> DbResult<Candidate>;
}

#[async_trait]
pub trait EmployerRepository: Send + Sync {
    async fn find_employer(&self, id: &str) -> DbResult<Option<Employer>>;
    async fn find_employer_by_account(&self, account_id: &str) -> DbResult<Option<Employer>>;
    async fn update_employer(&self, id: &str, profile: EmployerProfile) -> DbResult<Employer>;
    async fn set_employer_avatar(&self, id: &str, path: &str) -> DbResult<Employer>;
    async fn list_employers(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> DbResult<Page<Employer>>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create_job(&self, employer_id: &str, draft: JobDraft) -> DbResult<JobPosting>;
    async fn find_job(&self, id: &str) -> DbResult<Option<JobPosting>>;
    async fn update_job(&self, id: &str, draft: JobDraft) -> DbResult<JobPosting>;
    async fn expire_job(&self, id: &str, at: DateTime<Utc>) -> DbResult<JobPosting>;
    async fn set_job_lock(&self, id: &str, lock_flg: i16) -> DbResult<JobPosting>;
    /// Refused with `Conflict` while applications reference the posting.
    async fn delete_job(&self, id: &str) -> DbResult<()>;
    /// Newest first.
    async fn list_jobs(
        &self,
        filter: &JobFilter,
        page: PageRequest,
        now: DateTime<Utc>,
    ) -> DbResult<Page<JobPosting>>;
    /// Removes postings that expired before `before` together with their
    /// applications. A cutoff later than now is clamped to now.
    async fn purge_expired_jobs(&self, before: DateTime<Utc>) -> DbResult<PurgeReport>;
}

#[async_trait]
pub trait ApplyFormRepository: Send + Sync {
    async fn create_application(&self, form: NewApplyForm) -> DbResult<ApplyForm>;
    async fn find_application(
        &self,
        job_id: &str,
        candidate_id: &str,
    ) -> DbResult<Option<ApplyForm>>;
    async fn list_job_applications(
        &self,
        job_id: &str,
        status: Option<ApplyStatus>,
        page: PageRequest,
    ) -> DbResult<Page<ApplyForm>>;
    async fn list_candidate_applications(
        &self,
        candidate_id: &str,
        page: PageRequest,
    ) -> DbResult<Page<ApplyForm>>;
    async fn set_application_status(
        &self,
        job_id: &str,
        candidate_id: &str,
        status: ApplyStatus,
        at: DateTime<Utc>,
    ) -> DbResult<ApplyForm>;
    async fn delete_application(&self, job_id: &str, candidate_id: &str) -> DbResult<()>;
    async fn application_counts(&self, job_id: &str) -> DbResult<ApplicationCounts>;
}

#[async_trait]
pub trait SampleCvRepository: Send + Sync {
    async fn create_sample_cv(&self, cv: NewSampleCv) -> DbResult<SampleCv>;
    async fn list_sample_cvs(&self, page: PageRequest) -> DbResult<Page<SampleCv>>;
    async fn delete_sample_cv(&self, id: &str) -> DbResult<()>;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create_contact(&self, contact: NewContact) -> DbResult<Contact>;
    async fn list_contacts(&self, page: PageRequest) -> DbResult<Page<Contact>>;
}

#[async_trait]
pub trait PolicyRepository: Send + Sync {
    async fn create_policy(&self, policy: NewPolicy) -> DbResult<Policy>;
    async fn find_policy(&self, id: &str) -> DbResult<Option<Policy>>;
    async fn list_policies(&self, page: PageRequest) -> DbResult<Page<Policy>>;
    async fn update_policy(&self, id: &str, policy: NewPolicy) -> DbResult<Policy>;
    async fn delete_policy(&self, id: &str) -> DbResult<()>;
}

/// Every repository behind one trait object.
pub trait Database:
    AccountRepository
    + CandidateRepository
    + EmployerRepository
    + JobRepository
    + ApplyFormRepository
    + SampleCvRepository
    + ContactRepository
    + PolicyRepository
{
}

impl<T> Database for T where
    T: AccountRepository
        + CandidateRepository
        + EmployerRepository
        + JobRepository
        + ApplyFormRepository
        + SampleCvRepository
        + ContactRepository
        + PolicyRepository
{
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
