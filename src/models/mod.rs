// Entity types shared by the repositories and the HTTP routes

pub mod account;
pub mod apply_form;
pub mod candidate;
pub mod catalog;
pub mod employer;
pub mod job;
pub mod page;

pub use account::{Account, NewAccount, ProfileDraft, Role};
pub use apply_form::{ApplicationCounts, ApplyForm, ApplyStatus, NewApplyForm};
pub use candidate::{Candidate, CandidateProfile};
pub use catalog::{Contact, NewContact, NewPolicy, NewSampleCv, Policy, SampleCv};
pub use employer::{Employer, EmployerProfile, EmployerSummary};
pub use job::{JobDraft, JobFilter, JobPosting, JobStatus, PurgeReport, TimeRemaining};
pub use page::{Page, PageRequest, Pagination};
