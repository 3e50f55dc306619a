use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::{
    AccountRepository, ApplyFormRepository, CandidateRepository, ContactRepository, DbError,
    DbResult, EmployerRepository, JobRepository, PolicyRepository, SampleCvRepository, new_id,
};
use crate::models::job::contains_ci;
use crate::models::{
    Account, ApplicationCounts, ApplyForm, ApplyStatus, Candidate, CandidateProfile, Contact,
    Employer, EmployerProfile, JobDraft, JobFilter, JobPosting, NewAccount, NewApplyForm,
    NewContact, NewPolicy, NewSampleCv, Page, PageRequest, Policy, ProfileDraft, PurgeReport,
    Role, SampleCv,
};

#[derive(Default)]
struct Tables {
    accounts: HashMap<String, Account>,
    candidates: HashMap<String, Candidate>,
    employers: HashMap<String, Employer>,
    jobs: HashMap<String, JobPosting>,
    applications: HashMap<(String, String), ApplyForm>,
    sample_cvs: HashMap<String, SampleCv>,
    contacts: HashMap<String, Contact>,
    policies: HashMap<String, Policy>,
}

impl Tables {
    fn job_has_applications(&self, job_id: &str) -> bool {
        self.applications.keys().any(|(job, _)| job == job_id)
    }

    fn candidate_has_applications(&self, candidate_id: &str) -> bool {
        self.applications.keys().any(|(_, cand)| cand == candidate_id)
    }
}

/// In-memory store for development and tests.
///
/// One lock guards every table, so each call behaves like a single
/// transaction. Mirrors the relational rules of the Postgres schema:
/// profiles cascade from accounts, postings cascade from employers, and
/// applications block deletion of the posting or candidate they reference.
#[derive(Default)]
pub struct MemoryDatabase {
    tables: Mutex<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn newest_first<T>(mut rows: Vec<T>, key: impl Fn(&T) -> (DateTime<Utc>, String)) -> Vec<T> {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}

#[async_trait]
impl AccountRepository for MemoryDatabase {
    async fn create_account(
        &self,
        account: NewAccount,
        profile: Option<ProfileDraft>,
    ) -> DbResult<Account> {
        let mut tables = self.lock();
        let email = account.email.to_lowercase();
        if tables.accounts.values().any(|a| a.email.to_lowercase() == email) {
            return Err(DbError::Conflict("email already registered".into()));
        }
        if tables.accounts.values().any(|a| a.username == account.username) {
            return Err(DbError::Conflict("username already taken".into()));
        }

        let now = Utc::now();
        let created = Account {
            id: new_id(),
            email: account.email,
            username: account.username,
            password_hash: account.password_hash,
            role: account.role,
            created_at: now,
        };
        match profile {
            Some(ProfileDraft::Candidate(p)) => {
                let candidate = Candidate {
                    id: new_id(),
                    account_id: created.id.clone(),
                    full_name: p.full_name,
                    phone: p.phone,
                    location: p.location,
                    experience: p.experience,
                    industry: p.industry,
                    description: p.description,
                    avatar: None,
                    cv: None,
                    created_at: now,
                };
                tables.candidates.insert(candidate.id.clone(), candidate);
            }
            Some(ProfileDraft::Employer(p)) => {
                let employer = Employer {
                    id: new_id(),
                    account_id: created.id.clone(),
                    name: p.name,
                    industry: p.industry,
                    location: p.location,
                    size: p.size,
                    description: p.description,
                    avatar: None,
                    created_at: now,
                };
                tables.employers.insert(employer.id.clone(), employer);
            }
            None => {}
        }
        tables.accounts.insert(created.id.clone(), created.clone());
        debug!("Created account {} ({})", created.id, created.role);
        Ok(created)
    }

    async fn find_account(&self, id: &str) -> DbResult<Option<Account>> {
        Ok(self.lock().accounts.get(id).cloned())
    }

    async fn find_account_by_login(&self, login: &str) -> DbResult<Option<Account>> {
        let login_lower = login.to_lowercase();
        Ok(self
            .lock()
            .accounts
            .values()
            .find(|a| a.email.to_lowercase() == login_lower || a.username == login)
            .cloned())
    }

    async fn list_accounts(&self, role: Option<Role>, page: PageRequest) -> DbResult<Page<Account>> {
        let rows: Vec<Account> = self
            .lock()
            .accounts
            .values()
            .filter(|a| role.is_none_or(|r| a.role == r))
            .cloned()
            .collect();
        Ok(page.slice(newest_first(rows, |a| (a.created_at, a.id.clone()))))
    }

    async fn delete_account(&self, id: &str) -> DbResult<()> {
        let mut tables = self.lock();
        if !tables.accounts.contains_key(id) {
            return Err(DbError::NotFound);
        }

        let candidate_ids: Vec<String> = tables
            .candidates
            .values()
            .filter(|c| c.account_id == id)
            .map(|c| c.id.clone())
            .collect();
        let employer_ids: Vec<String> = tables
            .employers
            .values()
            .filter(|e| e.account_id == id)
            .map(|e| e.id.clone())
            .collect();
        let job_ids: Vec<String> = tables
            .jobs
            .values()
            .filter(|j| employer_ids.contains(&j.employer_id))
            .map(|j| j.id.clone())
            .collect();

        if candidate_ids.iter().any(|c| tables.candidate_has_applications(c))
            || job_ids.iter().any(|j| tables.job_has_applications(j))
        {
            return Err(DbError::Conflict(
                "applications still reference this account's profile".into(),
            ));
        }

        for job_id in &job_ids {
            tables.jobs.remove(job_id);
        }
        for employer_id in &employer_ids {
            tables.employers.remove(employer_id);
        }
        for candidate_id in &candidate_ids {
            tables.candidates.remove(candidate_id);
        }
        tables.accounts.remove(id);
        debug!("Deleted account {}", id);
        Ok(())
    }
}

#[async_trait]
impl CandidateRepository for MemoryDatabase {
    async fn find_candidate(&self, id: &str) -> DbResult<Option<Candidate>> {
        Ok(self.lock().candidates.get(id).cloned())
    }

    async fn find_candidate_by_account(&self, account_id: &str) -> DbResult<Option<Candidate>> {
        Ok(self
            .lock()
            .candidates
            .values()
            .find(|c| c.account_id == account_id)
            .cloned())
    }

    async fn update_candidate(&self, id: &str, profile: CandidateProfile) -> DbResult<Candidate> {
        let mut tables = self.lock();
        let candidate = tables.candidates.get_mut(id).ok_or(DbError::NotFound)?;
        candidate.apply_profile(profile);
        Ok(candidate.clone())
    }

    async fn set_candidate_avatar(&self, id: &str, path: &str) -> DbResult<Candidate> {
        let mut tables = self.lock();
        let candidate = tables.candidates.get_mut(id).ok_or(DbError::NotFound)?;
        candidate.avatar = Some(path.to_string());
        Ok(candidate.clone())
    }

    async fn set_candidate_cv(&self, id: &str, path: &str) -> DbResult<Candidate> {
        let mut tables = self.lock();
        let candidate = tables.candidates.get_mut(id).ok_or(DbError::NotFound)?;
        candidate.cv = Some(path.to_string());
        Ok(candidate.clone())
    }
}

#[async_trait]
impl EmployerRepository for MemoryDatabase {
    async fn find_employer(&self, id: &str) -> DbResult<Option<Employer>> {
        Ok(self.lock().employers.get(id).cloned())
    }

    async fn find_employer_by_account(&self, account_id: &str) -> DbResult<Option<Employer>> {
        Ok(self
            .lock()
            .employers
            .values()
            .find(|e| e.account_id == account_id)
            .cloned())
    }

    async fn update_employer(&self, id: &str, profile: EmployerProfile) -> DbResult<Employer> {
        let mut tables = self.lock();
        let employer = tables.employers.get_mut(id).ok_or(DbError::NotFound)?;
        employer.apply_profile(profile);
        Ok(employer.clone())
    }

    async fn set_employer_avatar(&self, id: &str, path: &str) -> DbResult<Employer> {
        let mut tables = self.lock();
        let employer = tables.employers.get_mut(id).ok_or(DbError::NotFound)?;
        employer.avatar = Some(path.to_string());
        Ok(employer.clone())
    }

    async fn list_employers(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> DbResult<Page<Employer>> {
        let rows: Vec<Employer> = self
            .lock()
            .employers
            .values()
            .filter(|e| {
                search.is_none_or(|s| contains_ci(&e.name, s) || contains_ci(&e.location, s))
            })
            .cloned()
            .collect();
        Ok(page.slice(newest_first(rows, |e| (e.created_at, e.id.clone()))))
    }
}

#[async_trait]
impl JobRepository for MemoryDatabase {
    async fn create_job(&self, employer_id: &str, draft: JobDraft) -> DbResult<JobPosting> {
        let mut tables = self.lock();
        if !tables.employers.contains_key(employer_id) {
            return Err(DbError::Conflict("employer does not exist".into()));
        }
        let now = Utc::now();
        let job = JobPosting {
            id: new_id(),
            employer_id: employer_id.to_string(),
            title: draft.title,
            position: draft.position,
            description: draft.description,
            location: draft.location,
            salary_min: draft.salary_min,
            salary_max: draft.salary_max,
            experience: draft.experience,
            quantity: draft.quantity,
            industry: draft.industry,
            expires_at: draft.expires_at,
            lock_flg: 0,
            created_at: now,
            updated_at: now,
        };
        tables.jobs.insert(job.id.clone(), job.clone());
        debug!("Created job {} for employer {}", job.id, employer_id);
        Ok(job)
    }

    async fn find_job(&self, id: &str) -> DbResult<Option<JobPosting>> {
        Ok(self.lock().jobs.get(id).cloned())
    }

    async fn update_job(&self, id: &str, draft: JobDraft) -> DbResult<JobPosting> {
        let mut tables = self.lock();
        let job = tables.jobs.get_mut(id).ok_or(DbError::NotFound)?;
        job.apply_draft(draft);
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    async fn expire_job(&self, id: &str, at: DateTime<Utc>) -> DbResult<JobPosting> {
        let mut tables = self.lock();
        let job = tables.jobs.get_mut(id).ok_or(DbError::NotFound)?;
        job.expires_at = at;
        job.updated_at = at;
        Ok(job.clone())
    }

    async fn set_job_lock(&self, id: &str, lock_flg: i16) -> DbResult<JobPosting> {
        let mut tables = self.lock();
        let job = tables.jobs.get_mut(id).ok_or(DbError::NotFound)?;
        job.lock_flg = lock_flg;
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    async fn delete_job(&self, id: &str) -> DbResult<()> {
        let mut tables = self.lock();
        if !tables.jobs.contains_key(id) {
            return Err(DbError::NotFound);
        }
        if tables.job_has_applications(id) {
            return Err(DbError::Conflict("applications still reference this job".into()));
        }
        tables.jobs.remove(id);
        Ok(())
    }

    async fn list_jobs(
        &self,
        filter: &JobFilter,
        page: PageRequest,
        now: DateTime<Utc>,
    ) -> DbResult<Page<JobPosting>> {
        let rows: Vec<JobPosting> = self
            .lock()
            .jobs
            .values()
            .filter(|j| filter.matches(j, now))
            .cloned()
            .collect();
        Ok(page.slice(newest_first(rows, |j| (j.created_at, j.id.clone()))))
    }

    async fn purge_expired_jobs(&self, before: DateTime<Utc>) -> DbResult<PurgeReport> {
        let before = before.min(Utc::now());
        let mut tables = self.lock();
        let expired: Vec<String> = tables
            .jobs
            .values()
            .filter(|j| j.expires_at <= before)
            .map(|j| j.id.clone())
            .collect();

        let before_apps = tables.applications.len();
        tables
            .applications
            .retain(|(job_id, _), _| !expired.contains(job_id));
        let applications = (before_apps - tables.applications.len()) as u64;
        for id in &expired {
            tables.jobs.remove(id);
        }
        Ok(PurgeReport {
            jobs: expired.len() as u64,
            applications,
        })
    }
}

#[async_trait]
impl ApplyFormRepository for MemoryDatabase {
    async fn create_application(&self, form: NewApplyForm) -> DbResult<ApplyForm> {
        let mut tables = self.lock();
        if !tables.jobs.contains_key(&form.job_posting_id)
            || !tables.candidates.contains_key(&form.candidate_id)
        {
            return Err(DbError::Conflict("job or candidate does not exist".into()));
        }
        let key = (form.job_posting_id.clone(), form.candidate_id.clone());
        if tables.applications.contains_key(&key) {
            return Err(DbError::Conflict("candidate already applied to this job".into()));
        }
        let created = ApplyForm {
            job_posting_id: form.job_posting_id,
            candidate_id: form.candidate_id,
            cover_letter: form.cover_letter,
            cv: form.cv,
            status: ApplyStatus::NotReviewed,
            applied_at: Utc::now(),
            reviewed_at: None,
        };
        tables.applications.insert(key, created.clone());
        Ok(created)
    }

    async fn find_application(
        &self,
        job_id: &str,
        candidate_id: &str,
    ) -> DbResult<Option<ApplyForm>> {
        Ok(self
            .lock()
            .applications
            .get(&(job_id.to_string(), candidate_id.to_string()))
            .cloned())
    }

    async fn list_job_applications(
        &self,
        job_id: &str,
        status: Option<ApplyStatus>,
        page: PageRequest,
    ) -> DbResult<Page<ApplyForm>> {
        let rows: Vec<ApplyForm> = self
            .lock()
            .applications
            .values()
            .filter(|a| a.job_posting_id == job_id && status.is_none_or(|s| a.status == s))
            .cloned()
            .collect();
        Ok(page.slice(newest_first(rows, |a| (a.applied_at, a.candidate_id.clone()))))
    }

    async fn list_candidate_applications(
        &self,
        candidate_id: &str,
        page: PageRequest,
    ) -> DbResult<Page<ApplyForm>> {
        let rows: Vec<ApplyForm> = self
            .lock()
            .applications
            .values()
            .filter(|a| a.candidate_id == candidate_id)
            .cloned()
            .collect();
        Ok(page.slice(newest_first(rows, |a| (a.applied_at, a.job_posting_id.clone()))))
    }

    async fn set_application_status(
        &self,
        job_id: &str,
        candidate_id: &str,
        status: ApplyStatus,
        at: DateTime<Utc>,
    ) -> DbResult<ApplyForm> {
        let mut tables = self.lock();
        let form = tables
            .applications
            .get_mut(&(job_id.to_string(), candidate_id.to_string()))
            .ok_or(DbError::NotFound)?;
        form.status = status;
        form.reviewed_at = Some(at);
        Ok(form.clone())
    }

    async fn delete_application(&self, job_id: &str, candidate_id: &str) -> DbResult<()> {
        self.lock()
            .applications
            .remove(&(job_id.to_string(), candidate_id.to_string()))
            .map(|_| ())
            .ok_or(DbError::NotFound)
    }

    async fn application_counts(&self, job_id: &str) -> DbResult<ApplicationCounts> {
        let tables = self.lock();
        Ok(ApplicationCounts::tally(
            tables
                .applications
                .values()
                .filter(|a| a.job_posting_id == job_id),
        ))
    }
}

#[async_trait]
impl SampleCvRepository for MemoryDatabase {
    async fn create_sample_cv(&self, cv: NewSampleCv) -> DbResult<SampleCv> {
        let created = SampleCv {
            id: new_id(),
            title: cv.title,
            description: cv.description,
            file: cv.file,
            image: cv.image,
            created_at: Utc::now(),
        };
        self.lock().sample_cvs.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn list_sample_cvs(&self, page: PageRequest) -> DbResult<Page<SampleCv>> {
        let rows: Vec<SampleCv> = self.lock().sample_cvs.values().cloned().collect();
        Ok(page.slice(newest_first(rows, |s| (s.created_at, s.id.clone()))))
    }

    async fn delete_sample_cv(&self, id: &str) -> DbResult<()> {
        self.lock()
            .sample_cvs
            .remove(id)
            .map(|_| ())
            .ok_or(DbError::NotFound)
    }
}

#[async_trait]
impl ContactRepository for MemoryDatabase {
    async fn create_contact(&self, contact: NewContact) -> DbResult<Contact> {
        let created = Contact {
            id: new_id(),
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            subject: contact.subject,
            message: contact.message,
            created_at: Utc::now(),
        };
        self.lock().contacts.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn list_contacts(&self, page: PageRequest) -> DbResult<Page<Contact>> {
        let rows: Vec<Contact> = self.lock().contacts.values().cloned().collect();
        Ok(page.slice(newest_first(rows, |c| (c.created_at, c.id.clone()))))
    }
}

#[async_trait]
impl PolicyRepository for MemoryDatabase {
    async fn create_policy(&self, policy: NewPolicy) -> DbResult<Policy> {
        let now = Utc::now();
        let created = Policy {
            id: new_id(),
            title: policy.title,
            content: policy.content,
            created_at: now,
            updated_at: now,
        };
        self.lock().policies.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn find_policy(&self, id: &str) -> DbResult<Option<Policy>> {
        Ok(self.lock().policies.get(id).cloned())
    }

    async fn list_policies(&self, page: PageRequest) -> DbResult<Page<Policy>> {
        let rows: Vec<Policy> = self.lock().policies.values().cloned().collect();
        Ok(page.slice(newest_first(rows, |p| (p.created_at, p.id.clone()))))
    }

    async fn update_policy(&self, id: &str, policy: NewPolicy) -> DbResult<Policy> {
        let mut tables = self.lock();
        let existing = tables.policies.get_mut(id).ok_or(DbError::NotFound)?;
        existing.title = policy.title;
        existing.content = policy.content;
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete_policy(&self, id: &str) -> DbResult<()> {
        self.lock()
            .policies
            .remove(id)
            .map(|_| ())
            .ok_or(DbError::NotFound)
    }
}
