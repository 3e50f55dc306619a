use async_trait::async_trait;

use super::{PgDatabase, like_pattern, page_of};
use crate::database::{CandidateRepository, DbResult, EmployerRepository};
use crate::models::{Candidate, CandidateProfile, Employer, EmployerProfile, Page, PageRequest};

const CANDIDATE_COLUMNS: &str = "id, account_id, full_name, phone, location, experience, \
                                 industry, description, avatar, cv, created_at";
const EMPLOYER_COLUMNS: &str =
    "id, account_id, name, industry, location, size, description, avatar, created_at";

#[async_trait]
impl CandidateRepository for PgDatabase {
    async fn find_candidate(&self, id: &str) -> DbResult<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(candidate)
    }

    async fn find_candidate_by_account(&self, account_id: &str) -> DbResult<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE account_id = $1"
        ))
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(candidate)
    }

    async fn update_candidate(&self, id: &str, profile: CandidateProfile) -> DbResult<Candidate> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            "UPDATE candidates
             SET full_name = $2, phone = $3, location = $4, experience = $5,
                 industry = $6, description = $7
             WHERE id = $1
             RETURNING {CANDIDATE_COLUMNS}"
        ))
        .bind(id)
        .bind(profile.full_name)
        .bind(profile.phone)
        .bind(profile.location)
        .bind(profile.experience)
        .bind(profile.industry)
        .bind(profile.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(candidate)
    }

    async fn set_candidate_avatar(&self, id: &str, path: &str) -> DbResult<Candidate> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            "UPDATE candidates SET avatar = $2 WHERE id = $1 RETURNING {CANDIDATE_COLUMNS}"
        ))
        .bind(id)
        .bind(path)
        .fetch_one(&self.pool)
        .await?;
        Ok(candidate)
    }

    async fn set_candidate_cv(&self, id: &str, path: &str) -> DbResult<Candidate> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            "UPDATE candidates SET cv = $2 WHERE id = $1 RETURNING {CANDIDATE_COLUMNS}"
        ))
        .bind(id)
        .bind(path)
        .fetch_one(&self.pool)
        .await?;
        Ok(candidate)
    }
}

#[async_trait]
impl EmployerRepository for PgDatabase {
    async fn find_employer(&self, id: &str) -> DbResult<Option<Employer>> {
        let employer = sqlx::query_as::<_, Employer>(&format!(
            "SELECT {EMPLOYER_COLUMNS} FROM employers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employer)
    }

    async fn find_employer_by_account(&self, account_id: &str) -> DbResult<Option<Employer>> {
        let employer = sqlx::query_as::<_, Employer>(&format!(
            "SELECT {EMPLOYER_COLUMNS} FROM employers WHERE account_id = $1"
        ))
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employer)
    }

    async fn update_employer(&self, id: &str, profile: EmployerProfile) -> DbResult<Employer> {
        let employer = sqlx::query_as::<_, Employer>(&format!(
            "UPDATE employers
             SET name = $2, industry = $3, location = $4, size = $5, description = $6
             WHERE id = $1
             RETURNING {EMPLOYER_COLUMNS}"
        ))
        .bind(id)
        .bind(profile.name)
        .bind(profile.industry)
        .bind(profile.location)
        .bind(profile.size)
        .bind(profile.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(employer)
    }

    async fn set_employer_avatar(&self, id: &str, path: &str) -> DbResult<Employer> {
        let employer = sqlx::query_as::<_, Employer>(&format!(
            "UPDATE employers SET avatar = $2 WHERE id = $1 RETURNING {EMPLOYER_COLUMNS}"
        ))
        .bind(id)
        .bind(path)
        .fetch_one(&self.pool)
        .await?;
        Ok(employer)
    }

    async fn list_employers(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> DbResult<Page<Employer>> {
        let pattern = search.map(like_pattern);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM employers
             WHERE ($1::TEXT IS NULL OR name ILIKE $1 OR location ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, Employer>(&format!(
            "SELECT {EMPLOYER_COLUMNS} FROM employers
             WHERE ($1::TEXT IS NULL OR name ILIKE $1 OR location ILIKE $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(page_of(items, page, total))
    }
}
