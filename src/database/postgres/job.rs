use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use super::{PgDatabase, like_pattern, page_of, push_page};
use crate::database::{DbError, DbResult, JobRepository, new_id};
use crate::models::{JobDraft, JobFilter, JobPosting, JobStatus, Page, PageRequest, PurgeReport};

const JOB_COLUMNS: &str = "id, employer_id, title, position, description, location, salary_min, \
                           salary_max, experience, quantity, industry, expires_at, lock_flg, \
                           created_at, updated_at";

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &JobFilter, now: DateTime<Utc>) {
    qb.push(" WHERE TRUE");
    if let Some(employer_id) = &filter.employer_id {
        qb.push(" AND employer_id = ").push_bind(employer_id.clone());
    }
    match filter.status {
        Some(JobStatus::Open) => {
            qb.push(" AND lock_flg = 0 AND expires_at > ").push_bind(now);
        }
        Some(JobStatus::Expired) => {
            qb.push(" AND lock_flg = 0 AND expires_at <= ").push_bind(now);
        }
        Some(JobStatus::Locked) => {
            qb.push(" AND lock_flg <> 0");
        }
        None => {}
    }
    if let Some(lock_flg) = filter.lock_flg {
        qb.push(" AND lock_flg = ").push_bind(lock_flg);
    }
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR location ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(location) = &filter.location {
        qb.push(" AND location ILIKE ").push_bind(like_pattern(location));
    }
    if let Some(industry) = &filter.industry {
        qb.push(" AND industry ILIKE ").push_bind(like_pattern(industry));
    }
}

#[async_trait]
impl JobRepository for PgDatabase {
    async fn create_job(&self, employer_id: &str, draft: JobDraft) -> DbResult<JobPosting> {
        let now = Utc::now();
        let job = sqlx::query_as::<_, JobPosting>(&format!(
            "INSERT INTO job_postings
                (id, employer_id, title, position, description, location, salary_min,
                 salary_max, experience, quantity, industry, expires_at, lock_flg,
                 created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 0, $13, $13)
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(new_id())
        .bind(employer_id)
        .bind(draft.title)
        .bind(draft.position)
        .bind(draft.description)
        .bind(draft.location)
        .bind(draft.salary_min)
        .bind(draft.salary_max)
        .bind(draft.experience)
        .bind(draft.quantity)
        .bind(draft.industry)
        .bind(draft.expires_at)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        tracing::debug!("Created job {} for employer {}", job.id, employer_id);
        Ok(job)
    }

    async fn find_job(&self, id: &str) -> DbResult<Option<JobPosting>> {
        let job = sqlx::query_as::<_, JobPosting>(&format!(
            "SELECT {JOB_COLUMNS} FROM job_postings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    async fn update_job(&self, id: &str, draft: JobDraft) -> DbResult<JobPosting> {
        let job = sqlx::query_as::<_, JobPosting>(&format!(
            "UPDATE job_postings
             SET title = $2, position = $3, description = $4, location = $5,
                 salary_min = $6, salary_max = $7, experience = $8, quantity = $9,
                 industry = $10, expires_at = $11, updated_at = $12
             WHERE id = $1
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(id)
        .bind(draft.title)
        .bind(draft.position)
        .bind(draft.description)
        .bind(draft.location)
        .bind(draft.salary_min)
        .bind(draft.salary_max)
        .bind(draft.experience)
        .bind(draft.quantity)
        .bind(draft.industry)
        .bind(draft.expires_at)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(job)
    }

    async fn expire_job(&self, id: &str, at: DateTime<Utc>) -> DbResult<JobPosting> {
        let job = sqlx::query_as::<_, JobPosting>(&format!(
            "UPDATE job_postings SET expires_at = $2, updated_at = $2
             WHERE id = $1
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(id)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;
        Ok(job)
    }

    async fn set_job_lock(&self, id: &str, lock_flg: i16) -> DbResult<JobPosting> {
        let job = sqlx::query_as::<_, JobPosting>(&format!(
            "UPDATE job_postings SET lock_flg = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(id)
        .bind(lock_flg)
        .fetch_one(&self.pool)
        .await?;
        Ok(job)
    }

    async fn delete_job(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM job_postings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn list_jobs(
        &self,
        filter: &JobFilter,
        page: PageRequest,
        now: DateTime<Utc>,
    ) -> DbResult<Page<JobPosting>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM job_postings");
        push_filter(&mut count, filter, now);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {JOB_COLUMNS} FROM job_postings"));
        push_filter(&mut select, filter, now);
        select.push(" ORDER BY created_at DESC, id DESC");
        push_page(&mut select, page);
        let items = select
            .build_query_as::<JobPosting>()
            .fetch_all(&self.pool)
            .await?;

        Ok(page_of(items, page, total))
    }

    async fn purge_expired_jobs(&self, before: DateTime<Utc>) -> DbResult<PurgeReport> {
        let mut tx = self.pool.begin().await?;

        let applications = sqlx::query(
            "DELETE FROM apply_forms
             WHERE job_posting_id IN
                (SELECT id FROM job_postings WHERE expires_at <= LEAST($1, NOW()))",
        )
        .bind(before)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let jobs =
            sqlx::query("DELETE FROM job_postings WHERE expires_at <= LEAST($1, NOW())")
                .bind(before)
                .execute(&mut *tx)
                .await?
                .rows_affected();

        tx.commit().await?;
        tracing::info!("Purged {} expired jobs and {} applications", jobs, applications);
        Ok(PurgeReport { jobs, applications })
    }
}
