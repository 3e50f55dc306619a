use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{PgDatabase, page_of};
use crate::database::{ApplyFormRepository, DbError, DbResult};
use crate::models::{
    ApplicationCounts, ApplyForm, ApplyStatus, NewApplyForm, Page, PageRequest,
};

const APPLY_COLUMNS: &str =
    "job_posting_id, candidate_id, cover_letter, cv, status, applied_at, reviewed_at";

#[async_trait]
impl ApplyFormRepository for PgDatabase {
    async fn create_application(&self, form: NewApplyForm) -> DbResult<ApplyForm> {
        let created = sqlx::query_as::<_, ApplyForm>(&format!(
            "INSERT INTO apply_forms (job_posting_id, candidate_id, cover_letter, cv, status, applied_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {APPLY_COLUMNS}"
        ))
        .bind(form.job_posting_id)
        .bind(form.candidate_id)
        .bind(form.cover_letter)
        .bind(form.cv)
        .bind(ApplyStatus::NotReviewed)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_application(
        &self,
        job_id: &str,
        candidate_id: &str,
    ) -> DbResult<Option<ApplyForm>> {
        let form = sqlx::query_as::<_, ApplyForm>(&format!(
            "SELECT {APPLY_COLUMNS} FROM apply_forms
             WHERE job_posting_id = $1 AND candidate_id = $2"
        ))
        .bind(job_id)
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(form)
    }

    async fn list_job_applications(
        &self,
        job_id: &str,
        status: Option<ApplyStatus>,
        page: PageRequest,
    ) -> DbResult<Page<ApplyForm>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM apply_forms
             WHERE job_posting_id = $1 AND ($2::SMALLINT IS NULL OR status = $2)",
        )
        .bind(job_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, ApplyForm>(&format!(
            "SELECT {APPLY_COLUMNS} FROM apply_forms
             WHERE job_posting_id = $1 AND ($2::SMALLINT IS NULL OR status = $2)
             ORDER BY applied_at DESC, candidate_id DESC
             LIMIT $3 OFFSET $4"
        ))
        .bind(job_id)
        .bind(status)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(page_of(items, page, total))
    }

    async fn list_candidate_applications(
        &self,
        candidate_id: &str,
        page: PageRequest,
    ) -> DbResult<Page<ApplyForm>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM apply_forms WHERE candidate_id = $1")
                .bind(candidate_id)
                .fetch_one(&self.pool)
                .await?;

        let items = sqlx::query_as::<_, ApplyForm>(&format!(
            "SELECT {APPLY_COLUMNS} FROM apply_forms
             WHERE candidate_id = $1
             ORDER BY applied_at DESC, job_posting_id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(candidate_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(page_of(items, page, total))
    }

    async fn set_application_status(
        &self,
        job_id: &str,
        candidate_id: &str,
        status: ApplyStatus,
        at: DateTime<Utc>,
    ) -> DbResult<ApplyForm> {
        let form = sqlx::query_as::<_, ApplyForm>(&format!(
            "UPDATE apply_forms SET status = $3, reviewed_at = $4
             WHERE job_posting_id = $1 AND candidate_id = $2
             RETURNING {APPLY_COLUMNS}"
        ))
        .bind(job_id)
        .bind(candidate_id)
        .bind(status)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;
        Ok(form)
    }

    async fn delete_application(&self, job_id: &str, candidate_id: &str) -> DbResult<()> {
        let result =
            sqlx::query("DELETE FROM apply_forms WHERE job_posting_id = $1 AND candidate_id = $2")
                .bind(job_id)
                .bind(candidate_id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn application_counts(&self, job_id: &str) -> DbResult<ApplicationCounts> {
        let counts = sqlx::query_as::<_, ApplicationCounts>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE status = 0) AS not_reviewed,
                    COUNT(*) FILTER (WHERE status = 1) AS suitable,
                    COUNT(*) FILTER (WHERE status = 2) AS not_suitable
             FROM apply_forms
             WHERE job_posting_id = $1",
        )
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }
}
