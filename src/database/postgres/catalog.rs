use async_trait::async_trait;
use chrono::Utc;

use super::{PgDatabase, page_of};
use crate::database::{
    ContactRepository, DbError, DbResult, PolicyRepository, SampleCvRepository, new_id,
};
use crate::models::{
    Contact, NewContact, NewPolicy, NewSampleCv, Page, PageRequest, Policy, SampleCv,
};

async fn count(db: &PgDatabase, table: &str) -> DbResult<i64> {
    let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(&db.pool)
        .await?;
    Ok(total)
}

async fn delete_by_id(db: &PgDatabase, table: &str, id: &str) -> DbResult<()> {
    let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
        .bind(id)
        .execute(&db.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

#[async_trait]
impl SampleCvRepository for PgDatabase {
    async fn create_sample_cv(&self, cv: NewSampleCv) -> DbResult<SampleCv> {
        let created = sqlx::query_as::<_, SampleCv>(
            "INSERT INTO sample_cvs (id, title, description, file, image, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, title, description, file, image, created_at",
        )
        .bind(new_id())
        .bind(cv.title)
        .bind(cv.description)
        .bind(cv.file)
        .bind(cv.image)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_sample_cvs(&self, page: PageRequest) -> DbResult<Page<SampleCv>> {
        let total = count(self, "sample_cvs").await?;
        let items = sqlx::query_as::<_, SampleCv>(
            "SELECT id, title, description, file, image, created_at FROM sample_cvs
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(page_of(items, page, total))
    }

    async fn delete_sample_cv(&self, id: &str) -> DbResult<()> {
        delete_by_id(self, "sample_cvs", id).await
    }
}

#[async_trait]
impl ContactRepository for PgDatabase {
    async fn create_contact(&self, contact: NewContact) -> DbResult<Contact> {
        let created = sqlx::query_as::<_, Contact>(
            "INSERT INTO contacts (id, name, email, phone, subject, message, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, name, email, phone, subject, message, created_at",
        )
        .bind(new_id())
        .bind(contact.name)
        .bind(contact.email)
        .bind(contact.phone)
        .bind(contact.subject)
        .bind(contact.message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_contacts(&self, page: PageRequest) -> DbResult<Page<Contact>> {
        let total = count(self, "contacts").await?;
        let items = sqlx::query_as::<_, Contact>(
            "SELECT id, name, email, phone, subject, message, created_at FROM contacts
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(page_of(items, page, total))
    }
}

#[async_trait]
impl PolicyRepository for PgDatabase {
    async fn create_policy(&self, policy: NewPolicy) -> DbResult<Policy> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, Policy>(
            "INSERT INTO policies (id, title, content, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING id, title, content, created_at, updated_at",
        )
        .bind(new_id())
        .bind(policy.title)
        .bind(policy.content)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_policy(&self, id: &str) -> DbResult<Option<Policy>> {
        let policy = sqlx::query_as::<_, Policy>(
            "SELECT id, title, content, created_at, updated_at FROM policies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(policy)
    }

    async fn list_policies(&self, page: PageRequest) -> DbResult<Page<Policy>> {
        let total = count(self, "policies").await?;
        let items = sqlx::query_as::<_, Policy>(
            "SELECT id, title, content, created_at, updated_at FROM policies
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(page_of(items, page, total))
    }

    async fn update_policy(&self, id: &str, policy: NewPolicy) -> DbResult<Policy> {
        let updated = sqlx::query_as::<_, Policy>(
            "UPDATE policies SET title = $2, content = $3, updated_at = $4
             WHERE id = $1
             RETURNING id, title, content, created_at, updated_at",
        )
        .bind(id)
        .bind(policy.title)
        .bind(policy.content)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete_policy(&self, id: &str) -> DbResult<()> {
        delete_by_id(self, "policies", id).await
    }
}
