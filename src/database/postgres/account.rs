use async_trait::async_trait;
use chrono::Utc;

use super::{PgDatabase, page_of};
use crate::database::{AccountRepository, DbError, DbResult, new_id};
use crate::models::{Account, NewAccount, Page, PageRequest, ProfileDraft, Role};

const ACCOUNT_COLUMNS: &str = "id, email, username, password_hash, role, created_at";

#[async_trait]
impl AccountRepository for PgDatabase {
    async fn create_account(
        &self,
        account: NewAccount,
        profile: Option<ProfileDraft>,
    ) -> DbResult<Account> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Account>(&format!(
            "INSERT INTO accounts (id, email, username, password_hash, role, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(new_id())
        .bind(&account.email)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.role)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        match profile {
            Some(ProfileDraft::Candidate(p)) => {
                sqlx::query(
                    "INSERT INTO candidates
                        (id, account_id, full_name, phone, location, experience, industry,
                         description, created_at)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
                )
                .bind(new_id())
                .bind(&created.id)
                .bind(p.full_name)
                .bind(p.phone)
                .bind(p.location)
                .bind(p.experience)
                .bind(p.industry)
                .bind(p.description)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
            Some(ProfileDraft::Employer(p)) => {
                sqlx::query(
                    "INSERT INTO employers
                        (id, account_id, name, industry, location, size, description, created_at)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
                )
                .bind(new_id())
                .bind(&created.id)
                .bind(p.name)
                .bind(p.industry)
                .bind(p.location)
                .bind(p.size)
                .bind(p.description)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
            None => {}
        }

        tx.commit().await?;
        tracing::debug!("Created account {} ({})", created.id, created.role);
        Ok(created)
    }

    async fn find_account(&self, id: &str) -> DbResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn find_account_by_login(&self, login: &str) -> DbResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts
             WHERE LOWER(email) = LOWER($1) OR username = $1
             LIMIT 1"
        ))
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn list_accounts(&self, role: Option<Role>, page: PageRequest) -> DbResult<Page<Account>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM accounts WHERE ($1::SMALLINT IS NULL OR role = $1)",
        )
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts
             WHERE ($1::SMALLINT IS NULL OR role = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(role)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(page_of(items, page, total))
    }

    async fn delete_account(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        tracing::debug!("Deleted account {}", id);
        Ok(())
    }
}
