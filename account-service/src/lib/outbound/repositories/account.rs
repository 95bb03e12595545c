use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::EmailAddress;
use crate::account::models::Identifier;
use crate::account::ports::AccountRepository;

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn account_from_row(row: &PgRow) -> Result<Account, AccountError> {
    let identifier: String = row
        .try_get("identifier")
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;
    let email: String = row
        .try_get("email")
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;
    let display_name: String = row
        .try_get("display_name")
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;
    let password_hash: String = row
        .try_get("password_hash")
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

    Ok(Account {
        identifier: Identifier::new(&identifier)?,
        email: EmailAddress::new(email)?,
        display_name,
        password_hash,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_by_identifier_or_email(
        &self,
        needle: &str,
    ) -> Result<Option<Account>, AccountError> {
        // Identifiers are stored lowercase; emails are matched exactly.
        let row = sqlx::query(
            r#"
            SELECT identifier, email, display_name, password_hash, created_at, updated_at
            FROM accounts
            WHERE identifier = $1 OR email = $2
            "#,
        )
        .bind(needle.to_ascii_lowercase())
        .bind(needle)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(account_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn identifier_exists(&self, identifier: &Identifier) -> Result<bool, AccountError> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (SELECT 1 FROM accounts WHERE identifier = $1)
            "#,
        )
        .bind(identifier.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AccountError> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (SELECT 1 FROM accounts WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))
    }

    async fn insert(&self, account: Account) -> Result<Account, AccountError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (identifier, email, display_name, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(account.identifier.as_str())
        .bind(account.email.as_str())
        .bind(&account.display_name)
        .bind(&account.password_hash)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // A registration that raced another one past the uniqueness
            // checks still surfaces as a conflict, not a 500.
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("accounts_pkey") {
                        return AccountError::IdentifierTaken(
                            account.identifier.as_str().to_string(),
                        );
                    }
                    if db_err.constraint() == Some("accounts_email_key") {
                        return AccountError::EmailTaken(account.email.as_str().to_string());
                    }
                }
            }
            AccountError::DatabaseError(e.to_string())
        })?;

        Ok(account)
    }

    async fn touch_updated_at(
        &self,
        identifier: &Identifier,
        now: DateTime<Utc>,
    ) -> Result<(), AccountError> {
        sqlx::query(
            r#"
            UPDATE accounts SET updated_at = $2 WHERE identifier = $1
            "#,
        )
        .bind(identifier.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
