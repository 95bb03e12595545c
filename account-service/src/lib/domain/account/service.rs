use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::Identifier;
use crate::account::models::LoginOutcome;
use crate::account::models::RegisterAccountCommand;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;

/// Domain service implementation for account operations.
///
/// Orchestrates the storage collaborator and the authentication library;
/// holds no mutable state of its own.
pub struct AccountService<R>
where
    R: AccountRepository,
{
    repository: Arc<R>,
    authenticator: Arc<Authenticator>,
}

impl<R> AccountService<R>
where
    R: AccountRepository,
{
    /// Create a new account service with injected dependencies.
    pub fn new(repository: Arc<R>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<R> AccountServicePort for AccountService<R>
where
    R: AccountRepository,
{
    async fn register(&self, command: RegisterAccountCommand) -> Result<Account, AccountError> {
        if self
            .repository
            .identifier_exists(&command.identifier)
            .await?
        {
            return Err(AccountError::IdentifierTaken(
                command.identifier.to_string(),
            ));
        }

        if self.repository.email_exists(command.email.as_str()).await? {
            return Err(AccountError::EmailTaken(command.email.as_str().to_string()));
        }

        let password_hash = self.authenticator.hash_password(&command.password)?;

        let now = Utc::now();
        let account = Account {
            identifier: command.identifier,
            email: command.email,
            display_name: command.display_name,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        self.repository.insert(account).await
    }

    async fn login(
        &self,
        identifier_or_email: &str,
        password: &str,
    ) -> Result<LoginOutcome, AccountError> {
        // An unknown identifier takes the same path as a wrong password:
        // the caller only ever sees InvalidCredentials.
        let account = match self
            .repository
            .find_by_identifier_or_email(identifier_or_email)
            .await?
        {
            Some(account) => account,
            None => return Err(AccountError::InvalidCredentials),
        };

        let matched = self
            .authenticator
            .verify_password(password, &account.password_hash)?;
        if !matched {
            return Err(AccountError::InvalidCredentials);
        }

        self.repository
            .touch_updated_at(&account.identifier, Utc::now())
            .await?;

        let token = self.authenticator.issue_token(account.identifier.as_str())?;

        Ok(LoginOutcome {
            identifier: account.identifier,
            token,
        })
    }

    async fn get_account(&self, identifier: &Identifier) -> Result<Account, AccountError> {
        self.repository
            .find_by_identifier_or_email(identifier.as_str())
            .await?
            .ok_or_else(|| AccountError::NotFound(identifier.to_string()))
    }
}
