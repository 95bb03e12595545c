use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::Identifier;
use crate::account::models::LoginOutcome;
use crate::account::models::RegisterAccountCommand;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account with validated fields.
    ///
    /// # Errors
    /// * `IdentifierTaken` - Identifier is already registered
    /// * `EmailTaken` - Email is already registered
    /// * `Password` - Credential derivation failed
    /// * `DatabaseError` - Storage operation failed
    async fn register(&self, command: RegisterAccountCommand) -> Result<Account, AccountError>;

    /// Authenticate by identifier or email plus password, issuing a
    /// bearer token on success.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown identifier or wrong password,
    ///   deliberately indistinguishable
    /// * `Password` / `Token` - Stored record unusable or signing failed
    /// * `DatabaseError` - Storage operation failed
    async fn login(
        &self,
        identifier_or_email: &str,
        password: &str,
    ) -> Result<LoginOutcome, AccountError>;

    /// Retrieve an account by its identifier.
    ///
    /// # Errors
    /// * `NotFound` - No account with this identifier
    /// * `DatabaseError` - Storage operation failed
    async fn get_account(&self, identifier: &Identifier) -> Result<Account, AccountError>;
}

/// Persistence operations for the account aggregate.
///
/// The service treats storage as a lookup/update collaborator; the
/// implementation owns its own concurrency discipline.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Look up an account by identifier or email address.
    ///
    /// # Returns
    /// Optional account (None if no row matches)
    ///
    /// # Errors
    /// * `DatabaseError` - Storage operation failed
    async fn find_by_identifier_or_email(
        &self,
        needle: &str,
    ) -> Result<Option<Account>, AccountError>;

    /// Whether an account with this identifier exists.
    ///
    /// # Errors
    /// * `DatabaseError` - Storage operation failed
    async fn identifier_exists(&self, identifier: &Identifier) -> Result<bool, AccountError>;

    /// Whether an account with this email exists.
    ///
    /// # Errors
    /// * `DatabaseError` - Storage operation failed
    async fn email_exists(&self, email: &str) -> Result<bool, AccountError>;

    /// Persist a new account.
    ///
    /// # Errors
    /// * `IdentifierTaken` / `EmailTaken` - Uniqueness violated by a
    ///   concurrent registration
    /// * `DatabaseError` - Storage operation failed
    async fn insert(&self, account: Account) -> Result<Account, AccountError>;

    /// Record a successful login on the account row.
    ///
    /// # Errors
    /// * `DatabaseError` - Storage operation failed
    async fn touch_updated_at(
        &self,
        identifier: &Identifier,
        now: DateTime<Utc>,
    ) -> Result<(), AccountError>;
}
