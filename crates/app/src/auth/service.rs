//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::Error as SqlxError;
use tracing::info;

use crate::{
    auth::{
        AuthServiceError,
        password::{hash_password, verify_password, verify_unknown_account},
        token::TokenSigner,
    },
    database::Db,
    domain::users::{
        data::NewUserRow,
        records::{Role, UserRecord, UserUuid},
        repository::PgUsersRepository,
    },
};

/// Self-service sign-up payload. Registrations always receive the `User` role.
#[derive(Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for NewRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewRegistration")
            .field("uuid", &self.uuid)
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// An authenticated user together with a freshly issued identity token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: UserRecord,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    users: PgUsersRepository,
    signer: TokenSigner,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db, signer: TokenSigner) -> Self {
        Self {
            db,
            users: PgUsersRepository::new(),
            signer,
        }
    }

    fn session(&self, user: UserRecord) -> Result<AuthSession, AuthServiceError> {
        let token = self.signer.issue(&user).map_err(AuthServiceError::Token)?;

        Ok(AuthSession { user, token })
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn register(
        &self,
        registration: NewRegistration,
    ) -> Result<AuthSession, AuthServiceError> {
        let password_hash = hash_password(&registration.password).await?;

        let mut tx = self.db.begin().await?;

        let user = self
            .users
            .create_user(
                &mut tx,
                NewUserRow {
                    uuid: registration.uuid,
                    name: registration.name,
                    email: registration.email,
                    password_hash,
                    role: Role::User,
                },
            )
            .await?;

        tx.commit().await?;

        info!(user = %user.uuid, "user registered");

        self.session(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let credentials = self.users.find_credentials_by_email(&mut tx, email).await?;

        tx.commit().await?;

        let Some(credentials) = credentials else {
            verify_unknown_account(password).await?;

            return Err(AuthServiceError::InvalidCredentials);
        };

        if !verify_password(password, &credentials.password_hash).await? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        self.session(credentials.user)
    }

    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<UserRecord, AuthServiceError> {
        let claims = self
            .signer
            .verify(bearer_token)
            .map_err(AuthServiceError::InvalidToken)?;

        let mut tx = self.db.begin().await?;

        let user = match self.users.get_user(&mut tx, claims.user_uuid()).await {
            Ok(user) => user,
            Err(SqlxError::RowNotFound) => return Err(AuthServiceError::UnknownIdentity),
            Err(error) => return Err(error.into()),
        };

        tx.commit().await?;

        Ok(user)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a `User`-role account and sign it in.
    async fn register(&self, registration: NewRegistration)
    -> Result<AuthSession, AuthServiceError>;

    /// Exchange an email and password for an identity token.
    ///
    /// Unknown emails and wrong passwords fail identically.
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthServiceError>;

    /// Verify a bearer token and load the identity it names.
    async fn authenticate_bearer(&self, bearer_token: &str)
    -> Result<UserRecord, AuthServiceError>;
}
