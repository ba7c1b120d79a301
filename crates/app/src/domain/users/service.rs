//! Users service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::password::hash_password,
    database::Db,
    domain::{
        pagination::{Page, Pagination},
        users::{
            data::{NewUser, NewUserRow},
            errors::UsersServiceError,
            records::{Role, UserRecord, UserUuid},
            repository::PgUsersRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        let password_hash = hash_password(&user.password).await?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_user(
                &mut tx,
                NewUserRow {
                    uuid: user.uuid,
                    name: user.name,
                    email: user.email,
                    password_hash,
                    role: user.role,
                },
            )
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn list_users(
        &self,
        pagination: Pagination,
    ) -> Result<Page<UserRecord>, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let users = self.repository.list_users(&mut tx, pagination).await?;
        let total = self.repository.count_users(&mut tx).await?;

        tx.commit().await?;

        Ok(Page::new(users, total, pagination))
    }

    async fn update_role(
        &self,
        user: UserUuid,
        role: Role,
    ) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self.repository.update_role(&mut tx, user, role).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_user(&self, actor: UserUuid, user: UserUuid) -> Result<(), UsersServiceError> {
        if actor == user {
            return Err(UsersServiceError::CannotDeleteSelf);
        }

        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_user(&mut tx, user).await?;

        if rows_affected == 0 {
            return Err(UsersServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Creates a user, hashing the supplied plaintext password.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// Retrieve a single user.
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    /// Lists users, newest first.
    async fn list_users(&self, pagination: Pagination)
    -> Result<Page<UserRecord>, UsersServiceError>;

    /// Changes a user's role.
    async fn update_role(&self, user: UserUuid, role: Role)
    -> Result<UserRecord, UsersServiceError>;

    /// Deletes `user` on behalf of `actor`. Accounts cannot delete themselves.
    async fn delete_user(&self, actor: UserUuid, user: UserUuid) -> Result<(), UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        auth::password::verify_password,
        domain::users::repository::PgUsersRepository,
        test::{TestContext, helpers::new_user},
    };

    use super::*;

    #[tokio::test]
    async fn create_user_defaults_and_hashes_password() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx
            .users
            .create_user(new_user("ada@example.com", Role::User))
            .await?;

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.role, Role::User);

        let mut tx = ctx.db.begin_test_transaction().await;
        let credentials = PgUsersRepository::new()
            .find_credentials_by_email(&mut tx, "ada@example.com")
            .await?
            .ok_or("credentials should exist")?;

        assert_ne!(credentials.password_hash, "Secret123");
        assert!(verify_password("Secret123", &credentials.password_hash).await?);

        Ok(())
    }

    #[tokio::test]
    async fn create_user_duplicate_email_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users
            .create_user(new_user("dup@example.com", Role::User))
            .await?;

        let result = ctx
            .users
            .create_user(new_user("dup@example.com", Role::User))
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn email_uniqueness_is_case_sensitive() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users
            .create_user(new_user("case@example.com", Role::User))
            .await?;

        ctx.users
            .create_user(new_user("Case@example.com", Role::User))
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn list_users_returns_newest_first_with_totals() -> TestResult {
        let ctx = TestContext::new().await;

        for index in 0..3 {
            ctx.users
                .create_user(new_user(&format!("user{index}@example.com"), Role::User))
                .await?;
        }

        let page = ctx.users.list_users(Pagination::new(1, 2)).await?;

        assert_eq!(page.total, 3);
        assert_eq!(page.pages, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].email, "user2@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn update_role_promotes_user() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx
            .users
            .create_user(new_user("promote@example.com", Role::User))
            .await?;

        let updated = ctx.users.update_role(user.uuid, Role::Admin).await?;

        assert_eq!(updated.role, Role::Admin);

        Ok(())
    }

    #[tokio::test]
    async fn update_role_unknown_user_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.users.update_role(UserUuid::new(), Role::Admin).await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn delete_user_rejects_self_deletion() -> TestResult {
        let ctx = TestContext::new().await;

        let admin = ctx
            .users
            .create_user(new_user("self@example.com", Role::Admin))
            .await?;

        let result = ctx.users.delete_user(admin.uuid, admin.uuid).await;

        assert!(
            matches!(result, Err(UsersServiceError::CannotDeleteSelf)),
            "expected CannotDeleteSelf, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_user_makes_it_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let admin = ctx
            .users
            .create_user(new_user("admin@example.com", Role::Admin))
            .await?;

        let user = ctx
            .users
            .create_user(new_user("gone@example.com", Role::User))
            .await?;

        ctx.users.delete_user(admin.uuid, user.uuid).await?;

        let result = ctx.users.get_user(user.uuid).await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound after deletion, got {result:?}"
        );

        Ok(())
    }
}
