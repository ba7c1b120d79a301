//! App Context

use std::sync::Arc;

use jiff::SignedDuration;
use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService, SigningSecret, TokenSigner},
    database::{self, Db},
    domain::{
        categories::{CategoriesService, PgCategoriesService},
        dashboard::{DashboardService, PgDashboardService},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        users::{PgUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),

    #[error("signing secret must not be empty")]
    EmptySigningSecret,
}

/// Settings needed to assemble the application services.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub max_connections: u32,
    pub run_migrations: bool,
    pub signing_secret: SigningSecret,

    /// Identity token lifetime. `None` issues tokens that never expire.
    pub token_ttl: Option<SignedDuration>,
}

#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UsersService>,
    pub auth: Arc<dyn AuthService>,
    pub categories: Arc<dyn CategoriesService>,
    pub products: Arc<dyn ProductsService>,
    pub orders: Arc<dyn OrdersService>,
    pub dashboard: Arc<dyn DashboardService>,
}

impl AppContext {
    /// Build application context from settings gathered at startup.
    ///
    /// # Errors
    ///
    /// Returns an error when the signing secret is empty, a database
    /// connection cannot be established, or migrations fail.
    pub async fn from_settings(settings: AppSettings) -> Result<Self, AppInitError> {
        if settings.signing_secret.is_empty() {
            return Err(AppInitError::EmptySigningSecret);
        }

        let pool = database::connect(&settings.database_url, settings.max_connections)
            .await
            .map_err(AppInitError::Database)?;

        if settings.run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;
        }

        let db = Db::new(pool);
        let signer = TokenSigner::new(&settings.signing_secret, settings.token_ttl);

        Ok(Self::from_db(db, signer))
    }

    /// Wire every service onto an existing pool.
    #[must_use]
    pub fn from_db(db: Db, signer: TokenSigner) -> Self {
        Self {
            users: Arc::new(PgUsersService::new(db.clone())),
            auth: Arc::new(PgAuthService::new(db.clone(), signer)),
            categories: Arc::new(PgCategoriesService::new(db.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            dashboard: Arc::new(PgDashboardService::new(db)),
        }
    }
}
