//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};
use storefront_app::domain::users::records::UserRecord;

const IDENTITY_DEPOT_KEY: &str = "identity";

/// Typed access to values the hoops leave in the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Attach the authenticated user for downstream handlers.
    fn insert_identity(&mut self, user: UserRecord);

    /// The user loaded by the auth gate.
    fn identity_or_401(&self) -> Result<&UserRecord, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_identity(&mut self, user: UserRecord) {
        self.insert(IDENTITY_DEPOT_KEY, user);
    }

    fn identity_or_401(&self) -> Result<&UserRecord, StatusError> {
        self.get::<UserRecord>(IDENTITY_DEPOT_KEY)
            .map_err(|_ignored| StatusError::unauthorized().brief("Authentication required"))
    }
}
