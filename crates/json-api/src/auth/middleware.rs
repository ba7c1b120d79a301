//! Auth gate.
//!
//! Verifies the bearer token, loads the identity it names and leaves it in the
//! depot. Missing, malformed, tampered, expired and orphaned tokens all fail
//! with the same 401.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::{debug, error};

use storefront_app::auth::AuthServiceError;

use crate::{extensions::*, state::State};

pub(crate) const REJECTED: &str = "Error in validating token";

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief(REJECTED));
        ctrl.skip_rest();

        return;
    };

    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => state,
        Err(_error) => {
            res.render(StatusError::internal_server_error().detail("application state missing"));
            ctrl.skip_rest();

            return;
        }
    };

    let user = match state.app.auth.authenticate_bearer(token).await {
        Ok(user) => user,
        Err(
            rejection @ (AuthServiceError::InvalidToken(_)
            | AuthServiceError::UnknownIdentity
            | AuthServiceError::InvalidCredentials),
        ) => {
            debug!("bearer token rejected: {rejection}");

            res.render(StatusError::unauthorized().brief(REJECTED));
            ctrl.skip_rest();

            return;
        }
        Err(source) => {
            error!("failed to authenticate bearer token: {source}");

            res.render(StatusError::internal_server_error().detail(source.to_string()));
            ctrl.skip_rest();

            return;
        }
    };

    depot.insert_identity(user);

    ctrl.call_next(req, depot, res).await;
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
