//! Response envelope and error catcher.
//!
//! Every body the API sends is wrapped as `{success, message, data}` on success
//! or `{success: false, message, error?}` on failure.

use salvo::{
    http::ResBody,
    oapi::ToSchema,
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Successful response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct Envelope<T: ToSchema + 'static> {
    /// Always `true`
    pub success: bool,

    /// Human readable outcome
    pub message: String,

    /// Response payload
    pub data: T,
}

impl<T: ToSchema + 'static> Envelope<T> {
    pub(crate) fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data,
        })
    }
}

/// Successful response without a payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MessageResponse {
    /// Always `true`
    pub success: bool,

    /// Human readable outcome
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn ok(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
        })
    }
}

/// Failed response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorEnvelope {
    /// Always `false`
    pub success: bool,

    /// Human readable failure
    pub message: String,

    /// Additional detail, such as individual validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Rewrites error responses into [`ErrorEnvelope`] bodies.
///
/// Server errors are logged; their detail only reaches the client when
/// `expose_internal` is set.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EnvelopeCatcher {
    expose_internal: bool,
}

impl EnvelopeCatcher {
    pub(crate) const fn new(expose_internal: bool) -> Self {
        Self { expose_internal }
    }

    fn envelope(
        self,
        status: StatusCode,
        path: &str,
        failure: Option<StatusError>,
    ) -> ErrorEnvelope {
        let (message, detail) = match failure {
            Some(failure) => (failure.brief, failure.detail),
            None if status == StatusCode::NOT_FOUND => (format!("Route {path} not found"), None),
            None => (
                status.canonical_reason().unwrap_or("Error").to_string(),
                None,
            ),
        };

        if status.is_server_error() {
            error!(
                status = status.as_u16(),
                path,
                detail = detail.as_deref().unwrap_or_default(),
                "{message}"
            );

            if !self.expose_internal {
                return ErrorEnvelope {
                    success: false,
                    message: "Internal server error".to_string(),
                    error: None,
                };
            }
        }

        ErrorEnvelope {
            success: false,
            message,
            error: detail,
        }
    }
}

#[handler]
impl EnvelopeCatcher {
    async fn handle(&self, req: &mut Request, res: &mut Response, ctrl: &mut FlowCtrl) {
        let status = res.status_code.unwrap_or(StatusCode::NOT_FOUND);

        if !(status.is_client_error() || status.is_server_error()) {
            return;
        }

        let failure = match res.take_body() {
            ResBody::Error(failure) => Some(failure),
            _ => None,
        };

        let envelope = self.envelope(status, req.uri().path(), failure);

        res.status_code(status);
        res.render(Json(envelope));
        ctrl.skip_rest();
    }
}
