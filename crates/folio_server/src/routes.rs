//! HTTP surface: one endpoint, two methods.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::contact::{validate, ContactReceipt, ContactSubmission};
use crate::error::ContactError;
use crate::sink::{ContactSink, LogSink};

/// Path of the contact endpoint.
pub const CONTACT_PATH: &str = "/api/contact";

const CONTACT_INFO: &str = "Contact API endpoint. Use POST to submit a message.";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    sink: Arc<dyn ContactSink>,
}

impl AppState {
    /// State delivering to `sink`.
    pub fn new(sink: Arc<dyn ContactSink>) -> Self {
        Self { sink }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(LogSink))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(CONTACT_PATH, get(contact_info).post(submit_contact))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct InfoBody {
    message: &'static str,
}

async fn contact_info() -> Json<InfoBody> {
    Json(InfoBody {
        message: CONTACT_INFO,
    })
}

/// The body is parsed by hand so that any malformed payload, whatever its
/// content type, takes the generic failure path.
async fn submit_contact(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ContactReceipt>, ContactError> {
    let submission = ContactSubmission::from_json(&body)?;

    let contact = validate(&submission).map_err(|errors| {
        tracing::debug!(count = errors.len(), "contact submission rejected");
        ContactError::Invalid(errors)
    })?;

    state.sink.deliver(&contact)?;

    Ok(Json(ContactReceipt::from(&contact)))
}
