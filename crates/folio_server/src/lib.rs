//! # Folio Server
//!
//! The contact form endpoint of the portfolio site.
//!
//! ```text
//! POST /api/contact ──► parse ──► validate ──► ContactSink ──► 200 receipt
//!                         │           │              │
//!                         ▼           ▼              ▼
//!                        500    400 (all rules)     500
//! GET  /api/contact ──► 200 informational message
//! ```
//!
//! Submissions are validated, normalized and logged. Nothing is stored.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod contact;
pub mod error;
pub mod routes;
pub mod sink;

pub use config::ServerConfig;
pub use contact::{
    validate, validate_at, ContactReceipt, ContactSubmission, ReceiptData, ValidatedContact,
};
pub use error::{ContactError, ServerError, ServerResult, SinkError, UNEXPECTED_ERROR};
pub use routes::{router, AppState, CONTACT_PATH};
pub use sink::{ContactSink, LogSink};
