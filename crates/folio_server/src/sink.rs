//! Where accepted submissions go.

use crate::contact::ValidatedContact;
use crate::error::SinkError;

/// Receives every submission that passed validation.
pub trait ContactSink: Send + Sync {
    /// Hands off one submission.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if the submission could not be handed off. The
    /// caller sees a generic failure.
    fn deliver(&self, contact: &ValidatedContact) -> Result<(), SinkError>;
}

/// Writes submissions to the log and nowhere else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ContactSink for LogSink {
    fn deliver(&self, contact: &ValidatedContact) -> Result<(), SinkError> {
        tracing::info!(
            name = %contact.name,
            email = %contact.email,
            subject = %contact.subject,
            message = %contact.message,
            submitted_at = %contact.submitted_at_iso(),
            "contact form submission"
        );
        Ok(())
    }
}
