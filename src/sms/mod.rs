//! Outbound SMS.
//!
//! The crate never talks to a carrier itself. Hosts plug a provider in behind
//! [`SmsGateway`]; [`SmsDispatcher`] moves delivery off the posting thread.

mod dispatcher;
mod memory;

pub use dispatcher::SmsDispatcher;
pub use memory::InMemoryGateway;

use serde::{Deserialize, Serialize};

use crate::error::SmsError;

/// A single text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsMessage {
    /// Destination phone number.
    pub to: String,
    /// Message body.
    pub body: String,
}

impl SmsMessage {
    /// Creates a message.
    #[must_use]
    pub fn new(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            body: body.into(),
        }
    }
}

/// Delivery seam for SMS providers.
pub trait SmsGateway: Send + Sync {
    /// Sends (or hands off) one message.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the message or cannot be
    /// reached.
    fn send(&self, message: &SmsMessage) -> Result<(), SmsError>;
}

impl<T: SmsGateway + ?Sized> SmsGateway for std::sync::Arc<T> {
    fn send(&self, message: &SmsMessage) -> Result<(), SmsError> {
        (**self).send(message)
    }
}
