//! In-memory SMS gateway.
//!
//! Records every message instead of delivering it. Intended for tests and for
//! embedding the crate where SMS is disabled.

use std::collections::HashSet;
use std::sync::Mutex;

use super::{SmsGateway, SmsMessage};
use crate::error::SmsError;

/// Gateway that keeps sent messages in memory.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    sent: Mutex<Vec<SmsMessage>>,
    rejected: Mutex<HashSet<String>>,
}

impl InMemoryGateway {
    /// Creates an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every future send to `phone` fail.
    pub fn reject(&self, phone: impl Into<String>) {
        if let Ok(mut rejected) = self.rejected.lock() {
            rejected.insert(phone.into());
        }
    }

    /// Messages accepted so far, in send order.
    #[must_use]
    pub fn sent(&self) -> Vec<SmsMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Messages accepted for one phone number.
    #[must_use]
    pub fn sent_to(&self, phone: &str) -> Vec<SmsMessage> {
        self.sent().into_iter().filter(|m| m.to == phone).collect()
    }
}

impl SmsGateway for InMemoryGateway {
    fn send(&self, message: &SmsMessage) -> Result<(), SmsError> {
        let rejected = self
            .rejected
            .lock()
            .map_err(|_| SmsError::Unavailable {
                message: "poisoned lock: rejected".to_string(),
            })?
            .contains(&message.to);
        if rejected {
            return Err(SmsError::Rejected {
                phone: message.to.clone(),
                message: "number rejected".to_string(),
            });
        }

        self.sent
            .lock()
            .map_err(|_| SmsError::Unavailable {
                message: "poisoned lock: sent".to_string(),
            })?
            .push(message.clone());
        Ok(())
    }
}
