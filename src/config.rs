//! Configuration for post handling and SMS dispatch.

use serde::{Deserialize, Serialize};

use crate::post::SMS_LENGTH_LIMIT;

/// Village-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VillageConfig {
    /// Maximum SMS body length, prefix included.
    pub sms_length_limit: usize,
    /// Display name used as the SMS prefix for posts without an author.
    pub automated_author: String,
}

impl Default for VillageConfig {
    fn default() -> Self {
        Self {
            sms_length_limit: SMS_LENGTH_LIMIT,
            automated_author: "Portfoliyo".to_string(),
        }
    }
}

/// SMS dispatcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Number of worker threads draining the queue.
    pub workers: usize,
    /// Maximum queued messages before `try_dispatch` reports backpressure.
    pub queue_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            queue_capacity: 1024,
        }
    }
}
