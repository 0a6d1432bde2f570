// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::utc_now;
use native_db::*;
use native_model::{native_model, Model};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static LAST_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// One delivery attempt (or skip) for one recipient.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize, Object)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct DeliveryLog {
    /// Monotonic sequence; larger values were appended later.
    #[primary_key]
    pub id: u64,
    /// Recipient address.
    pub email: String,
    /// Campaign category, e.g. `custom`, `product-class_tom` or `greeting-invitation`.
    pub category: String,
    /// Subject line that was used.
    pub subject: String,
    /// `sent`, `failed: <reason>` or `skipped-empty-body`.
    pub status: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl DeliveryLog {
    pub fn new(email: &str, category: &str, subject: &str, status: &str) -> Self {
        Self {
            id: next_sequence(),
            email: email.to_string(),
            category: category.to_string(),
            subject: subject.to_string(),
            status: status.to_string(),
            created_at: utc_now!(),
        }
    }
}

/// Microsecond clock reading, bumped when two appends land on the same tick.
fn next_sequence() -> u64 {
    let now = chrono::Utc::now().timestamp_micros().max(0) as u64;
    let previous = LAST_SEQUENCE
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or(now);
    now.max(previous + 1)
}

#[cfg(test)]
mod tests {
    use super::next_sequence;

    #[test]
    fn sequence_strictly_increases() {
        let mut last = next_sequence();
        for _ in 0..1000 {
            let next = next_sequence();
            assert!(next > last);
            last = next;
        }
    }
}
