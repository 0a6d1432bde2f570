// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use rand::Rng;

use crate::utc_now;

/// A random Message-ID scoped to the sender's domain, without angle brackets.
pub fn generate_message_id(sender: &str) -> String {
    let random_bytes: [u8; 16] = rand::rng().random();
    let random_id = hex::encode(random_bytes);
    let timestamp_millis = utc_now!();
    let domain = sender
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
        .unwrap_or("campaign-mailer");
    format!("{}.{}@{}", timestamp_millis, random_id, domain)
}

#[cfg(test)]
mod tests {
    use super::generate_message_id;

    #[test]
    fn message_ids_are_unique_and_use_sender_domain() {
        let a = generate_message_id("news@eduaihub.in");
        let b = generate_message_id("news@eduaihub.in");
        assert_ne!(a, b);
        assert!(a.ends_with("@eduaihub.in"));
        assert!(!a.contains('<'));
        assert!(generate_message_id("broken").ends_with("@campaign-mailer"));
    }
}
