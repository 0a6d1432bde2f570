// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::smtp::transport::{build_message, OutgoingEmail, SmtpTransport};
use crate::modules::tasks::attachment::StagedAttachment;
use std::sync::Arc;
use tempfile::tempdir;

#[tokio::test]
async fn message_carries_headers_and_attachments() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("0-plan.pdf");
    std::fs::write(&path, b"%PDF-1.4").unwrap();
    let logo = dir.path().join("1-logo.png");
    std::fs::write(&logo, [0x89u8, b'P', b'N', b'G']).unwrap();

    let email = OutgoingEmail {
        to: "asha@x.com".into(),
        subject: "Hello".into(),
        html: "<p>Hi Asha</p>".into(),
        sender_name: Some("EduAI".into()),
        attachments: Arc::from(vec![
            StagedAttachment {
                path,
                file_name: "plan.pdf".into(),
                mime_type: "application/pdf".into(),
                content_id: None,
            },
            StagedAttachment {
                path: logo,
                file_name: "logo.png".into(),
                mime_type: "image/png".into(),
                content_id: Some("logo".into()),
            },
        ]),
    };

    let bytes = build_message("news@eduaihub.in", &email)
        .await
        .unwrap()
        .write_to_vec()
        .unwrap();
    let raw = String::from_utf8_lossy(&bytes);
    assert!(raw.contains("Subject: Hello"));
    assert!(raw.contains("news@eduaihub.in"));
    assert!(raw.contains("asha@x.com"));
    assert!(raw.contains("plan.pdf"));
    assert!(raw.contains("logo"));
    assert!(raw.contains("@eduaihub.in>"));
}

#[tokio::test]
async fn missing_attachment_file_fails_the_message() {
    let email = OutgoingEmail {
        to: "asha@x.com".into(),
        subject: "Hello".into(),
        html: "<p>Hi</p>".into(),
        attachments: Arc::from(vec![StagedAttachment {
            path: "/nonexistent/campaign-mailer/file.txt".into(),
            file_name: "file.txt".into(),
            mime_type: "text/plain".into(),
            content_id: None,
        }]),
        ..Default::default()
    };
    assert!(build_message("news@eduaihub.in", &email).await.is_err());
}

#[tokio::test]
async fn login_check_requires_configuration() {
    // Test settings carry no SMTP server.
    assert!(SmtpTransport::check_login().await.is_err());
}
