//! End-to-end checks of the extraction-to-storage flow through the public
//! API, without a live Telegram connection or remote host.

use sysmon_bot::extract::{extract_emails, extract_phones};
use sysmon_bot::menu;
use sysmon_bot::storage::{RecordKind, Store};
use sysmon_bot::utils::split_long_message;

#[tokio::test]
async fn found_emails_survive_save_and_listing() {
    let store = Store::open_in_memory().expect("in-memory store");
    let text = "contact me at a@b.com or x@y.org";

    // The confirmation step re-extracts from the raw text it carries
    let emails = extract_emails(text);
    assert_eq!(emails, vec!["a@b.com", "x@y.org"]);
    for email in &emails {
        store
            .append(RecordKind::Email, email)
            .await
            .expect("append email");
    }

    let stored = store.list_all(RecordKind::Email).await.expect("list emails");
    assert_eq!(stored, vec!["a@b.com", "x@y.org"]);
}

#[tokio::test]
async fn repeated_saves_accumulate_duplicates() {
    let store = Store::open_in_memory().expect("in-memory store");
    let phones = extract_phones("+7 (912) 345-67-89");
    assert_eq!(phones.len(), 1);

    for _ in 0..2 {
        for phone in &phones {
            store
                .append(RecordKind::Phone, phone)
                .await
                .expect("append phone");
        }
    }

    let stored = store.list_all(RecordKind::Phone).await.expect("list phones");
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|p| p == "+7 (912) 345-67-89"));
}

#[test]
fn oversized_diagnostic_output_is_chunked_in_order() {
    // A df/ps style listing much larger than one Telegram message
    let output = (0..2000)
        .map(|i| format!("process-{i:04} 0.0 0.1 /usr/bin/daemon-{i}"))
        .collect::<Vec<_>>()
        .join("\n");

    let parts = split_long_message(&output, 4000);
    assert!(parts.len() > 1);
    assert!(parts.iter().all(|p| p.len() <= 4000));
    assert_eq!(parts.join("\n"), output);
}

#[test]
fn repl_log_report_covers_every_line() {
    let raw = "2024-01-01 checkpoint starting\n2024-01-01 checkpoint complete";
    let report = menu::format_repl_logs(raw);
    assert!(report.starts_with("Логи репликации"));
    assert_eq!(report.matches("> ").count(), 2);
}
