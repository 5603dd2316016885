use chrono::{DateTime, Duration, Utc};
use folio_common::Document;

/// Documents shown when no real store is reachable
pub fn sample_documents(now: DateTime<Utc>) -> Vec<Document> {
    vec![
        Document {
            id: 1,
            title: "Welcome to the Document Editor".to_string(),
            content: concat!(
                "<h1>Welcome!</h1>",
                "<p>This is a sample document with <strong>rich text formatting</strong>.</p>",
                "<ul><li>You can create <em>formatted text</em></li>",
                "<li>Add lists and links</li><li>Insert images</li></ul>"
            )
            .to_string(),
            created_at: now,
            updated_at: now,
        },
        Document {
            id: 2,
            title: "Getting Started Guide".to_string(),
            content: concat!(
                "<h2>How to use this editor</h2>",
                "<p>Click on any document to start editing. Use the toolbar to format your text.</p>",
                "<blockquote>This is a sample quote to show formatting capabilities.</blockquote>"
            )
            .to_string(),
            created_at: now - Duration::days(1),
            updated_at: now - Duration::hours(1),
        },
    ]
}
