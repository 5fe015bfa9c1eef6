//! JSON output formatting.

use serde::Serialize;
use sushisync_core::sushi::{ListView, Sushi};

/// Format a value as JSON.
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

#[derive(Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
enum ViewJson<'a> {
    Loading,
    Error {
        message: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        stale: Option<&'a [Sushi]>,
    },
    Empty,
    Items { items: &'a [Sushi] },
}

/// Format a list view as a tagged JSON object, one per line in watch mode.
pub fn format_view(view: &ListView) -> String {
    let json = match view {
        ListView::Loading => ViewJson::Loading,
        ListView::Error { message, stale } => ViewJson::Error {
            message: message.as_str(),
            stale: stale.as_deref(),
        },
        ListView::Empty => ViewJson::Empty,
        ListView::Items(items) => ViewJson::Items {
            items: items.as_slice(),
        },
    };
    format_json(&json)
}
