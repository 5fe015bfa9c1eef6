//! Pretty output formatting.

use sushisync::{Notification, NotificationKind};
use sushisync_core::sushi::{messages, ListView, Sushi};

/// Format a sushi item for display.
pub fn format_sushi(sushi: &Sushi) -> String {
    let mut output = format!(
        "{} [{}]\n  ID: {}\n  Price: ${:.2}\n  {}: {}",
        sushi.name,
        sushi.sushi_type,
        sushi.id,
        sushi.price,
        sushi.sushi_type.item_label(),
        sushi.item_detail()
    );
    if let Some(fish_type) = &sushi.fish_type {
        output.push_str(&format!("\n  Fish type: {}", fish_type));
    }
    if let Some(created_at) = &sushi.created_at {
        output.push_str(&format!("\n  Created: {}", created_at.format("%Y-%m-%d %H:%M")));
    }
    output
}

/// Format sushi items for display.
pub fn format_sushi_list(items: &[Sushi]) -> String {
    if items.is_empty() {
        return format!("{}\n{}", messages::EMPTY_TITLE, messages::EMPTY_DESCRIPTION);
    }
    let mut output = format!("SUSHI ({})\n", items.len());
    output.push_str(&"-".repeat(40));
    for sushi in items {
        output.push_str(&format!("\n{}", format_sushi(sushi)));
        output.push('\n');
    }
    output
}

/// Format a list view: loading, error with any stale items, empty, or items.
pub fn format_view(view: &ListView) -> String {
    match view {
        ListView::Loading => "Loading...".to_string(),
        ListView::Error { message, stale } => {
            let mut output = format!("{}\n{}", messages::LOAD_ERROR_TITLE, message);
            if let Some(items) = stale {
                output.push_str("\n\n");
                output.push_str(&format_sushi_list(items));
            }
            output
        }
        ListView::Empty => format_sushi_list(&[]),
        ListView::Items(items) => format_sushi_list(items),
    }
}

/// Format a mutation notification.
pub fn format_notification(notification: &Notification) -> String {
    match notification.kind {
        NotificationKind::Success => format!("✓ {}", notification.message),
        NotificationKind::Error => format!("✗ {}", notification.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sushisync_core::sushi::SushiType;

    #[test]
    fn test_format_roll_shows_pieces() {
        let roll = Sushi::new("r1", "Dragon Roll", SushiType::Roll, 12.0).with_pieces(8);
        let output = format_sushi(&roll);
        assert!(output.starts_with("Dragon Roll [Roll]"));
        assert!(output.contains("Price: $12.00"));
        assert!(output.contains("Pieces: 8"));
    }

    #[test]
    fn test_empty_view_uses_empty_state() {
        let output = format_view(&ListView::Empty);
        assert!(output.starts_with(messages::EMPTY_TITLE));
    }

    #[test]
    fn test_error_view_keeps_stale_items() {
        let stale = vec![Sushi::new("n1", "Saba Nigiri", SushiType::Nigiri, 3.75).with_fish("Mackerel")];
        let output = format_view(&ListView::Error {
            message: "Network error".to_string(),
            stale: Some(stale),
        });
        assert!(output.starts_with(messages::LOAD_ERROR_TITLE));
        assert!(output.contains("Fish: Mackerel"));
    }

    #[test]
    fn test_format_notification() {
        let output = format_notification(&Notification::error("Write failed"));
        assert_eq!(output, "✗ Write failed");
    }
}
