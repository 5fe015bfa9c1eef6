//! Overlay rendering.
//!
//! Overlay content is an opaque handle; what it looks like is decided here,
//! through a table keyed by overlay kind.

use std::collections::HashMap;

use sushisync_core::overlay::{OverlayContent, OverlayKind, OverlaySlot};
use sushisync_core::sushi::messages;

/// Renders one open slot.
pub type RenderFn = fn(&OverlaySlot) -> String;

/// Dispatch table from overlay kind to renderer.
pub struct OverlayRenderer {
    table: HashMap<OverlayKind, RenderFn>,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        let mut table: HashMap<OverlayKind, RenderFn> = HashMap::new();
        table.insert(OverlayKind::Sheet, render_sheet);
        table.insert(OverlayKind::Dialog, render_dialog);
        Self { table }
    }

    /// Replace the renderer for `kind`.
    pub fn with_renderer(mut self, kind: OverlayKind, render: RenderFn) -> Self {
        self.table.insert(kind, render);
        self
    }

    /// Renders the slot, or nothing if it is closed.
    pub fn render(&self, slot: &OverlaySlot) -> Option<String> {
        if !slot.is_open {
            return None;
        }
        self.table.get(&slot.kind).map(|render| render(slot))
    }
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn header(slot: &OverlaySlot) -> String {
    match &slot.description {
        Some(description) => format!("{}\n{}", slot.title, description),
        None => slot.title.clone(),
    }
}

fn render_sheet(slot: &OverlaySlot) -> String {
    let mut output = format!("== {} ==", header(slot));
    if let Some(body) = slot.content.as_ref().map(content_body) {
        output.push_str(&format!("\n{}", body));
    }
    output
}

fn render_dialog(slot: &OverlaySlot) -> String {
    let mut output = format!("[{}]", header(slot));
    if let Some(body) = slot.content.as_ref().map(content_body) {
        output.push_str(&format!("\n{}", body));
    }
    output
}

fn content_body(content: &OverlayContent) -> String {
    match content {
        OverlayContent::CreateSushiForm => {
            "Fields: name, image, price, type, fish, fish type, pieces".to_string()
        }
        OverlayContent::ConfirmDelete { id, name } => {
            format!("{} ({})", messages::confirm_delete_body(name), id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sushisync_core::overlay::OverlayPayload;

    fn open_slot(kind: OverlayKind, payload: OverlayPayload) -> OverlaySlot {
        let mut slot = OverlaySlot::new(kind);
        slot.open(payload);
        slot
    }

    #[test]
    fn test_closed_slot_renders_nothing() {
        let renderer = OverlayRenderer::new();
        assert_eq!(renderer.render(&OverlaySlot::new(OverlayKind::Sheet)), None);
    }

    #[test]
    fn test_sheet_renders_form() {
        let slot = open_slot(
            OverlayKind::Sheet,
            OverlayPayload::new(messages::CREATE_SHEET_TITLE, OverlayContent::CreateSushiForm)
                .with_description(messages::CREATE_SHEET_DESCRIPTION),
        );

        let output = OverlayRenderer::new().render(&slot).unwrap();

        assert!(output.starts_with("== Create Sushi Item"));
        assert!(output.contains(messages::CREATE_SHEET_DESCRIPTION));
        assert!(output.contains("Fields: name"));
    }

    #[test]
    fn test_dialog_renders_confirm_body() {
        let slot = open_slot(
            OverlayKind::Dialog,
            OverlayPayload::new(
                messages::CONFIRM_DELETE_TITLE,
                OverlayContent::ConfirmDelete {
                    id: "a1".to_string(),
                    name: "Dragon Roll".to_string(),
                },
            ),
        );

        let output = OverlayRenderer::new().render(&slot).unwrap();

        assert_eq!(
            output,
            "[Confirm Delete]\nAre you sure you want to delete this Dragon Roll? (a1)"
        );
    }

    #[test]
    fn test_with_renderer_overrides_kind() {
        let renderer = OverlayRenderer::new().with_renderer(OverlayKind::Dialog, |slot| {
            format!("custom {}", slot.title)
        });
        let slot = open_slot(
            OverlayKind::Dialog,
            OverlayPayload::new("Hi", OverlayContent::CreateSushiForm),
        );

        assert_eq!(renderer.render(&slot).as_deref(), Some("custom Hi"));
    }
}
