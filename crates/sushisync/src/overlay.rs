//! Process-wide overlay slots with change notification.

use tokio::sync::watch;

use sushisync_core::overlay::{OverlayKind, OverlayPayload, OverlaySlot};

/// One sheet slot and one dialog slot.
#[derive(Debug)]
pub struct OverlayStore {
    sheet: watch::Sender<OverlaySlot>,
    dialog: watch::Sender<OverlaySlot>,
}

impl OverlayStore {
    pub fn new() -> Self {
        Self {
            sheet: watch::Sender::new(OverlaySlot::new(OverlayKind::Sheet)),
            dialog: watch::Sender::new(OverlaySlot::new(OverlayKind::Dialog)),
        }
    }

    fn sender(&self, kind: OverlayKind) -> &watch::Sender<OverlaySlot> {
        match kind {
            OverlayKind::Sheet => &self.sheet,
            OverlayKind::Dialog => &self.dialog,
        }
    }

    /// Opens the slot, replacing whatever it showed.
    pub fn open(&self, kind: OverlayKind, payload: OverlayPayload) {
        tracing::debug!(%kind, title = %payload.title, "opening overlay");
        self.sender(kind).send_modify(|slot| slot.open(payload));
    }

    /// Closes the slot. Closing a closed slot notifies nobody.
    pub fn close(&self, kind: OverlayKind) -> bool {
        let closed = self.sender(kind).send_if_modified(OverlaySlot::close);
        if closed {
            tracing::debug!(%kind, "closed overlay");
        }
        closed
    }

    pub fn slot(&self, kind: OverlayKind) -> OverlaySlot {
        self.sender(kind).borrow().clone()
    }

    pub fn is_open(&self, kind: OverlayKind) -> bool {
        self.sender(kind).borrow().is_open
    }

    pub fn watch(&self, kind: OverlayKind) -> watch::Receiver<OverlaySlot> {
        self.sender(kind).subscribe()
    }
}

impl Default for OverlayStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sushisync_core::overlay::OverlayContent;

    fn create_form() -> OverlayPayload {
        OverlayPayload::new("Create Sushi Item", OverlayContent::CreateSushiForm)
    }

    #[tokio::test]
    async fn test_slots_are_independent() {
        let overlays = OverlayStore::new();

        overlays.open(OverlayKind::Sheet, create_form());

        assert!(overlays.is_open(OverlayKind::Sheet));
        assert!(!overlays.is_open(OverlayKind::Dialog));
    }

    #[tokio::test]
    async fn test_close_is_idempotent_and_retains_content() {
        let overlays = OverlayStore::new();
        let mut watch = overlays.watch(OverlayKind::Sheet);

        overlays.open(OverlayKind::Sheet, create_form());
        assert!(watch.has_changed().unwrap());
        watch.borrow_and_update();

        assert!(overlays.close(OverlayKind::Sheet));
        assert!(watch.has_changed().unwrap());
        watch.borrow_and_update();

        assert!(!overlays.close(OverlayKind::Sheet));
        assert!(!watch.has_changed().unwrap());

        let slot = overlays.slot(OverlayKind::Sheet);
        assert!(!slot.is_open);
        assert_eq!(slot.content, Some(OverlayContent::CreateSushiForm));
    }

    #[tokio::test]
    async fn test_reopen_while_open_overwrites() {
        let overlays = OverlayStore::new();
        overlays.open(
            OverlayKind::Dialog,
            OverlayPayload::new(
                "Confirm Delete",
                OverlayContent::ConfirmDelete {
                    id: "a1".to_string(),
                    name: "Ebi".to_string(),
                },
            ),
        );
        overlays.open(
            OverlayKind::Dialog,
            OverlayPayload::new(
                "Confirm Delete",
                OverlayContent::ConfirmDelete {
                    id: "b2".to_string(),
                    name: "Ika".to_string(),
                },
            )
            .with_description("Are you sure you want to delete this Ika?"),
        );

        let slot = overlays.slot(OverlayKind::Dialog);
        assert!(slot.is_open);
        assert_eq!(
            slot.content,
            Some(OverlayContent::ConfirmDelete {
                id: "b2".to_string(),
                name: "Ika".to_string(),
            })
        );
        assert!(slot.description.is_some());
    }
}
