//! Single-slot overlay state.
//!
//! There is one slot per [`OverlayKind`]. Opening always replaces what the
//! slot shows; closing keeps the last content so a closing overlay never
//! renders empty.

use std::fmt;

/// The two overlay slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Sheet,
    Dialog,
}

impl OverlayKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayKind::Sheet => "sheet",
            OverlayKind::Dialog => "dialog",
        }
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an overlay renders. Interpreted by a renderer keyed on the kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayContent {
    CreateSushiForm,
    ConfirmDelete { id: String, name: String },
}

/// Everything `open` replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayPayload {
    pub title: String,
    pub description: Option<String>,
    pub content: OverlayContent,
}

impl OverlayPayload {
    pub fn new(title: impl Into<String>, content: OverlayContent) -> Self {
        Self {
            title: title.into(),
            description: None,
            content,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// State of one overlay slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySlot {
    pub kind: OverlayKind,
    pub is_open: bool,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<OverlayContent>,
}

impl OverlaySlot {
    /// A closed slot that has never shown anything.
    pub fn new(kind: OverlayKind) -> Self {
        Self {
            kind,
            is_open: false,
            title: String::new(),
            description: None,
            content: None,
        }
    }

    /// Opens the slot with a new payload, replacing whatever it showed.
    pub fn open(&mut self, payload: OverlayPayload) {
        self.is_open = true;
        self.title = payload.title;
        self.description = payload.description;
        self.content = Some(payload.content);
    }

    /// Closes the slot. Returns false if it was already closed.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.is_open, false)
    }
}
