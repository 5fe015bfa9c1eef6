//! User-facing strings shared by notifications, dialogs and empty states.

/// Resource title used in notifications.
pub const RESOURCE_TITLE: &str = "Sushi";

/// Fallback message when a failed write carries no description.
pub const ERROR_GENERIC: &str = "Something went wrong. Please try again.";

pub const CONFIRM_DELETE_TITLE: &str = "Confirm Delete";
pub const YES_DELETE: &str = "Yes, Delete";
pub const NO_CANCEL: &str = "No, Cancel";

pub const CREATE_SHEET_TITLE: &str = "Create Sushi Item";
pub const CREATE_SHEET_DESCRIPTION: &str = "Add a new sushi item to the menu.";

pub const EMPTY_TITLE: &str = "No Sushi Yet";
pub const EMPTY_DESCRIPTION: &str = "Start building your sushi collection by adding your first item.";

pub const LOAD_ERROR_TITLE: &str = "Unable to load sushi data";
pub const LOAD_ERROR_DEFAULT: &str =
    "An error occurred while fetching the sushi list. Please try again.";

pub fn created(title: &str) -> String {
    format!("{title} created successfully.")
}

pub fn deleted(title: &str) -> String {
    format!("{title} deleted successfully.")
}

pub fn confirm_delete_body(name: &str) -> String {
    format!("Are you sure you want to delete this {name}?")
}
