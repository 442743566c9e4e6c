//! Narrow seams to the surrounding application: string lookup and user feedback.

use std::collections::HashMap;

use tracing::info;

pub trait Translator: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, description: &str);
}

/// Built-in English strings for the guest list panel. Unknown keys echo back.
pub struct EnglishCatalog {
    entries: HashMap<&'static str, &'static str>,
}

impl Default for EnglishCatalog {
    fn default() -> Self {
        let entries = [
            ("guestList.totalGuests", "Total Guests"),
            ("guestList.confirmed", "Confirmed"),
            ("guestList.declined", "Declined"),
            ("guestList.pending", "Pending"),
            ("guestList.maybe", "Maybe"),
            ("guestList.family", "Family"),
            ("guestList.friends", "Friends"),
            ("guestList.colleagues", "Colleagues"),
            ("guestList.other", "Other"),
            ("guestList.headcount", "Expected Headcount"),
            ("guestList.addGuest", "Add Guest"),
            ("guestList.editGuest", "Edit Guest"),
            ("guestList.guestAdded", "Guest added"),
            ("guestList.guestAddedSuccess", "The guest has been added to your list."),
            ("guestList.guestUpdated", "Guest updated"),
            ("guestList.guestUpdatedSuccess", "The guest's details have been saved."),
            ("guestList.guestDeleted", "Guest removed"),
            ("guestList.guestDeletedSuccess", "The guest has been removed from your list."),
            ("guestList.noGuestsYet", "No guests yet. Add your first guest to get started."),
            ("guestList.noGuestsFound", "No guests match the current filters."),
            ("common.error", "Something went wrong"),
            ("common.save", "Save"),
            ("common.saving", "Saving..."),
            ("common.cancel", "Cancel"),
        ];
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

impl Translator for EnglishCatalog {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .map(|text| (*text).to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

/// Emits notifications as tracing events.
#[derive(Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, title: &str, description: &str) {
        info!(title, description, "notification");
    }
}
