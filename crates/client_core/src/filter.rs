use std::{fmt, str::FromStr};

use shared::domain::{Guest, GuestCategory, RsvpStatus};

/// A filter control value: the `all` sentinel or one concrete value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(Selection::All);
        }
        raw.parse().map(Selection::Only)
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Only(value) => fmt::Display::fmt(value, f),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestFilter {
    pub search: String,
    pub status: Selection<RsvpStatus>,
    pub category: Selection<GuestCategory>,
}

impl GuestFilter {
    pub fn matches(&self, guest: &Guest) -> bool {
        self.matches_search(guest)
            && self.status.admits(&guest.rsvp_status)
            && self.category.admits(&guest.category)
    }

    /// Name and email compare case-insensitively; phone numbers have no case.
    fn matches_search(&self, guest: &Guest) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        guest.name.to_lowercase().contains(&needle)
            || guest
                .email
                .as_deref()
                .is_some_and(|email| email.to_lowercase().contains(&needle))
            || guest
                .phone
                .as_deref()
                .is_some_and(|phone| phone.contains(self.search.as_str()))
    }

    pub fn apply<'a>(&self, guests: &'a [Guest]) -> Vec<&'a Guest> {
        guests.iter().filter(|guest| self.matches(guest)).collect()
    }

    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || !self.status.is_all() || !self.category.is_all()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuestStats {
    pub total: usize,
    pub confirmed: usize,
    pub declined: usize,
    pub pending: usize,
    pub maybe: usize,
}

impl GuestStats {
    pub fn from_guests(guests: &[Guest]) -> Self {
        guests.iter().fold(
            Self {
                total: guests.len(),
                ..Self::default()
            },
            |mut stats, guest| {
                match guest.rsvp_status {
                    RsvpStatus::Confirmed => stats.confirmed += 1,
                    RsvpStatus::Declined => stats.declined += 1,
                    RsvpStatus::Pending => stats.pending += 1,
                    RsvpStatus::Maybe => stats.maybe += 1,
                }
                stats
            },
        )
    }

    pub fn count(&self, status: RsvpStatus) -> usize {
        match status {
            RsvpStatus::Confirmed => self.confirmed,
            RsvpStatus::Declined => self.declined,
            RsvpStatus::Pending => self.pending,
            RsvpStatus::Maybe => self.maybe,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoGuestsYet,
    NoGuestsMatch,
}

impl EmptyState {
    pub fn for_filter(filter: &GuestFilter) -> Self {
        if filter.is_active() {
            EmptyState::NoGuestsMatch
        } else {
            EmptyState::NoGuestsYet
        }
    }

    pub fn message_key(self) -> &'static str {
        match self {
            EmptyState::NoGuestsYet => "guestList.noGuestsYet",
            EmptyState::NoGuestsMatch => "guestList.noGuestsFound",
        }
    }
}

/// Everything the panel renders for one wedding.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestListView {
    /// Computed over the whole list, independent of the active filter.
    pub stats: GuestStats,
    pub guests: Vec<Guest>,
    pub empty_state: Option<EmptyState>,
    pub headcount: u32,
}

impl GuestListView {
    pub fn derive(all: &[Guest], filter: &GuestFilter) -> Self {
        let guests: Vec<Guest> = filter.apply(all).into_iter().cloned().collect();
        let empty_state = guests
            .is_empty()
            .then(|| EmptyState::for_filter(filter));
        Self {
            stats: GuestStats::from_guests(all),
            headcount: all.iter().map(Guest::party_size).sum(),
            guests,
            empty_state,
        }
    }
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
