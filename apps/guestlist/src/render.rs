//! Plain-text rendering of the guest list panel.

use std::fmt::Write as _;

use client_core::{FieldErrors, GuestListView, Translator};
use shared::domain::{Guest, RsvpStatus};

const TILE_ORDER: [RsvpStatus; 4] = [
    RsvpStatus::Confirmed,
    RsvpStatus::Declined,
    RsvpStatus::Pending,
    RsvpStatus::Maybe,
];

fn status_marker(status: RsvpStatus) -> &'static str {
    match status {
        RsvpStatus::Confirmed => "[v]",
        RsvpStatus::Declined => "[x]",
        RsvpStatus::Pending | RsvpStatus::Maybe => "[?]",
    }
}

fn status_label_key(status: RsvpStatus) -> &'static str {
    match status {
        RsvpStatus::Confirmed => "guestList.confirmed",
        RsvpStatus::Declined => "guestList.declined",
        RsvpStatus::Pending => "guestList.pending",
        RsvpStatus::Maybe => "guestList.maybe",
    }
}

pub fn stats_tiles(view: &GuestListView, t: &dyn Translator) -> String {
    let stats = &view.stats;
    let mut out = format!("{}: {}  ", t.translate("guestList.totalGuests"), stats.total);
    for status in TILE_ORDER {
        let _ = write!(
            out,
            "{}: {}  ",
            t.translate(status_label_key(status)),
            stats.count(status)
        );
    }
    let _ = write!(
        out,
        "\n{}: {}",
        t.translate("guestList.headcount"),
        view.headcount
    );
    out
}

pub fn guest_card(guest: &Guest, t: &dyn Translator) -> String {
    let mut out = format!(
        "{} #{} {}",
        status_marker(guest.rsvp_status),
        guest.id,
        guest.name
    );
    if let Some(email) = &guest.email {
        let _ = write!(out, "  <{email}>");
    }
    if let Some(phone) = &guest.phone {
        let _ = write!(out, "  tel {phone}");
    }
    if guest.plus_one {
        out.push_str("  +1");
        if let Some(name) = &guest.plus_one_name {
            let _ = write!(out, " ({name})");
        }
    }
    let _ = write!(
        out,
        "  [{}] {} / {}",
        t.translate(status_label_key(guest.rsvp_status)),
        guest.category,
        guest.side
    );
    out
}

pub fn panel(view: &GuestListView, t: &dyn Translator) -> String {
    let mut out = stats_tiles(view, t);
    out.push_str("\n\n");
    match view.empty_state {
        Some(state) => out.push_str(&t.translate(state.message_key())),
        None => {
            let cards: Vec<String> = view.guests.iter().map(|g| guest_card(g, t)).collect();
            out.push_str(&cards.join("\n"));
        }
    }
    out
}

pub fn field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .flat_map(|(field, messages)| {
            messages
                .iter()
                .map(move |message| format!("  {field}: {message}"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
