use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{GuestCategory, GuestSide, RsvpStatus, WeddingId};

/// Body of `POST /api/guests`: a guest minus the server-assigned id and timestamps.
///
/// Absent optional text is serialized as an explicit `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGuest {
    pub wedding_id: WeddingId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub rsvp_status: RsvpStatus,
    pub plus_one: bool,
    pub plus_one_name: Option<String>,
    pub additional_guests: u32,
    pub category: GuestCategory,
    pub side: GuestSide,
    pub dietary_restrictions: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Body of `PATCH /api/guests/{id}`. Only fields that are set go on the wire.
///
/// Optional text columns are doubly wrapped: `Some(None)` clears the column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsvp_status: Option<RsvpStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plus_one: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plus_one_name: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_guests: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<GuestCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<GuestSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
}

impl GuestPatch {
    pub fn rsvp(status: RsvpStatus, responded_at: DateTime<Utc>) -> Self {
        Self {
            rsvp_status: Some(status),
            responded_at: Some(responded_at),
            ..Self::default()
        }
    }

    /// Every editable field taken from a create body, as a full-form edit sends it.
    pub fn from_new_guest(guest: NewGuest) -> Self {
        Self {
            name: Some(guest.name),
            email: Some(guest.email),
            phone: Some(guest.phone),
            rsvp_status: Some(guest.rsvp_status),
            plus_one: Some(guest.plus_one),
            plus_one_name: Some(guest.plus_one_name),
            additional_guests: Some(guest.additional_guests),
            category: Some(guest.category),
            side: Some(guest.side),
            dietary_restrictions: Some(guest.dietary_restrictions),
            address: Some(guest.address),
            notes: Some(guest.notes),
            responded_at: None,
        }
    }
}
