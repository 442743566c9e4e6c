use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(GuestId);
id_newtype!(WeddingId);

impl WeddingId {
    /// Zero is the "no wedding selected" id; queries against it are disabled.
    pub fn is_set(self) -> bool {
        self.0 != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! wire_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $wire:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                match raw.trim().to_ascii_lowercase().as_str() {
                    $($wire $(| $alias)* => Ok($name::$variant),)+
                    _ => Err(UnknownVariant {
                        kind: $kind,
                        value: raw.to_string(),
                    }),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    #[default]
    Pending,
    Confirmed,
    Declined,
    Maybe,
}

wire_enum!(RsvpStatus, "rsvp status", {
    Pending => "pending",
    Confirmed => "confirmed",
    Declined => "declined",
    Maybe => "maybe",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuestCategory {
    #[default]
    Family,
    Friends,
    Colleagues,
    Other,
}

wire_enum!(GuestCategory, "category", {
    Family => "family",
    Friends => "friends",
    Colleagues => "colleagues",
    Other => "other",
});

/// Which partner's side of the wedding a guest is invited from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuestSide {
    #[serde(alias = "bride")]
    PartnerA,
    #[serde(alias = "groom")]
    PartnerB,
    #[default]
    Both,
}

wire_enum!(GuestSide, "side", {
    PartnerA => "partner_a" | "bride",
    PartnerB => "partner_b" | "groom",
    Both => "both",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: GuestId,
    pub wedding_id: WeddingId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub rsvp_status: RsvpStatus,
    #[serde(default)]
    pub plus_one: bool,
    #[serde(default)]
    pub plus_one_name: Option<String>,
    #[serde(default)]
    pub additional_guests: u32,
    #[serde(default)]
    pub category: GuestCategory,
    #[serde(default)]
    pub side: GuestSide,
    #[serde(default)]
    pub dietary_restrictions: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub responded_at: Option<DateTime<Utc>>,
}

impl Guest {
    /// People this invitation accounts for, counting the named guest.
    pub fn party_size(&self) -> u32 {
        1 + u32::from(self.plus_one) + self.additional_guests
    }
}
