//! Guest draft editing: validation and the closed/creating/editing dialog modes.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::Utc;
use shared::{
    domain::{Guest, GuestCategory, GuestId, GuestSide, RsvpStatus, WeddingId},
    protocol::{GuestPatch, NewGuest},
};
use thiserror::Error;
use tracing::debug;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

/// The editable subset of a guest. Optional text is held as `""` while editing.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct GuestDraft {
    #[validate(custom(function = "validate_required"))]
    pub name: String,
    #[validate(custom(function = "validate_optional_email"))]
    pub email: String,
    pub phone: String,
    pub rsvp_status: RsvpStatus,
    pub plus_one: bool,
    pub plus_one_name: String,
    #[validate(range(min = 0, message = "must be zero or more"))]
    pub additional_guests: i64,
    pub category: GuestCategory,
    pub side: GuestSide,
    pub dietary_restrictions: String,
    pub address: String,
    pub notes: String,
}

impl Default for GuestDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            rsvp_status: RsvpStatus::Pending,
            plus_one: false,
            plus_one_name: String::new(),
            additional_guests: 0,
            category: GuestCategory::Family,
            side: GuestSide::Both,
            dietary_restrictions: String::new(),
            address: String::new(),
            notes: String::new(),
        }
    }
}

fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message("is required".into()));
    }
    Ok(())
}

fn validate_optional_email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message("must be a valid email address".into()))
}

fn present(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl GuestDraft {
    pub fn from_guest(guest: &Guest) -> Self {
        Self {
            name: guest.name.clone(),
            email: guest.email.clone().unwrap_or_default(),
            phone: guest.phone.clone().unwrap_or_default(),
            rsvp_status: guest.rsvp_status,
            plus_one: guest.plus_one,
            plus_one_name: guest.plus_one_name.clone().unwrap_or_default(),
            additional_guests: i64::from(guest.additional_guests),
            category: guest.category,
            side: guest.side,
            dietary_restrictions: guest.dietary_restrictions.clone().unwrap_or_default(),
            address: guest.address.clone().unwrap_or_default(),
            notes: guest.notes.clone().unwrap_or_default(),
        }
    }

    /// Validated create body. Empty optional text becomes `null`; a plus-one name
    /// is only sent when a plus-one is allowed.
    pub fn to_new_guest(&self, wedding_id: WeddingId) -> Result<NewGuest, FieldErrors> {
        self.validate().map_err(FieldErrors::from)?;
        let additional_guests = u32::try_from(self.additional_guests).map_err(|_| {
            FieldErrors::single(DraftField::AdditionalGuests, "must be zero or more")
        })?;

        Ok(NewGuest {
            wedding_id,
            name: self.name.trim().to_string(),
            email: present(&self.email),
            phone: present(&self.phone),
            rsvp_status: self.rsvp_status,
            plus_one: self.plus_one,
            plus_one_name: if self.plus_one {
                present(&self.plus_one_name)
            } else {
                None
            },
            additional_guests,
            category: self.category,
            side: self.side,
            dietary_restrictions: present(&self.dietary_restrictions),
            address: present(&self.address),
            notes: present(&self.notes),
        })
    }

    /// Sets one field from raw input text, parsing enums, flags and counts.
    pub fn set_field(&mut self, field: DraftField, raw: &str) -> Result<(), FieldErrors> {
        fn parse<T: FromStr>(field: DraftField, raw: &str) -> Result<T, FieldErrors>
        where
            T::Err: fmt::Display,
        {
            raw.trim()
                .parse::<T>()
                .map_err(|err| FieldErrors::single(field, err.to_string()))
        }

        match field {
            DraftField::Name => self.name = raw.to_string(),
            DraftField::Email => self.email = raw.to_string(),
            DraftField::Phone => self.phone = raw.to_string(),
            DraftField::RsvpStatus => self.rsvp_status = parse(field, raw)?,
            DraftField::PlusOne => {
                self.plus_one = match raw.trim().to_ascii_lowercase().as_str() {
                    "true" | "yes" | "1" | "on" => true,
                    "false" | "no" | "0" | "off" | "" => false,
                    _ => return Err(FieldErrors::single(field, "must be yes or no")),
                }
            }
            DraftField::PlusOneName => self.plus_one_name = raw.to_string(),
            DraftField::AdditionalGuests => {
                self.additional_guests = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| FieldErrors::single(field, "must be a whole number"))?
            }
            DraftField::Category => self.category = parse(field, raw)?,
            DraftField::Side => self.side = parse(field, raw)?,
            DraftField::DietaryRestrictions => self.dietary_restrictions = raw.to_string(),
            DraftField::Address => self.address = raw.to_string(),
            DraftField::Notes => self.notes = raw.to_string(),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DraftField {
    Name,
    Email,
    Phone,
    RsvpStatus,
    PlusOne,
    PlusOneName,
    AdditionalGuests,
    Category,
    Side,
    DietaryRestrictions,
    Address,
    Notes,
}

impl DraftField {
    pub fn as_str(self) -> &'static str {
        match self {
            DraftField::Name => "name",
            DraftField::Email => "email",
            DraftField::Phone => "phone",
            DraftField::RsvpStatus => "rsvpStatus",
            DraftField::PlusOne => "plusOne",
            DraftField::PlusOneName => "plusOneName",
            DraftField::AdditionalGuests => "additionalGuests",
            DraftField::Category => "category",
            DraftField::Side => "side",
            DraftField::DietaryRestrictions => "dietaryRestrictions",
            DraftField::Address => "address",
            DraftField::Notes => "notes",
        }
    }

    fn from_struct_field(name: &str) -> Option<Self> {
        Some(match name {
            "name" => DraftField::Name,
            "email" => DraftField::Email,
            "phone" => DraftField::Phone,
            "rsvp_status" => DraftField::RsvpStatus,
            "plus_one" => DraftField::PlusOne,
            "plus_one_name" => DraftField::PlusOneName,
            "additional_guests" => DraftField::AdditionalGuests,
            "category" => DraftField::Category,
            "side" => DraftField::Side,
            "dietary_restrictions" => DraftField::DietaryRestrictions,
            "address" => DraftField::Address,
            "notes" => DraftField::Notes,
            _ => return None,
        })
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inline messages keyed by the field they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<DraftField, Vec<String>>,
}

impl FieldErrors {
    pub fn single(field: DraftField, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: DraftField, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    pub fn get(&self, field: DraftField) -> &[String] {
        self.errors.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, field: DraftField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DraftField, &[String])> {
        self.errors
            .iter()
            .map(|(field, messages)| (*field, messages.as_slice()))
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(value: ValidationErrors) -> Self {
        let mut errors = Self::default();
        for (name, failures) in value.field_errors() {
            let Some(field) = DraftField::from_struct_field(name.as_ref()) else {
                continue;
            };
            for failure in failures {
                let message = failure
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| failure.code.to_string());
                errors.push(field, message);
            }
        }
        errors
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field} {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("invalid guest: {0}")]
    Validation(FieldErrors),
    #[error("a save is already in progress")]
    Busy,
    #[error("the guest dialog is not open")]
    Closed,
    #[error("no wedding selected")]
    NoWedding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Closed,
    Creating,
    Editing(GuestId),
}

/// What a successful submit asks the store to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Create(NewGuest),
    Update(GuestId, GuestPatch),
}

pub struct FormController {
    wedding_id: WeddingId,
    mode: FormMode,
    draft: GuestDraft,
    /// Status of the guest being edited, to detect an RSVP change on submit.
    original_status: RsvpStatus,
    errors: FieldErrors,
    saving: bool,
    last_error: Option<String>,
}

impl FormController {
    pub fn new(wedding_id: WeddingId) -> Self {
        Self {
            wedding_id,
            mode: FormMode::Closed,
            draft: GuestDraft::default(),
            original_status: RsvpStatus::default(),
            errors: FieldErrors::default(),
            saving: false,
            last_error: None,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != FormMode::Closed
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn draft(&self) -> &GuestDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut GuestDraft {
        &mut self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn open_for_create(&mut self) {
        self.reset();
        self.mode = FormMode::Creating;
    }

    pub fn open_for_edit(&mut self, guest: &Guest) {
        self.reset();
        self.draft = GuestDraft::from_guest(guest);
        self.original_status = guest.rsvp_status;
        self.mode = FormMode::Editing(guest.id);
    }

    /// Records a field edit; parse failures show up as that field's error.
    pub fn set_field(&mut self, field: DraftField, raw: &str) -> Result<(), FieldErrors> {
        match self.draft.set_field(field, raw) {
            Ok(()) => {
                self.errors.errors.remove(&field);
                Ok(())
            }
            Err(errors) => {
                for (field, messages) in errors.iter() {
                    for message in messages {
                        self.errors.push(field, message.clone());
                    }
                }
                Err(errors)
            }
        }
    }

    /// Validates the draft and, when it passes, enters the saving state.
    ///
    /// An edit that changes the RSVP status stamps `respondedAt`.
    pub fn submit(&mut self) -> Result<Submission, FormError> {
        if self.saving {
            return Err(FormError::Busy);
        }
        if self.mode == FormMode::Closed {
            return Err(FormError::Closed);
        }
        if !self.wedding_id.is_set() {
            return Err(FormError::NoWedding);
        }
        let original_status = self.original_status;
        let submission = match self.mode {
            FormMode::Closed => return Err(FormError::Closed),
            FormMode::Creating => self
                .draft
                .to_new_guest(self.wedding_id)
                .map(Submission::Create),
            FormMode::Editing(guest_id) => self.draft.to_new_guest(self.wedding_id).map(|guest| {
                let mut patch = GuestPatch::from_new_guest(guest);
                if patch.rsvp_status != Some(original_status) {
                    patch.responded_at = Some(Utc::now());
                }
                Submission::Update(guest_id, patch)
            }),
        };

        match submission {
            Ok(submission) => {
                self.errors = FieldErrors::default();
                self.last_error = None;
                self.saving = true;
                Ok(submission)
            }
            Err(errors) => {
                debug!(%errors, "guest draft rejected");
                self.errors = errors.clone();
                Err(FormError::Validation(errors))
            }
        }
    }

    pub fn succeeded(&mut self) {
        self.reset();
        self.mode = FormMode::Closed;
    }

    /// Keeps the dialog open with the draft intact so the user can retry.
    pub fn failed(&mut self, message: impl Into<String>) {
        self.saving = false;
        self.last_error = Some(message.into());
    }

    pub fn cancel(&mut self) {
        self.reset();
        self.mode = FormMode::Closed;
    }

    fn reset(&mut self) {
        self.draft = GuestDraft::default();
        self.original_status = RsvpStatus::default();
        self.errors = FieldErrors::default();
        self.saving = false;
        self.last_error = None;
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
