use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use shared::{
    domain::GuestSide,
    protocol::{GuestPatch, NewGuest},
};
use tokio::sync::Mutex;

use super::*;
use crate::{cache::QueryKey, error::ClientResult, form::DraftField};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    List(WeddingId),
    Create(NewGuest),
    Update(GuestId, GuestPatch),
    Delete(GuestId),
}

#[derive(Default)]
struct FakeState {
    guests: Vec<Guest>,
    calls: Vec<Call>,
    fail_mutations: bool,
    next_id: i64,
}

#[derive(Clone, Default)]
struct FakeGuestApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeGuestApi {
    async fn seeded(guests: Vec<Guest>) -> Self {
        let api = Self::default();
        {
            let mut state = api.state.lock().await;
            state.next_id = guests.iter().map(|g| g.id.0).max().unwrap_or_default();
            state.guests = guests;
        }
        api
    }

    async fn calls(&self) -> Vec<Call> {
        self.state.lock().await.calls.clone()
    }

    async fn mutation_calls(&self) -> Vec<Call> {
        self.calls()
            .await
            .into_iter()
            .filter(|call| !matches!(call, Call::List(_)))
            .collect()
    }

    async fn fail_mutations(&self) {
        self.state.lock().await.fail_mutations = true;
    }
}

fn rejected() -> ClientError {
    ClientError::Upstream {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: Some("database unavailable".into()),
    }
}

#[async_trait]
impl GuestApi for FakeGuestApi {
    async fn list_guests(&self, wedding_id: WeddingId) -> ClientResult<Vec<Guest>> {
        let mut state = self.state.lock().await;
        state.calls.push(Call::List(wedding_id));
        Ok(state.guests.clone())
    }

    async fn create_guest(&self, guest: &NewGuest) -> ClientResult<Guest> {
        let mut state = self.state.lock().await;
        state.calls.push(Call::Create(guest.clone()));
        if state.fail_mutations {
            return Err(rejected());
        }
        state.next_id += 1;
        let created = Guest {
            id: GuestId(state.next_id),
            wedding_id: guest.wedding_id,
            name: guest.name.clone(),
            email: guest.email.clone(),
            phone: guest.phone.clone(),
            rsvp_status: guest.rsvp_status,
            plus_one: guest.plus_one,
            plus_one_name: guest.plus_one_name.clone(),
            additional_guests: guest.additional_guests,
            category: guest.category,
            side: guest.side,
            dietary_restrictions: guest.dietary_restrictions.clone(),
            address: guest.address.clone(),
            notes: guest.notes.clone(),
            created_at: None,
            responded_at: None,
        };
        state.guests.push(created.clone());
        Ok(created)
    }

    async fn update_guest(&self, guest_id: GuestId, patch: &GuestPatch) -> ClientResult<Guest> {
        let mut state = self.state.lock().await;
        state.calls.push(Call::Update(guest_id, patch.clone()));
        if state.fail_mutations {
            return Err(rejected());
        }
        let guest = state
            .guests
            .iter_mut()
            .find(|guest| guest.id == guest_id)
            .ok_or(ClientError::NotFound(guest_id))?;
        if let Some(name) = &patch.name {
            guest.name = name.clone();
        }
        if let Some(status) = patch.rsvp_status {
            guest.rsvp_status = status;
        }
        if patch.responded_at.is_some() {
            guest.responded_at = patch.responded_at;
        }
        Ok(guest.clone())
    }

    async fn delete_guest(&self, guest_id: GuestId) -> ClientResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(Call::Delete(guest_id));
        if state.fail_mutations {
            return Err(rejected());
        }
        state.guests.retain(|guest| guest.id != guest_id);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    seen: StdMutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    fn titles(&self) -> Vec<String> {
        self.seen
            .lock()
            .expect("notifier lock")
            .iter()
            .map(|(title, _)| title.clone())
            .collect()
    }

    fn last(&self) -> Option<(String, String)> {
        self.seen.lock().expect("notifier lock").last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, description: &str) {
        self.seen
            .lock()
            .expect("notifier lock")
            .push((title.to_string(), description.to_string()));
    }
}

/// Echoes keys so assertions can name them directly.
struct KeyTranslator;

impl Translator for KeyTranslator {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}

fn guest(id: i64, name: &str, status: RsvpStatus, category: GuestCategory) -> Guest {
    Guest {
        id: GuestId(id),
        wedding_id: WeddingId(5),
        name: name.to_string(),
        email: None,
        phone: None,
        rsvp_status: status,
        plus_one: false,
        plus_one_name: None,
        additional_guests: 0,
        category,
        side: GuestSide::Both,
        dietary_restrictions: None,
        address: None,
        notes: None,
        created_at: None,
        responded_at: None,
    }
}

async fn panel() -> (
    GuestListManager<FakeGuestApi>,
    FakeGuestApi,
    Arc<RecordingNotifier>,
) {
    let api = FakeGuestApi::seeded(vec![
        guest(1, "Alice", RsvpStatus::Confirmed, GuestCategory::Family),
        guest(2, "Bob", RsvpStatus::Pending, GuestCategory::Friends),
    ])
    .await;
    let notifier = Arc::new(RecordingNotifier::default());
    let manager = GuestListManager::with_collaborators(
        WeddingId(5),
        api.clone(),
        Arc::new(KeyTranslator),
        notifier.clone(),
    );
    (manager, api, notifier)
}

fn list_key() -> QueryKey {
    QueryKey::GuestsForWedding(WeddingId(5))
}

#[tokio::test]
async fn view_filters_by_status_and_summarizes_whole_list() {
    let (mut manager, _api, _notifier) = panel().await;
    manager.set_status_filter(Selection::Only(RsvpStatus::Confirmed));

    let view = manager.view().await.expect("view");

    assert_eq!(view.guests.len(), 1);
    assert_eq!(view.guests[0].name, "Alice");
    assert_eq!(view.stats.total, 2);
    assert_eq!(view.stats.confirmed, 1);
    assert_eq!(view.stats.pending, 1);
    assert_eq!(view.stats.declined, 0);
    assert_eq!(view.stats.maybe, 0);
}

#[tokio::test]
async fn invalid_create_never_reaches_the_api() {
    let (mut manager, api, notifier) = panel().await;
    manager.open_create();

    let err = manager.submit().await.expect_err("empty name");

    assert!(matches!(err, ManagerError::Form(FormError::Validation(_))));
    assert!(manager.form().errors().contains(DraftField::Name));
    assert!(manager.form().is_open());
    assert!(api.mutation_calls().await.is_empty());
    assert!(notifier.titles().is_empty());
}

#[tokio::test]
async fn create_closes_dialog_notifies_and_refetches() {
    let (mut manager, api, notifier) = panel().await;
    manager.view().await.expect("prime cache");
    manager.open_create();
    manager
        .form_mut()
        .set_field(DraftField::Name, "Carol")
        .expect("name");
    manager
        .form_mut()
        .set_field(DraftField::Email, "")
        .expect("email");

    let outcome = manager.submit().await.expect("create");

    let SubmitOutcome::Created(created) = outcome else {
        panic!("expected create");
    };
    assert_eq!(created.name, "Carol");
    assert!(!manager.form().is_open());
    assert_eq!(notifier.titles(), ["guestList.guestAdded"]);
    assert!(manager.store().cache().is_stale(list_key()).await);

    let view = manager.view().await.expect("refetched view");
    assert_eq!(view.stats.total, 3);

    let Some(Call::Create(body)) = api.mutation_calls().await.into_iter().next() else {
        panic!("expected create call");
    };
    assert_eq!(body.wedding_id, WeddingId(5));
    assert_eq!(body.email, None);
}

#[tokio::test]
async fn status_change_sends_partial_update_and_marks_list_stale() {
    let (mut manager, api, notifier) = panel().await;
    manager.view().await.expect("prime cache");

    let before = chrono::Utc::now();
    let updated = manager
        .update_status(GuestId(2), RsvpStatus::Declined)
        .await
        .expect("status update");

    assert_eq!(updated.rsvp_status, RsvpStatus::Declined);
    assert!(manager.store().cache().is_stale(list_key()).await);
    assert_eq!(
        notifier.last(),
        Some((
            "guestList.guestUpdated".to_string(),
            "guestList.guestUpdatedSuccess".to_string()
        ))
    );

    let calls = api.mutation_calls().await;
    let [Call::Update(guest_id, patch)] = calls.as_slice() else {
        panic!("expected a single update, got {calls:?}");
    };
    assert_eq!(*guest_id, GuestId(2));
    assert_eq!(patch.rsvp_status, Some(RsvpStatus::Declined));
    assert!(patch.responded_at.is_some_and(|at| at >= before));
    let expected = GuestPatch {
        rsvp_status: patch.rsvp_status,
        responded_at: patch.responded_at,
        ..GuestPatch::default()
    };
    assert_eq!(*patch, expected, "no other fields travel with a status change");
}

#[tokio::test]
async fn cancelled_edit_reopens_from_unmodified_record() {
    let (mut manager, api, _notifier) = panel().await;

    manager.open_edit(GuestId(2)).await.expect("open edit");
    manager
        .form_mut()
        .set_field(DraftField::Name, "Robert")
        .expect("name");
    manager
        .form_mut()
        .set_field(DraftField::RsvpStatus, "confirmed")
        .expect("status");
    manager.cancel();

    assert!(!manager.form().is_open());

    manager.open_edit(GuestId(2)).await.expect("reopen edit");
    assert_eq!(manager.form().draft().name, "Bob");
    assert_eq!(manager.form().draft().rsvp_status, RsvpStatus::Pending);
    assert!(api.mutation_calls().await.is_empty());
}

#[tokio::test]
async fn edit_submits_update_for_selected_guest() {
    let (mut manager, api, notifier) = panel().await;
    manager.open_edit(GuestId(1)).await.expect("open edit");
    manager
        .form_mut()
        .set_field(DraftField::Name, "Alice Cooper")
        .expect("name");

    let outcome = manager.submit().await.expect("update");

    assert!(matches!(outcome, SubmitOutcome::Updated(ref g) if g.name == "Alice Cooper"));
    assert!(!manager.form().is_open());
    assert_eq!(notifier.titles(), ["guestList.guestUpdated"]);
    let calls = api.mutation_calls().await;
    assert!(matches!(calls.as_slice(), [Call::Update(GuestId(1), _)]));
}

#[tokio::test]
async fn open_edit_for_unknown_guest_is_not_found() {
    let (mut manager, _api, _notifier) = panel().await;

    let err = manager.open_edit(GuestId(42)).await.expect_err("missing");

    assert!(matches!(
        err,
        ManagerError::Client(ClientError::NotFound(GuestId(42)))
    ));
    assert!(!manager.form().is_open());
}

#[tokio::test]
async fn failed_save_keeps_dialog_open_with_error() {
    let (mut manager, api, notifier) = panel().await;
    manager.view().await.expect("prime cache");
    api.fail_mutations().await;
    manager.open_create();
    manager.form_mut().draft_mut().name = "Dana".into();

    let err = manager.submit().await.expect_err("rejected");

    assert!(matches!(err, ManagerError::Client(ClientError::Upstream { .. })));
    assert!(manager.form().is_open());
    assert!(!manager.form().is_saving());
    assert_eq!(manager.form().draft().name, "Dana");
    assert!(manager
        .form()
        .last_error()
        .is_some_and(|message| message.contains("database unavailable")));
    assert_eq!(notifier.titles(), ["common.error"]);
    assert!(!manager.store().cache().is_stale(list_key()).await);
}

#[tokio::test]
async fn delete_notifies_and_drops_guest_from_next_view() {
    let (mut manager, _api, notifier) = panel().await;
    manager.view().await.expect("prime cache");

    manager.delete(GuestId(1)).await.expect("delete");

    assert_eq!(notifier.titles(), ["guestList.guestDeleted"]);
    let view = manager.view().await.expect("view");
    assert_eq!(view.stats.total, 1);
    assert_eq!(view.guests[0].name, "Bob");
}

#[tokio::test]
async fn empty_state_reflects_active_filters() {
    let (mut manager, _api, _notifier) = panel().await;
    manager.set_search("zelda");

    let view = manager.view().await.expect("view");

    assert!(view.guests.is_empty());
    assert_eq!(
        view.empty_state.map(|state| state.message_key()),
        Some("guestList.noGuestsFound")
    );
}

#[tokio::test]
async fn unset_wedding_shows_no_guests_without_fetching() {
    let api = FakeGuestApi::seeded(vec![guest(1, "Alice", RsvpStatus::Pending, GuestCategory::Family)]).await;
    let manager = GuestListManager::new(WeddingId(0), api.clone());

    let view = manager.view().await.expect("view");

    assert_eq!(view.stats.total, 0);
    assert_eq!(view.empty_state.map(|state| state.message_key()), Some("guestList.noGuestsYet"));
    assert!(api.calls().await.is_empty());
}

#[test]
fn english_catalog_falls_back_to_key() {
    let catalog = EnglishCatalog::default();
    assert_eq!(catalog.translate("guestList.confirmed"), "Confirmed");
    assert_eq!(catalog.translate("guestList.unknown"), "guestList.unknown");
}

#[tokio::test]
async fn status_change_in_edit_dialog_sends_timestamp() {
    let (mut manager, api, _notifier) = panel().await;
    manager.open_edit(GuestId(2)).await.expect("open edit");
    manager
        .form_mut()
        .set_field(DraftField::RsvpStatus, "declined")
        .expect("status");

    let outcome = manager.submit().await.expect("update");

    let SubmitOutcome::Updated(guest) = outcome else {
        panic!("expected update");
    };
    assert_eq!(guest.rsvp_status, RsvpStatus::Declined);
    assert!(guest.responded_at.is_some());
    let calls = api.mutation_calls().await;
    let [Call::Update(GuestId(2), patch)] = calls.as_slice() else {
        panic!("expected one update, got {calls:?}");
    };
    assert_eq!(patch.rsvp_status, Some(RsvpStatus::Declined));
    assert!(patch.responded_at.is_some());
}

#[tokio::test]
async fn create_without_wedding_never_reaches_the_api() {
    let api = FakeGuestApi::seeded(Vec::new()).await;
    let mut manager = GuestListManager::new(WeddingId(0), api.clone());
    manager.open_create();
    manager.form_mut().draft_mut().name = "Nora".into();

    let err = manager.submit().await.expect_err("no wedding");

    assert!(matches!(err, ManagerError::Form(FormError::NoWedding)));
    assert!(api.mutation_calls().await.is_empty());
}
