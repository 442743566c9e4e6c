//! The guest list panel: one wedding's cached list, filters and edit dialog.

use std::sync::Arc;

use shared::domain::{Guest, GuestCategory, GuestId, RsvpStatus, WeddingId};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    collaborators::{EnglishCatalog, Notifier, Translator, TracingNotifier},
    error::ClientError,
    filter::{GuestFilter, GuestListView, Selection},
    form::{FormController, FormError, Submission},
    store::{GuestApi, GuestStore},
};

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Form(#[from] FormError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(Guest),
    Updated(Guest),
}

pub struct GuestListManager<A: GuestApi> {
    wedding_id: WeddingId,
    store: GuestStore<A>,
    form: FormController,
    filter: GuestFilter,
    translator: Arc<dyn Translator>,
    notifier: Arc<dyn Notifier>,
}

impl<A: GuestApi> GuestListManager<A> {
    pub fn new(wedding_id: WeddingId, api: A) -> Self {
        Self::with_collaborators(
            wedding_id,
            api,
            Arc::new(EnglishCatalog::default()),
            Arc::new(TracingNotifier),
        )
    }

    pub fn with_collaborators(
        wedding_id: WeddingId,
        api: A,
        translator: Arc<dyn Translator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            wedding_id,
            store: GuestStore::new(api),
            form: FormController::new(wedding_id),
            filter: GuestFilter::default(),
            translator,
            notifier,
        }
    }

    pub fn wedding_id(&self) -> WeddingId {
        self.wedding_id
    }

    pub fn store(&self) -> &GuestStore<A> {
        &self.store
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController {
        &mut self.form
    }

    pub fn filter(&self) -> &GuestFilter {
        &self.filter
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filter.search = term.into();
    }

    pub fn set_status_filter(&mut self, status: Selection<RsvpStatus>) {
        self.filter.status = status;
    }

    pub fn set_category_filter(&mut self, category: Selection<GuestCategory>) {
        self.filter.category = category;
    }

    pub fn translate(&self, key: &str) -> String {
        self.translator.translate(key)
    }

    pub async fn guests(&self) -> Result<Vec<Guest>, ClientError> {
        self.store.guests(self.wedding_id).await
    }

    pub async fn view(&self) -> Result<GuestListView, ClientError> {
        let guests = self.guests().await?;
        Ok(GuestListView::derive(&guests, &self.filter))
    }

    pub fn open_create(&mut self) {
        self.form.open_for_create();
    }

    /// Opens the dialog on the backend's current copy of the guest.
    pub async fn open_edit(&mut self, guest_id: GuestId) -> Result<(), ManagerError> {
        let guests = self.guests().await?;
        let guest = guests
            .iter()
            .find(|guest| guest.id == guest_id)
            .ok_or(ClientError::NotFound(guest_id))?;
        self.form.open_for_edit(guest);
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.form.cancel();
    }

    pub async fn submit(&mut self) -> Result<SubmitOutcome, ManagerError> {
        let submission = self.form.submit()?;
        let result = match submission {
            Submission::Create(guest) => self
                .store
                .create(&guest)
                .await
                .map(SubmitOutcome::Created),
            Submission::Update(guest_id, patch) => self
                .store
                .update(self.wedding_id, guest_id, &patch)
                .await
                .map(SubmitOutcome::Updated),
        };

        match result {
            Ok(outcome) => {
                self.form.succeeded();
                match &outcome {
                    SubmitOutcome::Created(guest) => {
                        debug!(guest_id = %guest.id, "guest created");
                        self.notify("guestList.guestAdded", "guestList.guestAddedSuccess");
                    }
                    SubmitOutcome::Updated(guest) => {
                        debug!(guest_id = %guest.id, "guest updated");
                        self.notify("guestList.guestUpdated", "guestList.guestUpdatedSuccess");
                    }
                }
                Ok(outcome)
            }
            Err(err) => {
                self.form.failed(err.to_string());
                self.report_failure(&err);
                Err(err.into())
            }
        }
    }

    pub async fn update_status(
        &mut self,
        guest_id: GuestId,
        status: RsvpStatus,
    ) -> Result<Guest, ManagerError> {
        match self
            .store
            .set_rsvp_status(self.wedding_id, guest_id, status)
            .await
        {
            Ok(guest) => {
                self.notify("guestList.guestUpdated", "guestList.guestUpdatedSuccess");
                Ok(guest)
            }
            Err(err) => {
                self.report_failure(&err);
                Err(err.into())
            }
        }
    }

    pub async fn delete(&mut self, guest_id: GuestId) -> Result<(), ManagerError> {
        match self.store.delete(self.wedding_id, guest_id).await {
            Ok(()) => {
                self.notify("guestList.guestDeleted", "guestList.guestDeletedSuccess");
                Ok(())
            }
            Err(err) => {
                self.report_failure(&err);
                Err(err.into())
            }
        }
    }

    fn notify(&self, title_key: &str, description_key: &str) {
        self.notifier.notify(
            &self.translator.translate(title_key),
            &self.translator.translate(description_key),
        );
    }

    fn report_failure(&self, err: &ClientError) {
        warn!(wedding_id = %self.wedding_id, kind = ?err.kind(), error = %err, "guest action failed");
        self.notifier
            .notify(&self.translator.translate("common.error"), &err.to_string());
    }
}

#[cfg(test)]
#[path = "tests/manager_tests.rs"]
mod tests;
