//! Guest list client: remote store, query cache, draft form and filtered view.

pub mod cache;
pub mod collaborators;
pub mod error;
pub mod filter;
pub mod form;
pub mod manager;
pub mod store;

pub use cache::{QueryCache, QueryKey};
pub use collaborators::{EnglishCatalog, Notifier, TracingNotifier, Translator};
pub use error::{ClientError, ClientResult};
pub use filter::{EmptyState, GuestFilter, GuestListView, GuestStats, Selection};
pub use form::{DraftField, FieldErrors, FormController, FormError, FormMode, GuestDraft, Submission};
pub use manager::{GuestListManager, ManagerError, SubmitOutcome};
pub use store::{GuestApi, GuestStore, HttpGuestApi};
