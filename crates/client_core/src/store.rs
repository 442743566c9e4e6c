//! Remote guest collection access and the cached list that fronts it.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Guest, GuestId, RsvpStatus, WeddingId},
    error::UpstreamError,
    protocol::{GuestPatch, NewGuest},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    cache::{QueryCache, QueryKey},
    error::{ClientError, ClientResult},
};

#[async_trait]
pub trait GuestApi: Send + Sync {
    async fn list_guests(&self, wedding_id: WeddingId) -> ClientResult<Vec<Guest>>;
    async fn create_guest(&self, guest: &NewGuest) -> ClientResult<Guest>;
    async fn update_guest(&self, guest_id: GuestId, patch: &GuestPatch) -> ClientResult<Guest>;
    async fn delete_guest(&self, guest_id: GuestId) -> ClientResult<()>;
}

/// reqwest-backed [`GuestApi`] talking to `/api/guests`.
#[derive(Clone)]
pub struct HttpGuestApi {
    http: Client,
    base_url: Url,
}

impl HttpGuestApi {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Transport)?;
        Self::with_client(base_url, http)
    }

    pub fn with_client(base_url: &str, http: Client) -> ClientResult<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|source| {
            ClientError::InvalidUrl {
                url: base_url.to_string(),
                source,
            }
        })?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }
}

/// Keeps upstream status/message so callers can tell 4xx from transport trouble.
async fn checked(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<UpstreamError>()
        .await
        .ok()
        .map(|payload| payload.message);
    Err(ClientError::Upstream { status, message })
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    checked(response)
        .await?
        .json::<T>()
        .await
        .map_err(ClientError::Decode)
}

#[async_trait]
impl GuestApi for HttpGuestApi {
    async fn list_guests(&self, wedding_id: WeddingId) -> ClientResult<Vec<Guest>> {
        let url = self.endpoint(&format!("/api/guests/wedding/{wedding_id}"));
        debug!(%url, "fetching guest list");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        decode(response).await
    }

    async fn create_guest(&self, guest: &NewGuest) -> ClientResult<Guest> {
        let url = self.endpoint("/api/guests");
        debug!(%url, wedding_id = %guest.wedding_id, "creating guest");
        let response = self
            .http
            .post(url)
            .json(guest)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        decode(response).await
    }

    async fn update_guest(&self, guest_id: GuestId, patch: &GuestPatch) -> ClientResult<Guest> {
        let url = self.endpoint(&format!("/api/guests/{guest_id}"));
        debug!(%url, "updating guest");
        let response = self
            .http
            .patch(url)
            .json(patch)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        decode(response).await
    }

    async fn delete_guest(&self, guest_id: GuestId) -> ClientResult<()> {
        let url = self.endpoint(&format!("/api/guests/{guest_id}"));
        debug!(%url, "deleting guest");
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        checked(response).await?;
        Ok(())
    }
}

/// A [`GuestApi`] fronted by a per-wedding list cache that every mutation invalidates.
pub struct GuestStore<A: GuestApi> {
    api: A,
    cache: QueryCache<Vec<Guest>>,
}

impl<A: GuestApi> GuestStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            cache: QueryCache::new(),
        }
    }

    pub fn cache(&self) -> &QueryCache<Vec<Guest>> {
        &self.cache
    }

    /// The wedding's guests, served from cache while fresh.
    ///
    /// Disabled for an unset wedding id: no request is made and the list is empty.
    pub async fn guests(&self, wedding_id: WeddingId) -> ClientResult<Vec<Guest>> {
        if !wedding_id.is_set() {
            return Ok(Vec::new());
        }

        let key = QueryKey::GuestsForWedding(wedding_id);
        if let Some(guests) = self.cache.fresh(key).await {
            return Ok(guests);
        }

        let generation = self.cache.generation(key).await;
        let fetched = self.api.list_guests(wedding_id).await?;
        let total = fetched.len();
        let guests: Vec<Guest> = fetched
            .into_iter()
            .filter(|guest| guest.wedding_id == wedding_id)
            .collect();
        if guests.len() != total {
            warn!(
                %wedding_id,
                dropped = total - guests.len(),
                "guest list contained rows from another wedding"
            );
        }

        self.cache.put(key, guests.clone(), generation).await;
        Ok(guests)
    }

    pub async fn create(&self, guest: &NewGuest) -> ClientResult<Guest> {
        let result = self.api.create_guest(guest).await;
        self.settle(guest.wedding_id, "create", result).await
    }

    pub async fn update(
        &self,
        wedding_id: WeddingId,
        guest_id: GuestId,
        patch: &GuestPatch,
    ) -> ClientResult<Guest> {
        let result = self.api.update_guest(guest_id, patch).await;
        self.settle(wedding_id, "update", result).await
    }

    /// Sends `{ rsvpStatus, respondedAt: now }` for one guest.
    pub async fn set_rsvp_status(
        &self,
        wedding_id: WeddingId,
        guest_id: GuestId,
        status: RsvpStatus,
    ) -> ClientResult<Guest> {
        let patch = GuestPatch::rsvp(status, Utc::now());
        self.update(wedding_id, guest_id, &patch).await
    }

    pub async fn delete(&self, wedding_id: WeddingId, guest_id: GuestId) -> ClientResult<()> {
        let result = self.api.delete_guest(guest_id).await;
        self.settle(wedding_id, "delete", result).await
    }

    async fn settle<T>(
        &self,
        wedding_id: WeddingId,
        action: &'static str,
        result: ClientResult<T>,
    ) -> ClientResult<T> {
        match result {
            Ok(value) => {
                self.cache
                    .invalidate(QueryKey::GuestsForWedding(wedding_id))
                    .await;
                info!(%wedding_id, action, "guest mutation succeeded");
                Ok(value)
            }
            Err(err) => {
                warn!(%wedding_id, action, error = %err, "guest mutation failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
