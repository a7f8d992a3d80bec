//! Blocking HTTP implementation of the remote service contract.
//!
//! Endpoints follow the backend's REST shape: `GET/POST /{resource}`,
//! `GET/PUT/DELETE /{resource}/{id}`, and `PUT /{resource}/order` for the
//! bulk order update. Every response body is wrapped in `{"data": ...}`.

use std::marker::PhantomData;

use tracing::debug;

use crate::model::entity::Entity;
use crate::remote::{Envelope, OrderEntry, Remote, RemoteError};

pub struct HttpRemote<E> {
    client: reqwest::blocking::Client,
    base_url: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> HttpRemote<E> {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        HttpRemote {
            client: reqwest::blocking::Client::new(),
            base_url,
            _entity: PhantomData,
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/{}{}", self.base_url, E::RESOURCE, suffix)
    }

    /// Map non-2xx responses to `RemoteError::Status`, carrying whatever
    /// message body the server sent.
    fn check(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().unwrap_or_default();
        Err(RemoteError::Status {
            status: status.as_u16(),
            message,
        })
    }

    fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::blocking::Response,
    ) -> Result<T, RemoteError> {
        let envelope: Envelope<T> = response
            .json()
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(envelope.data)
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::Transport(err.to_string())
    }
}

impl<E: Entity> Remote<E> for HttpRemote<E> {
    fn fetch_all(&mut self) -> Result<Vec<E>, RemoteError> {
        let url = self.url("");
        debug!(%url, "GET list");
        let response = self.client.get(&url).send()?;
        Self::decode(Self::check(response)?)
    }

    fn fetch_one(&mut self, id: &str) -> Result<E, RemoteError> {
        let url = self.url(&format!("/{}", id));
        debug!(%url, "GET one");
        let response = self.client.get(&url).send()?;
        Self::decode(Self::check(response)?)
    }

    fn create(&mut self, draft: &E::Draft) -> Result<E, RemoteError> {
        let url = self.url("");
        debug!(%url, "POST create");
        let response = self.client.post(&url).json(draft).send()?;
        Self::decode(Self::check(response)?)
    }

    fn update(&mut self, id: &str, patch: &E::Patch) -> Result<E, RemoteError> {
        let url = self.url(&format!("/{}", id));
        debug!(%url, "PUT update");
        let response = self.client.put(&url).json(patch).send()?;
        Self::decode(Self::check(response)?)
    }

    fn delete(&mut self, id: &str) -> Result<(), RemoteError> {
        let url = self.url(&format!("/{}", id));
        debug!(%url, "DELETE");
        let response = self.client.delete(&url).send()?;
        Self::check(response)?;
        Ok(())
    }

    fn update_order(&mut self, entries: &[OrderEntry]) -> Result<(), RemoteError> {
        let url = self.url("/order");
        debug!(%url, count = entries.len(), "PUT bulk order");
        let response = self.client.put(&url).json(entries).send()?;
        Self::check(response)?;
        Ok(())
    }
}
