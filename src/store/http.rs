use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::{entry_url, CatalogEntry, ModelStore};
use crate::error::{ViewerError, ViewerResult};
use crate::loaders::SceneDocument;
use crate::model_id::ModelId;

/// Listing rows only need the id; the scene payload is ignored.
/// The id stays untyped so one bad row cannot fail the whole listing.
#[derive(Deserialize)]
struct ListingRow {
    #[serde(default)]
    id: Value,
}

impl ListingRow {
    fn into_id(self) -> Option<ModelId> {
        let raw = match self.id {
            Value::String(raw) => raw,
            other => {
                log::warn!("Skipping catalog row: id {} is not a string", other);
                return None;
            }
        };
        match ModelId::new(raw) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("Skipping catalog row: {}", e);
                None
            }
        }
    }
}

/// Borrowed form of `CatalogEntry` for request bodies
#[derive(Serialize)]
struct EntryRef<'a> {
    id: &'a ModelId,
    scene: &'a SceneDocument,
}

/// Catalog client over HTTP/JSON
#[derive(Debug, Clone)]
pub struct HttpModelStore {
    client: Client,
    base_url: Url,
}

impl HttpModelStore {
    pub fn new(base_url: Url, timeout: Duration) -> ViewerResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl ModelStore for HttpModelStore {
    fn list_all(&self) -> ViewerResult<Vec<ModelId>> {
        log::debug!("GET {}", self.base_url);

        let response = self.client.get(self.base_url.clone()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ViewerError::StoreUnavailable(format!(
                "listing {} returned {}",
                self.base_url, status
            )));
        }

        let rows: Vec<ListingRow> = response.json()?;
        let ids = rows
            .into_iter()
            .filter_map(ListingRow::into_id)
            .collect::<Vec<_>>();

        log::info!("Catalog lists {} models", ids.len());
        Ok(ids)
    }

    fn fetch_one(&self, id: &ModelId) -> ViewerResult<SceneDocument> {
        let url = entry_url(&self.base_url, id);
        log::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send()?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(ViewerError::NotFound(id.clone())),
            status if !status.is_success() => Err(ViewerError::StoreUnavailable(format!(
                "fetching {} returned {}",
                url, status
            ))),
            _ => {
                let entry: CatalogEntry = response.json()?;
                Ok(entry.scene)
            }
        }
    }

    fn submit(&self, id: &ModelId, doc: &SceneDocument) -> ViewerResult<()> {
        log::debug!("POST {} id={}", self.base_url, id);

        let body = EntryRef { id, scene: doc };
        // .json() sets Content-Type: application/json
        let response = self.client.post(self.base_url.clone()).json(&body).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ViewerError::StoreUnavailable(format!(
                "storing {} returned {}",
                id, status
            )));
        }

        log::info!("Model {} stored in catalog", id);
        Ok(())
    }
}
