// showroom-client/src/remote.rs
// 远程目录服务 - 每个产品族一个集合

use crate::auth::Credential;
use crate::error::ClientResult;
use crate::http::NetworkHttpClient;
use async_trait::async_trait;
use serde_json::Value;
use shared::catalog::{CatalogRecord, ProductFamily};
use std::marker::PhantomData;

/// Remote collection of one record family
#[async_trait]
pub trait CatalogApi<R: CatalogRecord>: Send + Sync {
    fn family(&self) -> ProductFamily;

    async fn fetch_all(&self) -> ClientResult<Vec<R>>;

    async fn create(&self, payload: &Value, credential: &Credential) -> ClientResult<R>;

    async fn update(&self, id: &str, payload: &Value, credential: &Credential) -> ClientResult<R>;

    async fn delete(&self, id: &str, credential: &Credential) -> ClientResult<()>;
}

/// REST-backed collection under `/api/<family>`
#[derive(Debug)]
pub struct RemoteCatalog<R> {
    http: NetworkHttpClient,
    family: ProductFamily,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for RemoteCatalog<R> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            family: self.family,
            _record: PhantomData,
        }
    }
}

impl<R: CatalogRecord> RemoteCatalog<R> {
    pub fn new(http: NetworkHttpClient, family: ProductFamily) -> Self {
        Self {
            http,
            family,
            _record: PhantomData,
        }
    }

    fn collection(&self) -> String {
        format!("api/{}", self.family.path())
    }

    fn item(&self, id: &str) -> String {
        format!("api/{}/{}", self.family.path(), id)
    }
}

#[async_trait]
impl<R: CatalogRecord> CatalogApi<R> for RemoteCatalog<R> {
    fn family(&self) -> ProductFamily {
        self.family
    }

    /// Documents that fail to deserialize are skipped so one bad row does not
    /// hide the whole collection.
    async fn fetch_all(&self) -> ClientResult<Vec<R>> {
        let documents: Vec<Value> = self.http.get(&self.collection()).await?;
        let total = documents.len();
        let records: Vec<R> = documents
            .into_iter()
            .enumerate()
            .filter_map(|(index, doc)| match serde_json::from_value::<R>(doc) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(family = %self.family, index, error = %e, "Skipping malformed record");
                    None
                }
            })
            .collect();
        tracing::debug!(family = %self.family, total, kept = records.len(), "Fetched collection");
        Ok(records)
    }

    async fn create(&self, payload: &Value, credential: &Credential) -> ClientResult<R> {
        self.http
            .post(&self.collection(), payload, Some(credential))
            .await
    }

    async fn update(&self, id: &str, payload: &Value, credential: &Credential) -> ClientResult<R> {
        self.http.put(&self.item(id), payload, Some(credential)).await
    }

    async fn delete(&self, id: &str, credential: &Credential) -> ClientResult<()> {
        self.http.delete(&self.item(id), Some(credential)).await
    }
}
