//! Typed access to the content API.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{
    merge_lists, ApiRequest, CacheStore, ConsoleConfig, ConsoleError, ContentCache, Entry,
    HttpTransport, Method, Transport,
};
use crate::models::{Entity, Locale};

/// Console-side client for one server.
#[derive(Debug, Clone)]
pub struct ContentClient<T> {
    transport: T,
    base_url: String,
    locale: Locale,
}

impl ContentClient<HttpTransport> {
    /// Connect over HTTP with the given settings.
    pub fn connect(config: &ConsoleConfig) -> Result<Self, ConsoleError> {
        let transport = HttpTransport::new(&config.base_url, config.token.clone(), config.timeout)?;
        Ok(Self::new(transport, &config.base_url, config.locale))
    }
}

impl<T: Transport> ContentClient<T> {
    pub fn new(transport: T, base_url: &str, locale: Locale) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            locale,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Absolute URL of a stored upload path such as `uploads/abc-file.pdf`.
    pub fn asset_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Every document of the collection with both locales.
    pub async fn list<E: Entity>(&self) -> Result<Vec<Entry<E>>, ConsoleError> {
        let data = self
            .transport
            .send(ApiRequest::get(format!("/{}", E::COLLECTION)))
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    /// The collection as rendered for one locale.
    pub async fn list_localized(
        &self,
        collection: &str,
        locale: Locale,
    ) -> Result<Value, ConsoleError> {
        self.transport
            .send(ApiRequest::get(format!("/{}/{}", collection, locale.code())))
            .await
    }

    /// Rebuild the bilingual records from the English and Hindi views.
    pub async fn fetch_bilingual<E: Entity>(&self) -> Result<Vec<Entry<E>>, ConsoleError> {
        let (en, hi) = tokio::try_join!(
            self.list_localized(E::COLLECTION, Locale::En),
            self.list_localized(E::COLLECTION, Locale::Hi),
        )?;

        let (Value::Array(en), Value::Array(hi)) = (en, hi) else {
            return Err(ConsoleError::Decode(format!(
                "expected lists for {}",
                E::COLLECTION
            )));
        };
        let merged = merge_lists(&en, &hi, E::LOCALIZED)?;
        Ok(serde_json::from_value(Value::Array(merged))?)
    }

    /// The localized view through the cache, fetching on a miss.
    pub async fn cached_localized<S: CacheStore>(
        &self,
        cache: &ContentCache<S>,
        collection: &str,
        now: DateTime<Utc>,
    ) -> Result<Value, ConsoleError> {
        cache
            .read_through(collection, self.locale, now, || {
                self.list_localized(collection, self.locale)
            })
            .await
    }

    pub async fn create<E: Entity>(&self, entry: &Entry<E>) -> Result<Entry<E>, ConsoleError> {
        let body = entry.request_body()?;
        let data = self
            .transport
            .send(ApiRequest::with_body(
                Method::Post,
                format!("/{}", E::COLLECTION),
                body,
            ))
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn update<E: Entity>(
        &self,
        id: &str,
        entry: &Entry<E>,
    ) -> Result<Entry<E>, ConsoleError> {
        let body = entry.request_body()?;
        let data = self
            .transport
            .send(ApiRequest::with_body(
                Method::Put,
                format!("/{}/{}", E::COLLECTION, id),
                body,
            ))
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn delete<E: Entity>(&self, id: &str) -> Result<(), ConsoleError> {
        self.transport
            .send(ApiRequest::delete(format!("/{}/{}", E::COLLECTION, id)))
            .await?;
        Ok(())
    }
}
