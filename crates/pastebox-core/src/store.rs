//! Client for the paste-hosting text store.
//!
//! The store is opaque: slots are read back as raw text from `raw_url/<slot>`
//! and new slots are created with a form POST to `api_url`. Updating an
//! existing slot is not supported, so every write creates a new slot.

use crate::config::{Expiry, StoreConfig};
use crate::error::StoreError;
use crate::slot::SlotId;
use reqwest::blocking::Client;
use serde::Serialize;
use tracing::debug;

/// `api_paste_private` value for unlisted pastes.
const UNLISTED: &str = "1";

/// Some rejections come back as HTTP 200 with this body prefix.
const REJECTION_PREFIX: &str = "Bad API request";

/// Longest response body kept in an error message.
const BODY_HINT_CHARS: usize = 200;

/// A new paste to create in the store. Always unlisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paste {
    pub text: String,
    pub name: String,
    pub expiry: Expiry,
}

/// A slot created by [`TextStore::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Created {
    pub slot: SlotId,
    pub url: String,
}

/// Read/write access to slots in the text store.
pub trait TextStore {
    /// Fetch the current text of `slot`. Any non-success status is an error.
    fn read(&self, slot: &SlotId) -> Result<String, StoreError>;

    /// Create a new slot holding `paste.text`.
    fn create(&self, paste: &Paste) -> Result<Created, StoreError>;
}

impl<T: TextStore + ?Sized> TextStore for &T {
    fn read(&self, slot: &SlotId) -> Result<String, StoreError> {
        (**self).read(slot)
    }

    fn create(&self, paste: &Paste) -> Result<Created, StoreError> {
        (**self).create(paste)
    }
}

/// [`TextStore`] backed by the store's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    api_url: String,
    raw_url: String,
    dev_key: String,
}

impl HttpStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(StoreError::Client)?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            raw_url: config.raw_url.trim_end_matches('/').to_string(),
            dev_key: config.dev_key.clone(),
        })
    }

    pub fn slot_url(&self, slot: &SlotId) -> String {
        format!("{}/{}", self.raw_url, slot)
    }
}

impl TextStore for HttpStore {
    fn read(&self, slot: &SlotId) -> Result<String, StoreError> {
        let url = self.slot_url(slot);
        debug!(%url, "fetching slot");
        let response = self.client.get(&url).send().map_err(|source| StoreError::Http {
            url: url.clone(),
            source,
        })?;
        let status = response.status();
        let body = response.text().map_err(|source| StoreError::Http {
            url: url.clone(),
            source,
        })?;
        if !status.is_success() {
            return Err(StoreError::Status {
                url,
                status: status.as_u16(),
                body: body_hint(&body),
            });
        }
        Ok(body)
    }

    fn create(&self, paste: &Paste) -> Result<Created, StoreError> {
        let form = [
            ("api_dev_key", self.dev_key.as_str()),
            ("api_option", "paste"),
            ("api_paste_code", paste.text.as_str()),
            ("api_paste_private", UNLISTED),
            ("api_paste_name", paste.name.as_str()),
            ("api_paste_expire_date", paste.expiry.as_str()),
        ];
        debug!(url = %self.api_url, name = %paste.name, "creating paste");
        let response = self
            .client
            .post(&self.api_url)
            .form(&form)
            .send()
            .map_err(|source| StoreError::Http {
                url: self.api_url.clone(),
                source,
            })?;
        let status = response.status();
        let body = response.text().map_err(|source| StoreError::Http {
            url: self.api_url.clone(),
            source,
        })?;
        if !status.is_success() {
            return Err(StoreError::Status {
                url: self.api_url.clone(),
                status: status.as_u16(),
                body: body_hint(&body),
            });
        }
        let body = body.trim();
        if body.starts_with(REJECTION_PREFIX) {
            return Err(StoreError::Rejected(body_hint(body)));
        }
        let slot = SlotId::from_response_url(body)?;
        Ok(Created {
            slot,
            url: body.to_string(),
        })
    }
}

fn body_hint(body: &str) -> String {
    body.trim().chars().take(BODY_HINT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn store_for(server: &mockito::ServerGuard) -> HttpStore {
        HttpStore::new(&StoreConfig {
            api_url: format!("{}/api/api_post.php", server.url()),
            raw_url: format!("{}/raw/", server.url()),
            dev_key: "dev-key".to_string(),
            timeout_secs: Some(5),
        })
        .unwrap()
    }

    fn paste(text: &str) -> Paste {
        Paste {
            text: text.to_string(),
            name: "Command Output".to_string(),
            expiry: Expiry::OneHour,
        }
    }

    #[test]
    fn read_returns_body_verbatim() {
        let mut server = mockito::Server::new();
        let m = server
            .mock("GET", "/raw/abc")
            .with_status(200)
            .with_body("run\n")
            .create();

        let store = store_for(&server);
        assert_eq!(store.read(&SlotId::from("abc")).unwrap(), "run\n");
        m.assert();
    }

    #[test]
    fn read_non_success_is_status_error() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/raw/abc")
            .with_status(500)
            .with_body("boom")
            .create();

        let err = store_for(&server).read(&SlotId::from("abc")).unwrap_err();
        match err {
            StoreError::Status { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_unreachable_host_is_http_error() {
        let store = HttpStore::new(&StoreConfig {
            raw_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: Some(2),
            ..StoreConfig::default()
        })
        .unwrap();
        let err = store.read(&SlotId::from("abc")).unwrap_err();
        assert!(matches!(err, StoreError::Http { .. }), "{err}");
    }

    #[test]
    fn create_posts_unlisted_form_and_parses_slot() {
        let mut server = mockito::Server::new();
        let m = server
            .mock("POST", "/api/api_post.php")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_dev_key".into(), "dev-key".into()),
                Matcher::UrlEncoded("api_option".into(), "paste".into()),
                Matcher::UrlEncoded("api_paste_code".into(), "alice\n".into()),
                Matcher::UrlEncoded("api_paste_private".into(), "1".into()),
                Matcher::UrlEncoded("api_paste_name".into(), "Command Output".into()),
                Matcher::UrlEncoded("api_paste_expire_date".into(), "1H".into()),
            ]))
            .with_status(200)
            .with_body("https://pastebin.com/Zz91")
            .create();

        let created = store_for(&server).create(&paste("alice\n")).unwrap();
        assert_eq!(created.slot.as_str(), "Zz91");
        assert_eq!(created.url, "https://pastebin.com/Zz91");
        m.assert();
    }

    #[test]
    fn create_bad_api_request_is_rejected() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("POST", "/api/api_post.php")
            .with_status(200)
            .with_body("Bad API request, invalid api_dev_key")
            .create();

        let err = store_for(&server).create(&paste("x")).unwrap_err();
        assert!(matches!(err, StoreError::Rejected(ref msg) if msg.contains("invalid api_dev_key")));
    }

    #[test]
    fn create_non_success_is_status_error() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("POST", "/api/api_post.php")
            .with_status(503)
            .with_body("maintenance")
            .create();

        let err = store_for(&server).create(&paste("x")).unwrap_err();
        assert!(matches!(err, StoreError::Status { status: 503, .. }));
    }

    #[test]
    fn create_without_slot_in_body_is_missing_slot() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("POST", "/api/api_post.php")
            .with_status(200)
            .with_body("")
            .create();

        let err = store_for(&server).create(&paste("x")).unwrap_err();
        assert!(matches!(err, StoreError::MissingSlot(_)));
    }

    #[test]
    fn slot_url_joins_without_double_slash() {
        let server = mockito::Server::new();
        let store = store_for(&server);
        assert_eq!(
            store.slot_url(&SlotId::from("abc")),
            format!("{}/raw/abc", server.url())
        );
    }

    #[test]
    fn error_bodies_are_truncated() {
        let long = "x".repeat(1000);
        assert_eq!(body_hint(&long).len(), BODY_HINT_CHARS);
    }
}
