use thiserror::Error;

/// Failures talking to the paste store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("store rejected the request: {0}")]
    Rejected(String),

    #[error("no slot id in store response: {0:?}")]
    MissingSlot(String),
}

/// Failures running the local action.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("execution error: '{0}' not found on PATH")]
    NotFound(String),

    #[error("execution error: failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("execution error: '{program}' exited with {code}: {stderr}")]
    Failed {
        program: String,
        code: String,
        stderr: String,
    },
}

#[derive(Debug, Error)]
pub enum PasteboxError {
    #[error("config not found: {0} (run 'pastebox config init')")]
    ConfigNotFound(String),

    #[error("no command slot configured: set poller.command_slot or pass --slot")]
    NoCommandSlot,

    #[error("command text is empty")]
    EmptyCommand,

    #[error("failed to decode demo key: {0}")]
    Decode(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PasteboxError>;
