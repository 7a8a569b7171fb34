use std::borrow::Cow;
use std::fmt;

/// Root error for every fallible operation in the crate.
///
/// Callers can match a single variant (`NotFound`, `Http`, ...) or simply
/// propagate `Error` as a whole.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("resource not found: {path}")]
    NotFound { path: String, body: String },

    #[error("HTTP {status} from {path}: {body}")]
    Http {
        status: u16,
        path: String,
        body: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// HTTP status of the failed response, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::NotFound { .. } => Some(404),
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A response body that does not match the shape of the expected model.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {model} payload{}: {message}", .field.as_ref().map(|f| format!(" at `{f}`")).unwrap_or_default())]
pub struct ValidationError {
    pub model: Cow<'static, str>,
    /// Dotted path of the offending field, when one can be named.
    pub field: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn new(
        model: impl Into<Cow<'static, str>>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// The body was not JSON at all.
    pub(crate) fn malformed(model: Cow<'static, str>, source: &serde_json::Error) -> Self {
        Self {
            model,
            field: None,
            message: format!("malformed JSON: {source}"),
        }
    }

    pub(crate) fn from_path_error(
        model: Cow<'static, str>,
        err: serde_path_to_error::Error<serde_json::Error>,
    ) -> Self {
        let path = err.path().to_string();
        let message = err.inner().to_string();
        let parent = (path != ".").then_some(path);

        // serde reports a missing field against its parent container
        let field = match missing_field(&message) {
            Some(name) => Some(match parent {
                Some(parent) => format!("{parent}.{name}"),
                None => name.to_owned(),
            }),
            None => parent,
        };

        Self {
            model,
            field,
            message,
        }
    }
}

fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
}

/// An argument rejected locally, before any request was sent.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {param}: {reason}")]
pub struct InvalidArgument {
    pub param: &'static str,
    pub reason: String,
}

impl InvalidArgument {
    pub fn new(param: &'static str, reason: impl Into<String>) -> Self {
        Self {
            param,
            reason: reason.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportErrorKind {
    Connect,
    Timeout,
    /// The response arrived but its body could not be read.
    Body,
    /// The request could not be built or sent for another reason.
    Request,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TransportErrorKind::Connect => "connection failed",
            TransportErrorKind::Timeout => "request timed out",
            TransportErrorKind::Body => "failed to read response body",
            TransportErrorKind::Request => "request failed",
        };
        f.write_str(text)
    }
}

/// Failure before a complete response was received.
#[derive(thiserror::Error, Debug)]
#[error("{kind} ({url}): {source}")]
pub struct TransportError {
    kind: TransportErrorKind,
    url: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    pub fn new(
        kind: TransportErrorKind,
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            kind,
            url: url.into(),
            source: source.into(),
        }
    }

    pub(crate) fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        let kind = if source.is_timeout() {
            TransportErrorKind::Timeout
        } else if source.is_connect() {
            TransportErrorKind::Connect
        } else if source.is_body() || source.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Request
        };
        Self::new(kind, url, source)
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid base URL {url:?}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("timeout must be non-zero")]
    ZeroTimeout,

    #[error(transparent)]
    EnvVar(#[from] EnvVarError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

#[derive(thiserror::Error, Debug)]
#[error("invalid value {value:?} for {var}: {reason}")]
pub struct EnvVarError {
    var: &'static str,
    value: String,
    reason: String,
}

impl EnvVarError {
    pub fn new(var: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            var,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
