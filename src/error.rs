use std::{
    error::Error,
    fmt::{Display, Formatter},
    io,
    path::PathBuf,
};

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use ConfigError::*;
        match self {
            Missing(name) => write!(f, "{name} is not set"),
            Invalid {
                name,
                value,
                reason,
            } => write!(f, "{name}={value:?} is invalid: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Failure to deliver the login screenshot.
#[derive(Debug)]
pub enum NotifyError {
    AssetMissing { path: PathBuf, source: io::Error },
    Request(teloxide::RequestError),
}

impl From<teloxide::RequestError> for NotifyError {
    fn from(e: teloxide::RequestError) -> Self {
        NotifyError::Request(e)
    }
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use NotifyError::*;
        match self {
            AssetMissing { path, source } => {
                write!(f, "screenshot {} is unavailable: {source}", path.display())
            }
            Request(e) => Display::fmt(e, f),
        }
    }
}

impl Error for NotifyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NotifyError::AssetMissing { source, .. } => Some(source),
            NotifyError::Request(e) => Some(e),
        }
    }
}

#[derive(Debug)]
pub struct MalformedCallback(pub String);

impl Display for MalformedCallback {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed callback payload: {:?}", self.0)
    }
}

impl Error for MalformedCallback {}

#[derive(Debug)]
pub enum ServeError {
    IdParse,
    UrlParse(url::ParseError),
    Listener(teloxide::RequestError),
}

impl Display for ServeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use ServeError::*;
        match self {
            IdParse => write!(f, "failed to parse bot id from token"),
            UrlParse(e) => write!(f, "invalid webhook url: {e}"),
            Listener(e) => write!(f, "webhook listener error: {e}"),
        }
    }
}

impl Error for ServeError {}
