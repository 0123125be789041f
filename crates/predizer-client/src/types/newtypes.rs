use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use url::Url;
use uuid::Uuid;

use crate::utils::const_settings::DEFAULT_PREDICT_URL;

// ----- minimal error type -----
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    #[error("invalid endpoint: {0}")]
    Invalid(&'static str),
    #[error("invalid URL")]
    Url(#[from] url::ParseError),
}

/// Full URL of the prediction endpoint (scheme, host, port and path).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointUrl(#[serde(with = "serde_url")] Url);

mod serde_url {
    use super::*;
    use serde::{Deserializer, Serializer, de::Error};
    pub fn serialize<S: Serializer>(u: &Url, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(u.as_str())
    }
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Url, D::Error> {
        let s = String::deserialize(d)?;
        let url = Url::parse(&s).map_err(D::Error::custom)?;
        super::check_scheme(&url).map_err(D::Error::custom)?;
        Ok(url)
    }
}

fn check_scheme(url: &Url) -> Result<(), IdError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(IdError::Invalid("scheme must be http or https")),
    }
}

impl EndpointUrl {
    pub fn new(url: Url) -> Result<Self, IdError> {
        check_scheme(&url)?;
        Ok(Self(url))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for EndpointUrl {
    fn default() -> Self {
        Self(Url::parse(DEFAULT_PREDICT_URL).expect("default prediction URL is valid"))
    }
}

impl FromStr for EndpointUrl {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(Url::parse(s.trim())?)
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl fmt::Debug for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EndpointUrl").field(&self.0.as_str()).finish()
    }
}

/// Correlation id attached to the log lines of a single prediction request.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RequestId").field(&self.0).finish()
    }
}
