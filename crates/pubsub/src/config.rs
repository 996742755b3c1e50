use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error raised when a configured provider kind string is not recognized.
#[derive(Debug, Error)]
#[error("unknown provider kind `{kind}`")]
pub struct UnknownProviderKind {
    /// The unrecognized kind string.
    pub kind: String,
}

/// The transport implementation a provider configuration selects.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProviderKind {
    /// In-process provider that fans out synchronously at post time.
    MemoryCallback,

    /// In-process provider that queues at post time and delivers on poll.
    MemoryPolling,

    /// NATS-backed provider delivering asynchronously via subscriptions.
    Nats,
}

impl ProviderKind {
    /// The configuration string for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MemoryCallback => "memory-callback",
            Self::MemoryPolling => "memory-polling",
            Self::Nats => "nats",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = UnknownProviderKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory-callback" => Ok(Self::MemoryCallback),
            "memory-polling" => Ok(Self::MemoryPolling),
            "nats" => Ok(Self::Nats),
            other => Err(UnknownProviderKind {
                kind: other.to_owned(),
            }),
        }
    }
}

/// The configuration of one provider instance.
///
/// `kind` is carried as the raw configured string; it is parsed to a
/// [`ProviderKind`] at resolution time so an unknown kind surfaces as a
/// hard configuration error there, never at call time.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    /// The name of this provider configuration, unique per deployment.
    pub name: String,

    /// The configured provider kind string.
    pub kind: String,

    /// The connection url for broker-backed kinds.
    pub url: Option<String>,
}

impl ProviderConfig {
    /// Creates a provider configuration without connection parameters.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            url: None,
        }
    }

    /// Attaches a connection url.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds() {
        assert_eq!(
            "memory-callback".parse::<ProviderKind>().unwrap(),
            ProviderKind::MemoryCallback
        );
        assert_eq!(
            "memory-polling".parse::<ProviderKind>().unwrap(),
            ProviderKind::MemoryPolling
        );
        assert_eq!("nats".parse::<ProviderKind>().unwrap(), ProviderKind::Nats);
    }

    #[test]
    fn rejects_unknown_kind() {
        let error = "carrier-pigeon".parse::<ProviderKind>().unwrap_err();
        assert!(error.to_string().contains("carrier-pigeon"));
    }
}
