use crate::config::Config;

/// Which backing dataset store instances target for this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Operate against the hosted store, mirroring locally.
    Remote,
    /// Guest/demo: a local-only namespace that never contacts the remote.
    Isolated,
}

impl SessionMode {
    /// Classify the session from explicit configuration state, once at
    /// startup. Never inferred from entity identifiers.
    pub fn resolve(config: &Config) -> Self {
        if config.guest {
            return Self::Isolated;
        }
        match (&config.api_url, &config.api_token) {
            (Some(_), Some(_)) => Self::Remote,
            _ => Self::Isolated,
        }
    }

    /// Mirror namespace this mode reads and writes.
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Isolated => "guest",
        }
    }
}
