use std::path::Path;

use crate::config::model::{ChannelConfig, linearized_from_path};
use crate::foundation::error::{ChainviewError, ChainviewResult};

/// Collaborator that owns the processing configuration.
///
/// The renderer only reads through this trait. Both fetches are asynchronous and are the only
/// suspension points of a render pass besides the surface's layout-settled signal.
#[allow(async_fn_in_trait)]
pub trait ConfigSource {
    /// Whether a live connection to the configuration owner exists.
    fn is_connected(&self) -> bool;

    /// Refresh the source's internal snapshot of the configuration.
    ///
    /// Fails with [`ChainviewError::Connectivity`] on transport failure.
    async fn download_config(&mut self) -> ChainviewResult<()>;

    /// Per-channel stage lists of the current snapshot.
    ///
    /// Fails with [`ChainviewError::ConfigFetch`] if the snapshot is missing or malformed.
    async fn linearize_config(&mut self) -> ChainviewResult<Vec<ChannelConfig>>;
}

/// In-memory configuration source.
///
/// Holds a "published" configuration that `download_config` copies into its snapshot, so a
/// change published between two renders only becomes visible after the next download.
#[derive(Clone, Debug, Default)]
pub struct StaticConfigSource {
    connected: bool,
    published: Vec<ChannelConfig>,
    snapshot: Option<Vec<ChannelConfig>>,
}

impl StaticConfigSource {
    /// Connected source publishing the given channels.
    pub fn new(channels: Vec<ChannelConfig>) -> Self {
        Self {
            connected: true,
            published: channels,
            snapshot: None,
        }
    }

    /// Source without a live connection.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Connected source publishing a linearized configuration read from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> ChainviewResult<Self> {
        Ok(Self::new(linearized_from_path(path)?))
    }

    /// Replace the published configuration.
    pub fn publish(&mut self, channels: Vec<ChannelConfig>) {
        self.published = channels;
    }

    /// Simulate connecting or dropping the connection.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Snapshot taken by the last successful download, if any.
    pub fn snapshot(&self) -> Option<&[ChannelConfig]> {
        self.snapshot.as_deref()
    }
}

impl ConfigSource for StaticConfigSource {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn download_config(&mut self) -> ChainviewResult<()> {
        if !self.connected {
            return Err(ChainviewError::connectivity(
                "not connected to the configuration source",
            ));
        }
        self.snapshot = Some(self.published.clone());
        Ok(())
    }

    async fn linearize_config(&mut self) -> ChainviewResult<Vec<ChannelConfig>> {
        self.snapshot
            .clone()
            .ok_or_else(|| ChainviewError::config_fetch("no configuration has been downloaded"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/config_source.rs"]
mod tests;
