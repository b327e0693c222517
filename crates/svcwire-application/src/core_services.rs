//! Services every registry provides
//!
//! The plugin metadata service is resolved by the engine itself for the
//! requesting plugin; no factory is registered for it.

use std::sync::LazyLock;

use svcwire_domain::constants::PLUGIN_METADATA_SERVICE_ID;
use svcwire_domain::value_objects::Plugin;

use crate::token::ServiceToken;

/// Identity of the plugin a service instance belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginMetadata {
    plugin_id: String,
}

impl PluginMetadata {
    /// Metadata for `plugin_id`
    pub fn new(plugin_id: impl Into<String>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
        }
    }

    /// Id of the owning plugin
    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }
}

static PLUGIN_METADATA: LazyLock<ServiceToken<PluginMetadata, Plugin>> =
    LazyLock::new(|| ServiceToken::new(PLUGIN_METADATA_SERVICE_ID));

/// Token of the built-in plugin metadata service
pub fn plugin_metadata() -> &'static ServiceToken<PluginMetadata, Plugin> {
    &PLUGIN_METADATA
}
