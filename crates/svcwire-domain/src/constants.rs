//! Domain layer constants

/// Plugin id under which root scoped services are resolved
pub const ROOT_PLUGIN_ID: &str = "root";

/// Discriminant tag carried by service tokens
pub const TOKEN_KIND: &str = "svcwire.token";

/// Discriminant tag carried by factory descriptors and builders
pub const FACTORY_KIND: &str = "svcwire.factory";

/// Id of the built-in plugin metadata service
pub const PLUGIN_METADATA_SERVICE_ID: &str = "core.pluginMetadata";
