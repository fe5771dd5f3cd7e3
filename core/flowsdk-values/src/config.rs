//! Binder configuration, read from a TOML file owned by the host service.
//!
//! ```toml
//! max_depth = 16
//! strict_booleans = true
//! validate_bindings = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Default bound on nested object depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Tunables for the registry and value parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Deepest nesting level a parse or emit may reach. The top-level object
    /// is depth 0.
    pub max_depth: usize,
    /// Reject boolean values other than `true`/`false` (any case) instead of
    /// reading them as false.
    pub strict_booleans: bool,
    /// Check every property's content type against its field type when the
    /// registry is built, rather than on first use.
    pub validate_bindings: bool,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            strict_booleans: false,
            validate_bindings: false,
        }
    }
}

impl BinderConfig {
    /// Parses a configuration document.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Loads configuration from `path`.
    ///
    /// A missing file yields the defaults. Falls back to the defaults with a
    /// warning when the file cannot be read or parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No binder config found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml(&contents) {
                Ok(config) => {
                    info!("Loaded binder config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!(
                        "Failed to parse binder config {:?}: {}. Falling back to defaults.",
                        path, e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read binder config {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}
