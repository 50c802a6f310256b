//! Config module.
//! Provides configuration types, the config file location, XML loading, and
//! validation of the script output directory.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{CONFIG_ENV, default_config_path, path_has_symlink_ancestor};
pub use types::{Config, ConflictPolicy, FailurePolicy, LogLevel};
pub use xml::{load_config, load_config_from_xml_path};

/// Label used in generated script names for the forward script.
pub const CHANGELOG_LABEL: &str = "filesense-changelog";
/// Label used in generated script names for the reverse script.
pub const REVERT_LABEL: &str = "revert";
