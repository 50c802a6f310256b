//! XML configuration support (quick_xml + serde).
//!
//! <config>
//!   <log_level>normal</log_level>
//!   <log_file>/path/to/filesense-applier.log</log_file>
//!   <script_dir>/path/to/scripts</script_dir>
//!   <on_conflict>skip</on_conflict>
//!   <on_error>skip</on_error>
//!   <retries>0</retries>
//! </config>
//!
//! Every element is optional. Unknown elements are rejected so typos surface
//! instead of being silently ignored. Nothing is ever written by this module.

use anyhow::{Context, Result, anyhow};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::{CONFIG_ENV, default_config_path};
use super::types::{Config, ConflictPolicy, FailurePolicy, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    script_dir: Option<String>,
    on_conflict: Option<String>,
    on_error: Option<String>,
    #[serde(default, deserialize_with = "de_u32_trimmed_opt")]
    retries: Option<u32>,
}

// Trims surrounding whitespace; blank is absent, anything else must be a number.
fn de_u32_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<u32>().map(Some).map_err(|e| {
            serde::de::Error::custom(format!("invalid retries value '{s}': {e}"))
        }),
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(|e| anyhow!(e))?;
    }
    cfg.log_file = non_empty(parsed.log_file.as_deref()).map(PathBuf::from);
    if let Some(s) = non_empty(parsed.script_dir.as_deref()) {
        cfg.script_dir = PathBuf::from(s);
    }
    if let Some(s) = non_empty(parsed.on_conflict.as_deref()) {
        cfg.on_conflict = s.parse::<ConflictPolicy>().map_err(|e| anyhow!(e))?;
    }
    if let Some(s) = non_empty(parsed.on_error.as_deref()) {
        cfg.on_failure = s.parse::<FailurePolicy>().map_err(|e| anyhow!(e))?;
    }
    if let Some(n) = parsed.retries {
        cfg.retries = n;
    }
    Ok(cfg)
}

/// Load a Config from a specific XML file.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in '{}'", path.display()))
}

/// Load the effective config file, if any.
///
/// - `$FILESENSE_CONFIG` set: the file must exist and parse.
/// - Otherwise the OS default location is used when present; `Ok(None)` when
///   there is no file.
pub fn load_config() -> Result<Option<Config>> {
    let explicit = env::var_os(CONFIG_ENV).is_some_and(|v| !v.is_empty());
    let Some(path) = default_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        if explicit {
            return Err(anyhow!(
                "{CONFIG_ENV} points to '{}', which does not exist",
                path.display()
            ));
        }
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(None);
    }
    debug!(path = %path.display(), "loading config");
    load_config_from_xml_path(&path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn full_file_maps_every_field() {
        let td = tempdir().unwrap();
        let p = td.path().join("applier.xml");
        fs::write(
            &p,
            "<config>\n  <log_level>debug</log_level>\n  <log_file> /tmp/a.log </log_file>\n  <script_dir>/srv/scripts</script_dir>\n  <on_conflict>suffix</on_conflict>\n  <on_error>abort</on_error>\n  <retries> 3 </retries>\n</config>\n",
        )
        .unwrap();
        let cfg = load_config_from_xml_path(&p).unwrap();
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/a.log")));
        assert_eq!(cfg.script_dir, PathBuf::from("/srv/scripts"));
        assert_eq!(cfg.on_conflict, ConflictPolicy::Suffix);
        assert_eq!(cfg.on_failure, FailurePolicy::Abort);
        assert_eq!(cfg.retries, 3);
    }

    #[test]
    fn empty_elements_keep_defaults() {
        let td = tempdir().unwrap();
        let p = td.path().join("applier.xml");
        fs::write(&p, "<config><log_file></log_file><script_dir> </script_dir></config>").unwrap();
        let cfg = load_config_from_xml_path(&p).unwrap();
        assert_eq!(cfg.log_file, None);
        assert_eq!(cfg.script_dir, PathBuf::from("."));
    }

    #[test]
    fn unknown_element_is_rejected() {
        let td = tempdir().unwrap();
        let p = td.path().join("applier.xml");
        fs::write(&p, "<config><download_base>/x</download_base></config>").unwrap();
        assert!(load_config_from_xml_path(&p).is_err());
    }

    #[test]
    fn bad_retries_is_rejected() {
        let td = tempdir().unwrap();
        let p = td.path().join("applier.xml");
        fs::write(&p, "<config><retries>three</retries></config>").unwrap();
        let err = load_config_from_xml_path(&p).unwrap_err();
        assert!(format!("{err:#}").contains("invalid retries value 'three'"));

        fs::write(&p, "<config><retries>-1</retries></config>").unwrap();
        assert!(load_config_from_xml_path(&p).is_err());
    }

    #[test]
    fn blank_retries_keeps_default() {
        let td = tempdir().unwrap();
        let p = td.path().join("applier.xml");
        fs::write(&p, "<config><retries> </retries></config>").unwrap();
        assert_eq!(load_config_from_xml_path(&p).unwrap().retries, 0);
    }

    #[test]
    fn bad_policy_is_rejected() {
        let td = tempdir().unwrap();
        let p = td.path().join("applier.xml");
        fs::write(&p, "<config><on_error>retry</on_error></config>").unwrap();
        let err = load_config_from_xml_path(&p).unwrap_err();
        assert!(format!("{err:#}").contains("invalid failure policy"));
    }
}
