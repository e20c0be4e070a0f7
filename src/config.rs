// SCUDA launcher configuration, read from a JSON object such as:
//
//   {
//     "enabled": true,
//     "server": "10.0.0.2",
//     "lib_path": "/opt/scuda/libscuda.so",
//     "extra_env": { "SCUDA_LOG": "1" }
//   }
//
// Every field is optional and unknown keys are ignored.  Values of the wrong
// type are treated the same way as missing ones.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::printer::Printer;
use crate::pystr;

pub const CONFIG_FILE: &str = "scuda_config.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ScudaConfig {
    pub enabled: bool,
    pub server: Option<String>,
    pub lib_path: Option<PathBuf>,
    pub extra_env: Vec<(String, String)>,
}

impl Default for ScudaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            server: None,
            lib_path: None,
            extra_env: Vec::new(),
        }
    }
}

// Raw shape of the file; typing is relaxed here and tightened below.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    #[serde(deserialize_with = "present")]
    enabled: Option<Value>,
    server: Option<Value>,
    lib_path: Option<Value>,
    extra_env: Option<Value>,
}

// Keeps an explicit `null` as Some(Value::Null) so it is not taken as absent.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

// Follows the usual JSON truthiness: null, false, zero and empty containers
// are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn non_empty_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

fn parse_extra_env(value: Option<Value>) -> Vec<(String, String)> {
    match value {
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(key, value)| (key, pystr::to_str(&value)))
            .collect(),
        // Anything but an object is handled as an empty mapping.
        _ => Vec::new(),
    }
}

impl From<RawConfig> for ScudaConfig {
    fn from(raw: RawConfig) -> Self {
        Self {
            enabled: raw.enabled.as_ref().map_or(true, is_truthy),
            server: non_empty_string(raw.server),
            lib_path: non_empty_string(raw.lib_path).map(PathBuf::from),
            extra_env: parse_extra_env(raw.extra_env),
        }
    }
}

pub fn parse_config(content: &str) -> Result<ScudaConfig, ConfigError> {
    let root: Value = serde_json::from_str(content)?;
    let object: Map<String, Value> = match root {
        Value::Object(object) => object,
        _ => return Err(ConfigError::NotAnObject),
    };
    let raw: RawConfig = serde_json::from_value(Value::Object(object))?;
    Ok(raw.into())
}

// Returns None if FILENAME does not exist.
pub fn read_config<P: AsRef<Path>>(filename: &P) -> Result<Option<ScudaConfig>, ConfigError> {
    let content = match fs::read_to_string(filename) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    parse_config(&content).map(Some)
}

// Load the configuration at FILENAME, degrading to the empty configuration on
// any failure.
pub fn load_config<P: AsRef<Path>>(filename: &P, printer: &Printer) -> ScudaConfig {
    match read_config(filename) {
        Ok(Some(config)) => config,
        Ok(None) => {
            printer.info(format!(
                "Config file not found at {}, starting ComfyUI normally.",
                filename.as_ref().display()
            ));
            ScudaConfig::default()
        }
        Err(e) => {
            printer.warning(format!("Failed to read config: {}", e));
            ScudaConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn read_config_missing() -> Result<(), std::io::Error> {
        let tmpdir = TempDir::new()?;
        let filepath = tmpdir.path().join(CONFIG_FILE);

        assert!(matches!(read_config(&filepath), Ok(None)));
        Ok(())
    }

    #[test]
    fn read_config_full() -> Result<(), std::io::Error> {
        let tmpdir = TempDir::new()?;
        let filepath = tmpdir.path().join(CONFIG_FILE);
        let mut file = File::create(&filepath)?;
        write!(
            file,
            r#"{{
                "enabled": true,
                "server": "192.168.1.10",
                "lib_path": "/opt/scuda/libscuda.so",
                "extra_env": {{ "SCUDA_LOG": "debug" }},
                "comment": "ignored"
            }}"#
        )?;

        let config = read_config(&filepath).unwrap().unwrap();
        assert_eq!(config.enabled, true);
        assert_eq!(config.server.as_deref(), Some("192.168.1.10"));
        assert_eq!(
            config.lib_path,
            Some(PathBuf::from("/opt/scuda/libscuda.so"))
        );
        assert_eq!(
            config.extra_env,
            vec![("SCUDA_LOG".to_string(), "debug".to_string())]
        );
        Ok(())
    }

    #[test]
    fn read_config_malformed() -> Result<(), std::io::Error> {
        let tmpdir = TempDir::new()?;
        let filepath = tmpdir.path().join(CONFIG_FILE);
        let mut file = File::create(&filepath)?;
        write!(file, "{{ \"server\": ")?;

        assert!(matches!(read_config(&filepath), Err(ConfigError::Parse(_))));
        Ok(())
    }

    #[test]
    fn load_config_degrades_to_default() -> Result<(), std::io::Error> {
        let tmpdir = TempDir::new()?;
        let printer = crate::printer::create();

        let missing = tmpdir.path().join(CONFIG_FILE);
        assert_eq!(load_config(&missing, &printer), ScudaConfig::default());

        let broken = tmpdir.path().join("broken.json");
        fs::write(&broken, "[1, 2, 3]")?;
        assert_eq!(load_config(&broken, &printer), ScudaConfig::default());
        Ok(())
    }

    #[test]
    fn parse_config_non_object_root() {
        assert!(matches!(parse_config("[]"), Err(ConfigError::NotAnObject)));
        assert!(matches!(parse_config("\"x\""), Err(ConfigError::NotAnObject)));
        assert!(matches!(parse_config("null"), Err(ConfigError::NotAnObject)));
    }

    #[test]
    fn parse_config_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, ScudaConfig::default());
        assert_eq!(config.enabled, true);
    }

    #[test]
    fn parse_config_enabled_truthiness() {
        let enabled = |s: &str| parse_config(s).unwrap().enabled;
        assert_eq!(enabled(r#"{"enabled": false}"#), false);
        assert_eq!(enabled(r#"{"enabled": null}"#), false);
        assert_eq!(enabled(r#"{"enabled": 0}"#), false);
        assert_eq!(enabled(r#"{"enabled": ""}"#), false);
        assert_eq!(enabled(r#"{"enabled": 1}"#), true);
        assert_eq!(enabled(r#"{"enabled": "no"}"#), true);
    }

    #[test]
    fn parse_config_invalid_fields() {
        let config =
            parse_config(r#"{"server": "", "lib_path": 42, "extra_env": ["A", "B"]}"#).unwrap();
        assert_eq!(config.server, None);
        assert_eq!(config.lib_path, None);
        assert!(config.extra_env.is_empty());
    }

    #[test]
    fn parse_config_extra_env_coercion() {
        let config = parse_config(
            r#"{"extra_env": {"A": "text", "B": 1, "C": true, "D": null, "E": [1, 2], "F": 1.0}}"#,
        )
        .unwrap();
        assert_eq!(
            config.extra_env,
            vec![
                ("A".to_string(), "text".to_string()),
                ("B".to_string(), "1".to_string()),
                ("C".to_string(), "True".to_string()),
                ("D".to_string(), "None".to_string()),
                ("E".to_string(), "[1, 2]".to_string()),
                ("F".to_string(), "1.0".to_string()),
            ]
        );
    }

    #[test]
    fn parse_config_extra_env_exact_values() {
        let config = parse_config(
            r#"{"extra_env": {"DEBUG": false, "BIG": 12345678901234567890123, "OPTS": {"a": [1, "x"]}}}"#,
        )
        .unwrap();
        assert_eq!(
            config.extra_env,
            vec![
                ("DEBUG".to_string(), "False".to_string()),
                ("BIG".to_string(), "12345678901234567890123".to_string()),
                ("OPTS".to_string(), "{'a': [1, 'x']}".to_string()),
            ]
        );
    }
}
