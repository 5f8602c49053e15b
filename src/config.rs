use std::collections::HashMap;
use std::fmt;
use std::fs;

/// INI-style configuration: `key = value` pairs, optionally grouped under
/// `[Section]` headers. Keys before the first header are globals. Lines
/// starting with `#` or `;` are comments; surrounding double quotes on values
/// are stripped.
#[derive(Debug, Default, Clone)]
pub struct Config {
    pub globals: HashMap<String, String>,
    pub sections: HashMap<String, HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Read { path: String, reason: String },
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, reason } => write!(f, "error reading file {path}: {reason}"),
            Self::InvalidValue {
                section,
                key,
                value,
            } => write!(f, "invalid value for [{section}] {key}: {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] if the file cannot be read.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self::parse(&content))
    }

    /// Parses configuration text. Lines that are neither headers, comments
    /// nor `key = value` pairs are ignored.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut cfg = Self::empty();
        let mut current_section: Option<String> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current_section = Some(name.trim().to_string());
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().to_string();
                let value = value.trim().trim_matches('"').to_string();

                match &current_section {
                    None => {
                        cfg.globals.insert(key, value);
                    }
                    Some(sec) => {
                        cfg.sections
                            .entry(sec.clone())
                            .or_default()
                            .insert(key, value);
                    }
                }
            }
        }
        cfg
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|sec| sec.get(key))
            .map(String::as_str)
    }

    #[must_use]
    pub fn get_non_empty(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key).filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn get_global(&self, key: &str) -> Option<&str> {
        self.globals.get(key).map(String::as_str)
    }

    /// Section value, then global value, then `default`.
    #[must_use]
    pub fn get_or_default<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.get(section, key)
            .or_else(|| self.get_global(key))
            .unwrap_or(default)
    }

    /// Like [`get_or_default`](Self::get_or_default) but empty values fall through.
    #[must_use]
    pub fn get_non_empty_or_default<'a>(
        &'a self,
        section: &str,
        key: &str,
        default: &'a str,
    ) -> &'a str {
        self.get_non_empty(section, key)
            .or_else(|| self.get_global(key).filter(|s| !s.is_empty()))
            .unwrap_or(default)
    }

    /// Parses a boolean (`true/false`, `yes/no`, `on/off`, `1/0`).
    ///
    /// # Errors
    /// [`ConfigError::InvalidValue`] if the key is present but not a boolean.
    pub fn get_bool(
        &self,
        section: &'static str,
        key: &'static str,
    ) -> Result<Option<bool>, ConfigError> {
        let Some(raw) = self.get_non_empty(section, key) else {
            return Ok(None);
        };
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Some(true)),
            "false" | "no" | "off" | "0" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue {
                section,
                key,
                value: raw.to_owned(),
            }),
        }
    }

    /// Parses a `u32`.
    ///
    /// # Errors
    /// [`ConfigError::InvalidValue`] if the key is present but not a number.
    pub fn get_u32(
        &self,
        section: &'static str,
        key: &'static str,
    ) -> Result<Option<u32>, ConfigError> {
        self.get_non_empty(section, key)
            .map(|raw| {
                raw.parse().map_err(|_| ConfigError::InvalidValue {
                    section,
                    key,
                    value: raw.to_owned(),
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    const SAMPLE: &str = r#"
# call defaults
log_filename = global-name

[Session]
initiator = yes
preferred_codec = "opus"
preferred_clock_rate = 48000

[Logging]
log_filename =
"#;

    #[test]
    fn sections_and_globals_are_split() {
        let cfg = Config::parse(SAMPLE);
        assert_eq!(cfg.get_global("log_filename"), Some("global-name"));
        assert_eq!(cfg.get("Session", "preferred_codec"), Some("opus"));
        assert_eq!(cfg.get("Session", "missing"), None);
    }

    #[test]
    fn empty_values_fall_back_to_globals() {
        let cfg = Config::parse(SAMPLE);
        assert_eq!(cfg.get("Logging", "log_filename"), Some(""));
        assert_eq!(cfg.get_non_empty("Logging", "log_filename"), None);
        assert_eq!(
            cfg.get_non_empty_or_default("Logging", "log_filename", "x"),
            "global-name"
        );
        assert_eq!(cfg.get_or_default("Logging", "log_path", "/tmp"), "/tmp");
    }

    #[test]
    fn typed_getters() {
        let cfg = Config::parse(SAMPLE);
        assert_eq!(cfg.get_bool("Session", "initiator").unwrap(), Some(true));
        assert_eq!(cfg.get_bool("Session", "absent").unwrap(), None);
        assert_eq!(
            cfg.get_u32("Session", "preferred_clock_rate").unwrap(),
            Some(48_000)
        );

        let bad = Config::parse("[Session]\ninitiator = maybe\n");
        assert!(matches!(
            bad.get_bool("Session", "initiator"),
            Err(ConfigError::InvalidValue { key: "initiator", .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load("/definitely/not/here.ini").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
