//! Rules options
//!
//! Loaded from nethackrc-style `OPTIONS=` lines or from JSON. Only options
//! that change combat or prayer behaviour live here; display options belong
//! to the front end.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::OptionsError;

/// When a pudding hit with iron divides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuddingSplit {
    /// Every qualifying hit splits the pudding
    #[default]
    Always,
    /// Only split while the pudding's max HP is below the threshold
    Below(i32),
}

impl PuddingSplit {
    /// Whether a pudding with this max HP may divide
    pub const fn allows(&self, max_hp: i32) -> bool {
        match self {
            PuddingSplit::Always => true,
            PuddingSplit::Below(limit) => max_hp < *limit,
        }
    }
}

/// Options that change rules outcomes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesOptions {
    /// Full hit messages instead of "You hit it."
    pub verbose: bool,
    /// Pudding division rule
    pub pudding_split: PuddingSplit,
    /// Elbereth is enabled, which makes crowning available
    pub elbereth: bool,
    /// Challenge mode: regained levels cost max level
    pub challenge: bool,
    /// Ask before praying (consumed by the front end)
    pub pray_confirm: bool,
}

impl Default for RulesOptions {
    fn default() -> Self {
        Self {
            verbose: true,
            pudding_split: PuddingSplit::Always,
            elbereth: true,
            challenge: false,
            pray_confirm: true,
        }
    }
}

impl RulesOptions {
    /// Parse nethackrc-style text. Lines other than `OPTIONS=` are ignored.
    pub fn parse_config(contents: &str) -> Result<Self, OptionsError> {
        let mut options = Self::default();

        for (idx, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(opts) = line.strip_prefix("OPTIONS=") {
                for opt in opts.split(',') {
                    options.parse_option(opt.trim(), idx + 1)?;
                }
            }
        }

        Ok(options)
    }

    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a file; `.json` files are parsed as JSON, anything else as
    /// nethackrc text
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&contents)
        } else {
            Self::parse_config(&contents)
        }
    }

    /// Render back to an `OPTIONS=` line
    pub fn to_config_string(&self) -> String {
        let flag = |on: bool, name: &str| {
            if on {
                name.to_string()
            } else {
                format!("!{name}")
            }
        };
        let split = match self.pudding_split {
            PuddingSplit::Always => "always".to_string(),
            PuddingSplit::Below(n) => format!("below:{n}"),
        };
        format!(
            "OPTIONS={},{},{},{},pudding_split:{}\n",
            flag(self.verbose, "verbose"),
            flag(self.elbereth, "elbereth"),
            flag(self.challenge, "challenge"),
            flag(self.pray_confirm, "pray_confirm"),
            split
        )
    }

    fn parse_option(&mut self, opt: &str, line: usize) -> Result<(), OptionsError> {
        if opt.is_empty() {
            return Ok(());
        }
        if let Some((key, value)) = opt.split_once(':').or_else(|| opt.split_once('=')) {
            return self.set_option(key.trim(), value.trim(), line);
        }
        let (negated, name) = match opt.strip_prefix('!') {
            Some(name) => (true, name),
            None => (false, opt),
        };
        self.set_bool_option(name, !negated, line)
    }

    fn set_bool_option(&mut self, name: &str, value: bool, line: usize) -> Result<(), OptionsError> {
        match name {
            "verbose" => self.verbose = value,
            "elbereth" => self.elbereth = value,
            "challenge" => self.challenge = value,
            "pray_confirm" | "prayconfirm" => self.pray_confirm = value,
            _ => {
                return Err(OptionsError::UnknownOption {
                    name: name.to_string(),
                    line,
                });
            }
        }
        Ok(())
    }

    fn set_option(&mut self, key: &str, value: &str, line: usize) -> Result<(), OptionsError> {
        let invalid = || OptionsError::InvalidValue {
            name: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "pudding_split" => {
                self.pudding_split = match value.split_once(':') {
                    None if value == "always" => PuddingSplit::Always,
                    Some(("below", n)) => {
                        PuddingSplit::Below(n.trim().parse().map_err(|_| invalid())?)
                    }
                    _ => return Err(invalid()),
                };
            }
            "verbose" | "elbereth" | "challenge" | "pray_confirm" => {
                let on = match value {
                    "true" | "yes" | "on" => true,
                    "false" | "no" | "off" => false,
                    _ => return Err(invalid()),
                };
                self.set_bool_option(key, on, line)?;
            }
            _ => {
                return Err(OptionsError::UnknownOption {
                    name: key.to_string(),
                    line,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = RulesOptions::default();
        assert!(opts.verbose);
        assert!(opts.elbereth);
        assert!(!opts.challenge);
        assert_eq!(opts.pudding_split, PuddingSplit::Always);
    }

    #[test]
    fn test_parse_bool_options() {
        let opts = RulesOptions::parse_config("# rules\nOPTIONS=!verbose,challenge\n").unwrap();
        assert!(!opts.verbose);
        assert!(opts.challenge);
        assert!(opts.elbereth);
    }

    #[test]
    fn test_parse_pudding_threshold() {
        let opts = RulesOptions::parse_config("OPTIONS=pudding_split:below:40").unwrap();
        assert_eq!(opts.pudding_split, PuddingSplit::Below(40));
        assert!(opts.pudding_split.allows(39));
        assert!(!opts.pudding_split.allows(40));
    }

    #[test]
    fn test_unknown_option_reports_line() {
        let err = RulesOptions::parse_config("\nOPTIONS=verbose,autodig").unwrap_err();
        match err {
            OptionsError::UnknownOption { name, line } => {
                assert_eq!(name, "autodig");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_invalid_value() {
        let err = RulesOptions::parse_config("OPTIONS=pudding_split:sometimes").unwrap_err();
        assert!(matches!(err, OptionsError::InvalidValue { .. }));
    }

    #[test]
    fn test_json_partial_document() {
        let opts = RulesOptions::from_json(r#"{"challenge": true, "pudding_split": {"below": 12}}"#)
            .unwrap();
        assert!(opts.challenge);
        assert!(opts.verbose);
        assert_eq!(opts.pudding_split, PuddingSplit::Below(12));
    }

    #[test]
    fn test_roundtrip() {
        let opts = RulesOptions {
            verbose: false,
            pudding_split: PuddingSplit::Below(30),
            ..RulesOptions::default()
        };
        let parsed = RulesOptions::parse_config(&opts.to_config_string()).unwrap();
        assert_eq!(parsed, opts);
    }

    #[test]
    fn test_load_missing_file() {
        let err = RulesOptions::load("/nonexistent/rules.rc").unwrap_err();
        assert!(matches!(err, OptionsError::Io { .. }));
    }
}
