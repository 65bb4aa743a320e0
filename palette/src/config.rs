//! Ranker configuration loaded from JSON, with environment overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::interface::{Category, PaletteError};
use crate::ranking::{RankOptions, DEFAULT_CATEGORY_ORDER, DEFAULT_LIMIT, DEFAULT_RECENT_WINDOW_MS};

pub const ENV_RESULT_LIMIT: &str = "PALETTE_RESULT_LIMIT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteConfig {
    pub limit: usize,
    pub category_order: Vec<Category>,
    pub recent_window_ms: i64,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            category_order: DEFAULT_CATEGORY_ORDER.to_vec(),
            recent_window_ms: DEFAULT_RECENT_WINDOW_MS,
        }
    }
}

impl PaletteConfig {
    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, PaletteError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PaletteError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&raw)?.with_env_overrides();
        tracing::debug!(path = %path.as_ref().display(), limit = config.limit, "loaded palette config");
        Ok(config)
    }

    /// Apply `PALETTE_RESULT_LIMIT` when it holds a valid count.
    pub fn with_env_overrides(self) -> Self {
        self.with_limit_override(std::env::var(ENV_RESULT_LIMIT).ok().as_deref())
    }

    fn with_limit_override(mut self, raw: Option<&str>) -> Self {
        if let Some(limit) = raw.and_then(|value| value.trim().parse::<usize>().ok()) {
            self.limit = limit;
        }
        self
    }

    pub fn validate(&self) -> Result<(), PaletteError> {
        if self.recent_window_ms <= 0 {
            return Err(PaletteError::InvalidConfig(format!(
                "recent_window_ms must be positive, got {}",
                self.recent_window_ms
            )));
        }
        for (i, category) in self.category_order.iter().enumerate() {
            if self.category_order[..i].contains(category) {
                return Err(PaletteError::InvalidConfig(format!(
                    "category {category} listed more than once in category_order"
                )));
            }
        }
        Ok(())
    }

    pub fn rank_options(&self) -> RankOptions {
        RankOptions {
            limit: self.limit,
            now_ms: None,
            category_order: self.category_order.clone(),
            recent_window_ms: self.recent_window_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_rank_options() {
        let options = PaletteConfig::default().rank_options();
        assert_eq!(options, RankOptions::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = PaletteConfig::from_json_str(r#"{ "limit": 5 }"#).unwrap();
        assert_eq!(config.limit, 5);
        assert_eq!(config.category_order, DEFAULT_CATEGORY_ORDER.to_vec());
        assert_eq!(config.recent_window_ms, DEFAULT_RECENT_WINDOW_MS);
    }

    #[test]
    fn test_category_order_parses_lowercase_names() {
        let config = PaletteConfig::from_json_str(r#"{ "category_order": ["note", "command"] }"#).unwrap();
        assert_eq!(config.category_order, vec![Category::Note, Category::Command]);
    }

    #[test]
    fn test_rejects_duplicate_categories() {
        let err = PaletteConfig::from_json_str(r#"{ "category_order": ["note", "note"] }"#).unwrap_err();
        assert!(matches!(err, PaletteError::InvalidConfig(_)), "{err}");
    }

    #[test]
    fn test_rejects_non_positive_window() {
        let err = PaletteConfig::from_json_str(r#"{ "recent_window_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, PaletteError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_unknown_fields_and_bad_json() {
        assert!(matches!(
            PaletteConfig::from_json_str(r#"{ "limt": 5 }"#),
            Err(PaletteError::Json(_))
        ));
        assert!(matches!(PaletteConfig::from_json_str("{"), Err(PaletteError::Json(_))));
        assert!(matches!(
            PaletteConfig::from_json_str(r#"{ "category_order": ["widget"] }"#),
            Err(PaletteError::Json(_))
        ));
    }

    #[test]
    fn test_limit_override() {
        let config = PaletteConfig::default();
        assert_eq!(config.clone().with_limit_override(Some(" 7 ")).limit, 7);
        assert_eq!(config.clone().with_limit_override(Some("lots")).limit, DEFAULT_LIMIT);
        assert_eq!(config.with_limit_override(None).limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "recent_window_ms": 3600000 }}"#).unwrap();
        let config = PaletteConfig::load(file.path()).unwrap();
        assert_eq!(config.recent_window_ms, 3_600_000);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PaletteConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PaletteError::Io(_)));
    }
}
