//! Settings loading with environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`Settings::default()`]
//! 2. If a settings file is given, merge its values over the defaults,
//!    group by group (`{"services": {"texts": {"url": ...}}}` keeps the
//!    default `timeoutMs`)
//! 3. Apply `FEEDBACK_*` environment variable overrides (highest priority)

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::SettingsError;
use crate::scoring::ScoringFormula;

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Environment variable naming the settings file.
pub const CONFIG_ENV: &str = "FEEDBACK_CONFIG";

const TEXTS_TIMEOUT_MS: (u64, u64) = (100, 600_000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Upper bound on `len(reference) * len(actual)`; `0` disables it.
    pub max_alignment_cells: usize,
    pub scoring: ScoringFormula,
    pub services: ServicesSettings,
    /// Directory of `<text_id>.json` reference records, used when no text
    /// service URL is configured.
    pub references_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_alignment_cells: 4_000_000,
            scoring: ScoringFormula::default(),
            services: ServicesSettings::default(),
            references_dir: None,
            log_level: "warn".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServicesSettings {
    pub texts: TextsServiceSettings,
}

/// Text-storage service holding reference transcriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextsServiceSettings {
    /// Base URL; texts are fetched from `{url}/{text_id}`.
    pub url: Option<String>,
    pub timeout_ms: u64,
}

impl Default for TextsServiceSettings {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: 10_000,
        }
    }
}

impl TextsServiceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Load settings from `path` (or `$FEEDBACK_CONFIG`) with env var overrides.
///
/// Without a settings file the defaults are used. A file that is missing
/// or contains invalid JSON is an error.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let from_env = read_env_string(CONFIG_ENV).map(PathBuf::from);
    let mut settings = match path.or(from_env.as_deref()) {
        Some(path) => load_settings_from_path(path)?,
        None => Settings::default(),
    };
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Load settings from a specific file, without env var overrides.
pub fn load_settings_from_path(path: &Path) -> Result<Settings> {
    debug!(?path, "loading settings from file");
    let content = std::fs::read_to_string(path)?;
    parse_settings(&content)
}

pub fn parse_settings(content: &str) -> Result<Settings> {
    let user: Value = serde_json::from_str(content)?;
    if !user.is_object() {
        return Err(SettingsError::InvalidValue(
            "settings file must contain a JSON object".to_owned(),
        ));
    }
    let mut merged = serde_json::to_value(Settings::default())?;
    merge_into(&mut merged, user);
    let settings: Settings = serde_json::from_value(merged)?;
    validate(&settings)?;
    Ok(settings)
}

/// Overlays `source` onto `target`. Nested groups merge key by key, any
/// other value replaces the target, and `null` leaves the target untouched.
fn merge_into(target: &mut Value, source: Value) {
    match (target, source) {
        (_, Value::Null) => {}
        (Value::Object(group), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match group.get_mut(&key) {
                    Some(existing) => merge_into(existing, value),
                    None if !value.is_null() => {
                        let _ = group.insert(key, value);
                    }
                    None => {}
                }
            }
        }
        (target, source) => *target = source,
    }
}

fn validate(settings: &Settings) -> Result<()> {
    let (min, max) = TEXTS_TIMEOUT_MS;
    let timeout = settings.services.texts.timeout_ms;
    if !(min..=max).contains(&timeout) {
        return Err(SettingsError::InvalidValue(format!(
            "services.texts.timeoutMs must be within {min}..={max}, got {timeout}"
        )));
    }
    Ok(())
}

pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, read_env_string);
}

/// Applies overrides from `lookup`, which maps variable names to values.
/// Invalid values are ignored with a warning.
pub fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("FEEDBACK_MAX_ALIGNMENT_CELLS") {
        match val.trim().parse() {
            Ok(v) => settings.max_alignment_cells = v,
            Err(_) => ignore("FEEDBACK_MAX_ALIGNMENT_CELLS", &val),
        }
    }
    if let Some(val) = lookup("FEEDBACK_SCORING") {
        match parse_scoring(&val) {
            Some(v) => settings.scoring = v,
            None => ignore("FEEDBACK_SCORING", &val),
        }
    }
    if let Some(val) = lookup("FEEDBACK_TEXTS_URL") {
        settings.services.texts.url = Some(val);
    }
    if let Some(val) = lookup("FEEDBACK_TEXTS_TIMEOUT_MS") {
        let (min, max) = TEXTS_TIMEOUT_MS;
        match parse_u64_range(&val, min, max) {
            Some(v) => settings.services.texts.timeout_ms = v,
            None => ignore("FEEDBACK_TEXTS_TIMEOUT_MS", &val),
        }
    }
    if let Some(val) = lookup("FEEDBACK_REFERENCES_DIR") {
        settings.references_dir = Some(PathBuf::from(val));
    }
    if let Some(val) = lookup("FEEDBACK_LOG_LEVEL") {
        settings.log_level = val;
    }
}

fn ignore(key: &str, value: &str) {
    warn!(key, value, "invalid env var, ignoring");
}

// Pure parsing functions, testable without env vars.

/// Parse a string as a `u64` within `min..=max`.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.trim().parse().ok()?;
    (min..=max).contains(&n).then_some(n)
}

/// Accepts the JSON spelling (`lengthPenalized`) and the CLI spelling
/// (`length-penalized`), case-insensitively.
pub fn parse_scoring(val: &str) -> Option<ScoringFormula> {
    let normalized = val.trim().to_lowercase().replace(&['-', '_'][..], "");
    match normalized.as_str() {
        "lengthpenalized" => Some(ScoringFormula::LengthPenalized),
        "legacy" => Some(ScoringFormula::Legacy),
        _ => None,
    }
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
