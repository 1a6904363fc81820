use crate::error::{AgendaError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// DirsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirsConfig {
    #[serde(default = "default_input_dir")]
    pub input: String,
    #[serde(default = "default_output_dir")]
    pub output: String,
}

fn default_input_dir() -> String {
    paths::INPUT_DIR.to_string()
}

fn default_output_dir() -> String {
    paths::OUTPUT_DIR.to_string()
}

impl Default for DirsConfig {
    fn default() -> Self {
        Self {
            input: default_input_dir(),
            output: default_output_dir(),
        }
    }
}

// ---------------------------------------------------------------------------
// DocumentsConfig
// ---------------------------------------------------------------------------

/// File names of the five reference documents, relative to the input dir.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    #[serde(default = "default_scripture_doc")]
    pub scripture: String,
    #[serde(default = "default_international_doc")]
    pub international: String,
    #[serde(default = "default_state_doc")]
    pub state: String,
    #[serde(default = "default_devotional_doc")]
    pub devotional: String,
    #[serde(default = "default_roster_doc")]
    pub roster: String,
    #[serde(default = "default_pastors_doc")]
    pub pastors: String,
}

fn default_scripture_doc() -> String {
    "hq2.md".to_string()
}

fn default_international_doc() -> String {
    "hq1.md".to_string()
}

fn default_state_doc() -> String {
    "fl.md".to_string()
}

fn default_devotional_doc() -> String {
    "prayer.md".to_string()
}

fn default_roster_doc() -> String {
    "widow.md".to_string()
}

fn default_pastors_doc() -> String {
    "pastor.md".to_string()
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            scripture: default_scripture_doc(),
            international: default_international_doc(),
            state: default_state_doc(),
            devotional: default_devotional_doc(),
            roster: default_roster_doc(),
            pastors: default_pastors_doc(),
        }
    }
}

impl DocumentsConfig {
    /// (logical name, file name) pairs in load order.
    pub fn all(&self) -> [(&'static str, &str); 6] {
        [
            ("scripture", &self.scripture),
            ("international", &self.international),
            ("state", &self.state),
            ("devotional", &self.devotional),
            ("roster", &self.roster),
            ("pastors", &self.pastors),
        ]
    }
}

// ---------------------------------------------------------------------------
// ReadersConfig
// ---------------------------------------------------------------------------

/// Fixed reader names written into the day-addressed reading headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadersConfig {
    #[serde(default = "default_international_reader")]
    pub international: String,
    #[serde(default = "default_state_reader")]
    pub state: String,
}

fn default_international_reader() -> String {
    "TaeWoo Lee".to_string()
}

fn default_state_reader() -> String {
    "Alvin Beverly".to_string()
}

impl Default for ReadersConfig {
    fn default() -> Self {
        Self {
            international: default_international_reader(),
            state: default_state_reader(),
        }
    }
}

// ---------------------------------------------------------------------------
// ScriptureConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptureConfig {
    /// Table column holding the reading. Falls back to the last column.
    #[serde(default = "default_scripture_column")]
    pub column: String,
}

fn default_scripture_column() -> String {
    "Evening".to_string()
}

impl Default for ScriptureConfig {
    fn default() -> Self {
        Self {
            column: default_scripture_column(),
        }
    }
}

// ---------------------------------------------------------------------------
// VersesConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_verse_url")]
    pub base_url: String,
    #[serde(default = "default_translation")]
    pub translation: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_verse_url() -> String {
    "https://bible-api.com".to_string()
}

fn default_translation() -> String {
    "kjv".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for VersesConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            base_url: default_verse_url(),
            translation: default_translation(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// PrintConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_print_command")]
    pub command: String,
    /// Copies of the rotated agenda handed out at the table.
    #[serde(default = "default_handout_copies")]
    pub handout_copies: u32,
    /// Copies of the verse-enriched agenda for the meeting leader.
    #[serde(default = "default_leader_copies")]
    pub leader_copies: u32,
}

fn default_print_command() -> String {
    "lp".to_string()
}

fn default_handout_copies() -> u32 {
    6
}

fn default_leader_copies() -> u32 {
    1
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: default_print_command(),
            handout_copies: default_handout_copies(),
            leader_copies: default_leader_copies(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Suffix of agenda file names, after the date.
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub dirs: DirsConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub readers: ReadersConfig,
    #[serde(default)]
    pub scripture: ScriptureConfig,
    #[serde(default)]
    pub verses: VersesConfig,
    #[serde(default)]
    pub print: PrintConfig,
}

fn default_version() -> u32 {
    1
}

fn default_title() -> String {
    paths::DEFAULT_TITLE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            title: default_title(),
            dirs: DirsConfig::default(),
            documents: DocumentsConfig::default(),
            readers: ReadersConfig::default(),
            scripture: ScriptureConfig::default(),
            verses: VersesConfig::default(),
            print: PrintConfig::default(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(AgendaError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.title.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "title is empty; agenda file names cannot be built".to_string(),
            });
        }

        // 1. Reader names end up verbatim in the agenda headers
        for (key, name) in [
            ("readers.international", &self.readers.international),
            ("readers.state", &self.readers.state),
        ] {
            if name.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("{key} is empty"),
                });
            }
        }

        // 2. Each section needs its own reference document
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for (section, file) in self.documents.all() {
            if file.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("documents.{section} is empty"),
                });
                continue;
            }
            if let Some(other) = seen.insert(file, section) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "documents.{section} and documents.{other} both point at '{file}'"
                    ),
                });
            }
        }

        // 3. Verse lookup
        if self.verses.enabled {
            if !self.verses.base_url.starts_with("http://")
                && !self.verses.base_url.starts_with("https://")
            {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "verses.base_url '{}' is not an http(s) URL",
                        self.verses.base_url
                    ),
                });
            }
            if self.verses.timeout_secs == 0 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: "verses.timeout_secs is 0; every lookup will time out".to_string(),
                });
            }
        }

        // 4. Printing
        if self.print.enabled {
            if self.print.command.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: "print.command is empty".to_string(),
                });
            }
            if self.print.handout_copies == 0 && self.print.leader_copies == 0 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: "printing is enabled but both copy counts are 0".to_string(),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.title, paths::DEFAULT_TITLE);
        assert_eq!(parsed.documents.pastors, "pastor.md");
        assert_eq!(parsed.print.handout_copies, 6);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let yaml = "readers:\n  international: Someone Else\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.readers.international, "Someone Else");
        assert_eq!(cfg.readers.state, "Alvin Beverly");
        assert_eq!(cfg.scripture.column, "Evening");
        assert!(cfg.verses.enabled);
        assert!(!cfg.print.enabled);
    }

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(AgendaError::NotInitialized)
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.readers.state = "Jo Reader".to_string();
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.readers.state, "Jo Reader");
    }

    #[test]
    fn validate_default_config_no_warnings() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn validate_duplicate_documents() {
        let mut cfg = Config::default();
        cfg.documents.state = cfg.documents.international.clone();
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("hq1.md"));
    }

    #[test]
    fn validate_bad_verse_url_is_error() {
        let mut cfg = Config::default();
        cfg.verses.base_url = "bible-api.com".to_string();
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.level == WarnLevel::Error));
    }

    #[test]
    fn validate_ignores_verse_settings_when_disabled() {
        let mut cfg = Config::default();
        cfg.verses.enabled = false;
        cfg.verses.timeout_secs = 0;
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validate_print_without_copies() {
        let mut cfg = Config::default();
        cfg.print.enabled = true;
        cfg.print.handout_copies = 0;
        cfg.print.leader_copies = 0;
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
    }
}
