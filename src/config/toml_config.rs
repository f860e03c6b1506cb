use crate::config::activities::{catalog_from_entries, load_catalog, ActivityEntry};
use crate::core::ConfigProvider;
use crate::domain::model::ActivityCatalog;
use crate::utils::error::{AllocError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_output_formats, validate_path, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ARCHIVE_NAME: &str = "allocation.zip";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub run: RunConfig,
    pub input: InputConfig,
    pub activities: Option<ActivitiesConfig>,
    #[serde(default)]
    pub activity: Vec<ActivityEntry>,
    pub output: OutputConfig,
    pub options: Option<OptionsConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    #[serde(default = "default_participant_column")]
    pub participant_column: String,
    #[serde(default = "default_preferences_column")]
    pub preferences_column: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitiesConfig {
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    pub archive: Option<ArchiveConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    pub strict_preferences: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn default_participant_column() -> String {
    "StudentEmail".to_string()
}

fn default_preferences_column() -> String {
    "Preferences".to_string()
}

fn default_formats() -> Vec<String> {
    vec!["csv".to_string()]
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${INPUT_DIR})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AllocError::config(e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 解析活動清單：外部檔案或內嵌 [[activity]]，兩者擇一
    pub fn catalog(&self) -> Result<ActivityCatalog> {
        let file = self.activities.as_ref().and_then(|a| a.file.as_deref());
        match (file, self.activity.is_empty()) {
            (Some(_), false) => Err(AllocError::config(
                "use either activities.file or inline [[activity]] tables, not both",
            )),
            (Some(file), true) => load_catalog(file),
            (None, false) => catalog_from_entries(&self.activity),
            (None, true) => Err(AllocError::MissingConfigError {
                field: "activities.file or [[activity]]".to_string(),
            }),
        }
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn participant_column(&self) -> &str {
        &self.input.participant_column
    }

    fn preferences_column(&self) -> &str {
        &self.input.preferences_column
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn archive_name(&self) -> Option<&str> {
        self.output
            .archive
            .as_ref()
            .filter(|a| a.enabled)
            .map(|a| a.filename.as_deref().unwrap_or(DEFAULT_ARCHIVE_NAME))
    }

    fn strict_preferences(&self) -> bool {
        self.options
            .as_ref()
            .and_then(|o| o.strict_preferences)
            .unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("run.name", &self.run.name)?;
        validate_path("input.path", &self.input.path)?;
        validate_non_empty_string("input.participant_column", &self.input.participant_column)?;
        validate_non_empty_string("input.preferences_column", &self.input.preferences_column)?;
        validate_path("output.path", &self.output.path)?;
        validate_output_formats("output.formats", &self.output.formats)?;
        if let Some(archive) = self.archive_name() {
            validate_path("output.archive.filename", archive)?;
        }
        Ok(())
    }
}
