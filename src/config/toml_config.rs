use crate::config::defaults;
use crate::core::{ConfigProvider, FixedDigit, RetryPolicy};
use crate::utils::error::{Result, ScanError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub numbers: NumbersConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_brand")]
    pub brand: String,
    #[serde(default = "default_sim_category")]
    pub sim_category: String,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumbersConfig {
    #[serde(default = "default_base_prefix")]
    pub base_prefix: String,
    #[serde(default = "default_fixed_positions")]
    pub fixed_positions: Vec<FixedDigit>,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub jitter_min_ms: Option<u64>,
    pub jitter_max_ms: Option<u64>,
    pub drain_passes: Option<u32>,
    pub drain_cooldown_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
}

fn default_endpoint() -> String {
    defaults::API_ENDPOINT.to_string()
}

fn default_brand() -> String {
    defaults::BRAND.to_string()
}

fn default_sim_category() -> String {
    defaults::SIM_CATEGORY.to_string()
}

fn default_base_prefix() -> String {
    defaults::BASE_PREFIX.to_string()
}

fn default_fixed_positions() -> Vec<FixedDigit> {
    vec![
        FixedDigit { index: 4, digit: 0 },
        FixedDigit { index: 5, digit: 0 },
    ]
}

fn default_output_path() -> String {
    defaults::OUTPUT_PATH.to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            brand: default_brand(),
            sim_category: default_sim_category(),
            timeout_ms: None,
        }
    }
}

impl Default for NumbersConfig {
    fn default() -> Self {
        Self {
            base_prefix: default_base_prefix(),
            fixed_positions: default_fixed_positions(),
            workers: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScanError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ScanError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ROBI_ENDPOINT})，未定義的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScanError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn brand(&self) -> &str {
        &self.source.brand
    }

    fn sim_category(&self) -> &str {
        &self.source.sim_category
    }

    fn base_prefix(&self) -> &str {
        &self.numbers.base_prefix
    }

    fn fixed_digits(&self) -> &[FixedDigit] {
        &self.numbers.fixed_positions
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn workers(&self) -> usize {
        self.numbers.workers.unwrap_or(defaults::WORKERS)
    }

    fn retry_policy(&self) -> RetryPolicy {
        let ms = |value: Option<u64>, fallback: u64| Duration::from_millis(value.unwrap_or(fallback));
        RetryPolicy {
            max_attempts: self.retry.max_attempts.unwrap_or(defaults::MAX_ATTEMPTS),
            retry_delay: ms(self.retry.retry_delay_ms, defaults::RETRY_DELAY_MS),
            jitter_min: ms(self.retry.jitter_min_ms, defaults::JITTER_MIN_MS),
            jitter_max: ms(self.retry.jitter_max_ms, defaults::JITTER_MAX_MS),
            request_timeout: ms(self.source.timeout_ms, defaults::REQUEST_TIMEOUT_MS),
            drain_passes: self.retry.drain_passes.unwrap_or(defaults::DRAIN_PASSES),
            drain_cooldown: ms(self.retry.drain_cooldown_ms, defaults::DRAIN_COOLDOWN_MS),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        crate::config::validate_provider(self)
    }
}
