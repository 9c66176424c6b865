pub mod toml_config;

use crate::core::{ConfigProvider, FixedDigit, FixedPositions, RetryPolicy};
use crate::utils::error::{Result, ScanError};
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

pub mod defaults {
    pub const API_ENDPOINT: &str =
        "https://da-api.robi.com.bd/da-nll/free-msisdn/get-msisdn-list";
    pub const BRAND: &str = "ROBI";
    pub const SIM_CATEGORY: &str = "PREPAID";
    pub const BASE_PREFIX: &str = "8801886";
    pub const FIXED_POSITIONS: [&str; 2] = ["4=0", "5=0"];
    pub const OUTPUT_PATH: &str = ".";
    pub const WORKERS: usize = 5;
    pub const MAX_ATTEMPTS: u32 = 3;
    pub const RETRY_DELAY_MS: u64 = 1_000;
    pub const JITTER_MIN_MS: u64 = 100;
    pub const JITTER_MAX_MS: u64 = 500;
    pub const REQUEST_TIMEOUT_MS: u64 = 15_000;
    pub const DRAIN_PASSES: u32 = 3;
    pub const DRAIN_COOLDOWN_MS: u64 = 2_000;
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "number-scout")]
#[command(about = "Enumerate phone numbers matching a digit pattern and record the available ones")]
pub struct CliConfig {
    #[arg(long, default_value = defaults::API_ENDPOINT)]
    pub api_endpoint: String,

    #[arg(long, default_value = defaults::BRAND)]
    pub brand: String,

    #[arg(long, default_value = defaults::SIM_CATEGORY)]
    pub sim_category: String,

    #[arg(long, default_value = defaults::BASE_PREFIX)]
    pub base_prefix: String,

    /// Pinned suffix digits as index=digit, comma separated (indices 0-5)
    #[arg(long = "fix", value_delimiter = ',', default_values = defaults::FIXED_POSITIONS)]
    pub fixed_positions: Vec<FixedDigit>,

    /// Directory for the available_numbers_*.txt file
    #[arg(long, default_value = defaults::OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, default_value_t = defaults::WORKERS)]
    pub workers: usize,

    #[arg(long, default_value_t = defaults::MAX_ATTEMPTS)]
    pub max_attempts: u32,

    #[arg(long, default_value_t = defaults::RETRY_DELAY_MS)]
    pub retry_delay_ms: u64,

    #[arg(long, default_value_t = defaults::JITTER_MIN_MS)]
    pub jitter_min_ms: u64,

    #[arg(long, default_value_t = defaults::JITTER_MAX_MS)]
    pub jitter_max_ms: u64,

    #[arg(long, default_value_t = defaults::REQUEST_TIMEOUT_MS)]
    pub request_timeout_ms: u64,

    #[arg(long, default_value_t = defaults::DRAIN_PASSES)]
    pub drain_passes: u32,

    #[arg(long, default_value_t = defaults::DRAIN_COOLDOWN_MS)]
    pub drain_cooldown_ms: u64,

    #[arg(long, help = "Show the candidate range without sending any request")]
    pub dry_run: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn brand(&self) -> &str {
        &self.brand
    }

    fn sim_category(&self) -> &str {
        &self.sim_category
    }

    fn base_prefix(&self) -> &str {
        &self.base_prefix
    }

    fn fixed_digits(&self) -> &[FixedDigit] {
        &self.fixed_positions
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn workers(&self) -> usize {
        self.workers
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            jitter_min: Duration::from_millis(self.jitter_min_ms),
            jitter_max: Duration::from_millis(self.jitter_max_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            drain_passes: self.drain_passes,
            drain_cooldown: Duration::from_millis(self.drain_cooldown_ms),
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

/// 所有配置來源共用的檢查
pub fn validate_provider(config: &impl ConfigProvider) -> Result<()> {
    validation::validate_url("api_endpoint", config.api_endpoint())?;
    validation::validate_non_empty_string("brand", config.brand())?;
    validation::validate_non_empty_string("sim_category", config.sim_category())?;
    validation::validate_digits("base_prefix", config.base_prefix())?;
    FixedPositions::new(config.fixed_digits())?;
    validation::validate_path("output_path", config.output_path())?;
    validation::validate_positive_number("workers", config.workers(), 1)?;

    let policy = config.retry_policy();
    validation::validate_positive_number("max_attempts", policy.max_attempts as usize, 1)?;
    validation::validate_ordered(
        "jitter_ms",
        policy.jitter_min.as_millis(),
        policy.jitter_max.as_millis(),
    )?;
    if policy.request_timeout.is_zero() {
        return Err(ScanError::InvalidConfigValueError {
            field: "request_timeout_ms".to_string(),
            value: "0".to_string(),
            reason: "Timeout must be greater than zero".to_string(),
        });
    }
    Ok(())
}
