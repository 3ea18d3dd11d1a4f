use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::generation::SamplingConfig;

const DEFAULT_DATA_PATH: &str = "forwards_clean_with_market_values_updated.csv";
const DEFAULT_LLM_URL: &str = "http://localhost:11434";
const DEFAULT_LLM_MODEL: &str = "qwen2.5:7b";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 75;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone)]
pub struct ScoutConfig {
    pub data_path: PathBuf,
    pub llm_enabled: bool,
    pub llm_url: String,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub sampling: SamplingConfig,
    /// Listen address for the HTTP service.
    pub bind_addr: String,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            llm_enabled: true,
            llm_url: DEFAULT_LLM_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            sampling: SamplingConfig::default(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl ScoutConfig {
    /// Reads `SCOUT_*` variables; call after dotenvy has loaded `.env` files.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let data_path = env_string("SCOUT_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);
        let llm_url = env_string("SCOUT_LLM_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.llm_url);
        let llm_model = env_string("SCOUT_LLM_MODEL").unwrap_or(defaults.llm_model);
        let timeout_secs = env_parse::<u64>("SCOUT_LLM_TIMEOUT_SECS")
            .unwrap_or(DEFAULT_LLM_TIMEOUT_SECS)
            .clamp(5, 600);

        let base = defaults.sampling;
        let sampling = SamplingConfig {
            temperature: env_parse("SCOUT_TEMPERATURE").unwrap_or(base.temperature),
            top_p: env_parse("SCOUT_TOP_P").unwrap_or(base.top_p),
            top_k: env_parse("SCOUT_TOP_K").unwrap_or(base.top_k),
            max_output_tokens: env_parse("SCOUT_MAX_TOKENS").unwrap_or(base.max_output_tokens),
        };

        Self {
            data_path,
            llm_enabled: env_bool("SCOUT_LLM_ENABLED", true),
            llm_url,
            llm_model,
            llm_timeout: Duration::from_secs(timeout_secs),
            sampling,
            bind_addr: env_string("SCOUT_BIND").unwrap_or(defaults.bind_addr),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|v| v.parse::<T>().ok())
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| {
            let t = v.trim().to_ascii_lowercase();
            !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
        })
        .unwrap_or(default)
}
