use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::workflow::ConceptReveal;

/// 程序配置
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 后端地址
    pub base_url: String,
    /// 访问令牌（登录由外部完成，这里只负责携带）
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// 引入题答对后是否直接展示概念题
    pub auto_reveal_concept: bool,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 登录失效提示后跳转首页的延迟（毫秒）
    pub redirect_delay_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://paperplay.zsh.cool".to_string(),
            access_token: None,
            refresh_token: None,
            auto_reveal_concept: true,
            request_timeout_secs: 30,
            redirect_delay_ms: 1000,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 读取配置
    ///
    /// 设置了 `PAPERPLAY_CONFIG` 时先加载该 TOML 文件，再用环境变量覆盖。
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("PAPERPLAY_CONFIG") {
            Ok(path) => Self::from_toml_file(path)?,
            Err(_) => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 环境变量覆盖
    pub fn with_env_overrides(self) -> Self {
        Self {
            base_url: std::env::var("PAPERPLAY_BASE_URL").unwrap_or(self.base_url),
            access_token: std::env::var("PAPERPLAY_TOKEN").ok().or(self.access_token),
            refresh_token: std::env::var("PAPERPLAY_REFRESH_TOKEN")
                .ok()
                .or(self.refresh_token),
            auto_reveal_concept: env_parse("AUTO_REVEAL_CONCEPT")
                .unwrap_or(self.auto_reveal_concept),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS")
                .unwrap_or(self.request_timeout_secs),
            redirect_delay_ms: env_parse("REDIRECT_DELAY_MS").unwrap_or(self.redirect_delay_ms),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
        }
    }

    pub fn concept_reveal(&self) -> ConceptReveal {
        if self.auto_reveal_concept {
            ConceptReveal::AutoOnCorrect
        } else {
            ConceptReveal::RequireNext
        }
    }
}

/// 读取并解析环境变量，缺失或无法解析时返回 `None`
fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            base_url = "http://localhost:8080"
            auto_reveal_concept = false
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.concept_reveal(), ConceptReveal::RequireNext);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.redirect_delay_ms, 1000);
        assert!(config.access_token.is_none());
    }

    #[test]
    fn default_reveals_concept_automatically() {
        assert_eq!(Config::default().concept_reveal(), ConceptReveal::AutoOnCorrect);
    }

    #[test]
    fn env_values_are_trimmed_and_parsed() {
        std::env::set_var("PAPERPLAY_TEST_TIMEOUT", " 15 ");
        std::env::set_var("PAPERPLAY_TEST_FLAG", "maybe");

        assert_eq!(env_parse::<u64>("PAPERPLAY_TEST_TIMEOUT"), Some(15));
        assert_eq!(env_parse::<bool>("PAPERPLAY_TEST_FLAG"), None);
        assert_eq!(env_parse::<u64>("PAPERPLAY_TEST_UNSET"), None);
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(Config::from_toml_str("request_timeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::from_toml_file("/nonexistent/paperplay.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/paperplay.toml"));
    }
}
