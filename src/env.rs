//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量读取。命令行参数优先于环境变量，
//! 环境变量优先于内置默认值。

use std::env;
use std::fmt;

use crate::core::ArchiveOptions;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::DEFAULT.ok_or_else(|| EnvError {
                variable: Self::NAME.to_string(),
                message: "Required environment variable not set".to_string(),
            }),
        }
    }

    /// `None` when the variable is unset, ignoring the default
    fn get_optional() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(None),
        }
    }
}

/// 日志级别
pub struct LogLevel;
impl EnvVar<String> for LogLevel {
    const NAME: &'static str = "WEBARCHIVER_LOG_LEVEL";
    const DEFAULT: Option<String> = None;
    const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

    fn get() -> EnvResult<String> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => Ok("warn".to_string()),
        }
    }

    fn parse(value: &str) -> EnvResult<String> {
        match value.trim().to_lowercase().as_str() {
            level @ ("trace" | "debug" | "info" | "warn" | "error") => Ok(level.to_string()),
            _ => Err(EnvError {
                variable: Self::NAME.to_string(),
                message: format!(
                    "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                    value
                ),
            }),
        }
    }
}

/// 请求超时
pub struct Timeout;
impl EnvVar<u64> for Timeout {
    const NAME: &'static str = "WEBARCHIVER_TIMEOUT";
    const DEFAULT: Option<u64> = Some(crate::core::DEFAULT_TIMEOUT);
    const DESCRIPTION: &'static str = "Per-request timeout in seconds (0 disables)";

    fn parse(value: &str) -> EnvResult<u64> {
        value.trim().parse().map_err(|_| EnvError {
            variable: Self::NAME.to_string(),
            message: "Must be a valid number of seconds".to_string(),
        })
    }
}

/// User-Agent 请求头
pub struct UserAgent;
impl EnvVar<String> for UserAgent {
    const NAME: &'static str = "WEBARCHIVER_USER_AGENT";
    const DEFAULT: Option<String> = None;
    const DESCRIPTION: &'static str = "User-Agent header sent with every request";

    fn parse(value: &str) -> EnvResult<String> {
        let user_agent = value.trim();
        if user_agent.is_empty() {
            return Err(EnvError {
                variable: Self::NAME.to_string(),
                message: "User agent cannot be empty".to_string(),
            });
        }
        Ok(user_agent.to_string())
    }
}

/// 最大并发下载数
pub struct MaxConcurrentFetches;
impl EnvVar<usize> for MaxConcurrentFetches {
    const NAME: &'static str = "WEBARCHIVER_MAX_CONCURRENT_FETCHES";
    const DEFAULT: Option<usize> =
        Some(crate::network::orchestrator::DEFAULT_MAX_CONCURRENT_FETCHES);
    const DESCRIPTION: &'static str = "Maximum simultaneous resource fetches (0 for no limit)";

    fn parse(value: &str) -> EnvResult<usize> {
        parse_usize(value, Self::NAME, 0, 1024)
    }
}

/// 忽略 TLS 证书错误
pub struct Insecure;
impl EnvVar<bool> for Insecure {
    const NAME: &'static str = "WEBARCHIVER_INSECURE";
    const DEFAULT: Option<bool> = Some(false);
    const DESCRIPTION: &'static str = "Accept invalid TLS certificates";

    fn parse(value: &str) -> EnvResult<bool> {
        parse_bool(value, Self::NAME)
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid non-negative number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

/// 环境变量配置汇总
///
/// 未设置的变量为 `None`，应用到 [`ArchiveOptions`] 时保持原值不变。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub log_level: String,
    pub timeout: Option<u64>,
    pub user_agent: Option<String>,
    pub max_concurrent_fetches: Option<usize>,
    pub insecure: Option<bool>,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            log_level: LogLevel::get()?,
            timeout: Timeout::get_optional()?,
            user_agent: UserAgent::get_optional()?,
            max_concurrent_fetches: MaxConcurrentFetches::get_optional()?,
            insecure: Insecure::get_optional()?,
        })
    }

    /// 用已设置的变量覆盖选项
    pub fn apply_to(&self, options: &mut ArchiveOptions) {
        if let Some(timeout) = self.timeout {
            options.timeout = timeout;
        }
        if let Some(user_agent) = &self.user_agent {
            options.user_agent = Some(user_agent.clone());
        }
        if let Some(max_concurrent_fetches) = self.max_concurrent_fetches {
            options.max_concurrent_fetches = max_concurrent_fetches;
        }
        if let Some(insecure) = self.insecure {
            options.insecure = insecure;
        }
    }
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let entries = [
        (LogLevel::NAME, LogLevel::DESCRIPTION, "\"warn\"".to_string()),
        (Timeout::NAME, Timeout::DESCRIPTION, format!("{:?}", Timeout::DEFAULT)),
        (UserAgent::NAME, UserAgent::DESCRIPTION, format!("{:?}", UserAgent::DEFAULT)),
        (
            MaxConcurrentFetches::NAME,
            MaxConcurrentFetches::DESCRIPTION,
            format!("{:?}", MaxConcurrentFetches::DEFAULT),
        ),
        (Insecure::NAME, Insecure::DESCRIPTION, format!("{:?}", Insecure::DEFAULT)),
    ];

    let mut docs = String::new();
    docs.push_str("# Environment Variables\n\n");
    docs.push_str("| Variable | Description | Default |\n");
    docs.push_str("|----------|-------------|---------|\n");
    for (name, description, default) in entries {
        docs.push_str(&format!("| `{}` | {} | {} |\n", name, description, default));
    }
    docs
}
