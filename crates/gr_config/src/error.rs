// crates/gr_config/src/error.rs

//! 配置加载与校验错误
//!
//! 库层通过 `From<ConfigError> for GrError` 把配置错误并入 [`GrError::Config`]，
//! 命令行层直接以 `anyhow` 上下文报告。

use gr_foundation::GrError;

/// 模拟配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 读写配置文件失败
    #[error("配置文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 格式不合法或字段类型不符
    #[error("配置 JSON 无法解析: {0}")]
    Parse(String),

    /// 字段取值超出允许范围，或与其他字段矛盾
    #[error("配置项 '{key}' 取值 {value} 不合法: {reason}")]
    InvalidValue {
        /// 点分路径，如 `grid.n1`
        key: String,
        /// 实际取值
        value: String,
        /// 违反的约束
        reason: String,
    },

    /// 必需的配置段不存在
    #[error("缺少配置段: {0}")]
    Missing(String),
}

impl ConfigError {
    /// 字段取值不合法
    pub fn invalid(key: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<ConfigError> for GrError {
    fn from(err: ConfigError) -> Self {
        GrError::config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_names_key_and_value() {
        let err = ConfigError::invalid("time.dt", -1.0, "时间步长必须为正");
        let msg = err.to_string();
        assert!(msg.contains("time.dt"));
        assert!(msg.contains("-1"));
        assert!(msg.contains("时间步长必须为正"));
    }

    #[test]
    fn test_into_gr_error_keeps_message() {
        let err: GrError = ConfigError::Missing("grid".into()).into();
        match err {
            GrError::Config { message } => assert!(message.contains("grid")),
            other => panic!("意外错误: {}", other),
        }
    }
}
