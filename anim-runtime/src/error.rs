//! # Error 模块
//!
//! 定义 anim-runtime 中使用的错误类型。
//!
//! 调度器本身不产生可恢复错误：时长、进度、帧间隔一律截断而不是拒绝。
//! 错误只出现在字符串边界（编排文件、命令行输入）。

use thiserror::Error;

/// 动画错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimError {
    /// 实体不支持的属性名
    #[error("未知的动画属性 '{name}'")]
    InvalidPropertyKind { name: String },

    /// 编排中的非法片段
    #[error("第 {index} 个片段无效 - {message}")]
    InvalidLeg { index: usize, message: String },

    /// 编排文件格式错误
    #[error("编排文件格式错误: {0}")]
    Config(String),
}

impl AnimError {
    /// 创建未知属性错误
    pub fn invalid_property(name: impl Into<String>) -> Self {
        Self::InvalidPropertyKind { name: name.into() }
    }
}

impl From<serde_json::Error> for AnimError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Result 类型别名
pub type AnimResult<T> = Result<T, AnimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnimError::invalid_property("positionW");
        assert_eq!(err.to_string(), "未知的动画属性 'positionW'");

        let err = AnimError::InvalidLeg {
            index: 2,
            message: "时长不能为负".to_string(),
        };
        assert_eq!(err.to_string(), "第 2 个片段无效 - 时长不能为负");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AnimError = json_err.into();
        assert!(matches!(err, AnimError::Config(_)));
    }
}
