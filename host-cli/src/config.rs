//! # Config 模块
//!
//! 宿主配置管理。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// 内置作品
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    /// 旋转的全息棱镜卡片
    Prism,
    /// 翻转卡片（悬停倾斜 + 翻面）
    Flip,
    /// 落下的票据
    Ticket,
}

/// 宿主配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// 帧率
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// 模拟时长（秒）
    #[serde(default = "default_seconds")]
    pub seconds: f32,

    /// 每隔多少帧输出一次槽位值
    #[serde(default = "default_print_every")]
    pub print_every: u32,

    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 启用的内置作品
    #[serde(default = "default_pieces")]
    pub pieces: Vec<PieceKind>,

    /// 额外加载的编排文件
    #[serde(default)]
    pub choreographies: Vec<PathBuf>,
}

fn default_fps() -> u32 {
    60
}

fn default_seconds() -> f32 {
    3.0
}

fn default_print_every() -> u32 {
    15
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_pieces() -> Vec<PieceKind> {
    vec![PieceKind::Prism, PieceKind::Flip, PieceKind::Ticket]
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            seconds: default_seconds(),
            print_every: default_print_every(),
            log_level: default_log_level(),
            pieces: default_pieces(),
            choreographies: Vec::new(),
        }
    }
}

impl HostConfig {
    /// 加载配置文件
    ///
    /// 文件不存在时返回默认配置；存在但无法读取或解析时报错。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        info!(path = %path.display(), "配置文件加载成功");
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialization(e.to_string()))?;
        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// 每帧时间间隔（秒）
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps as f32
    }

    /// 总帧数
    pub fn frame_count(&self) -> u32 {
        (self.seconds * self.fps as f32).round() as u32
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::Validation("帧率必须大于 0".to_string()));
        }
        if !self.seconds.is_finite() || self.seconds < 0.0 {
            return Err(ConfigError::Validation(format!(
                "模拟时长必须是非负数，实际为 {}",
                self.seconds
            )));
        }
        if self.print_every == 0 {
            return Err(ConfigError::Validation(
                "print_every 必须大于 0".to_string(),
            ));
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}",
                self.log_level
            )));
        }
        Ok(())
    }
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    Serialization(String),
    /// 解析失败
    #[error("配置解析失败: {0}")]
    Parse(String),
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(String),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HostConfig::default();
        assert_eq!(config.fps, 60);
        assert_eq!(config.frame_count(), 180);
        assert_eq!(config.pieces.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: HostConfig =
            serde_json::from_str(r#"{ "fps": 30, "pieces": ["flip"] }"#).unwrap();
        assert_eq!(config.fps, 30);
        assert_eq!(config.seconds, 3.0);
        assert_eq!(config.pieces, vec![PieceKind::Flip]);
        assert_eq!(config.frame_count(), 90);
    }

    #[test]
    fn test_config_validation() {
        let mut config = HostConfig::default();

        config.fps = 0;
        assert!(config.validate().is_err());
        config.fps = 60;

        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());
        config.log_level = "debug".to_string();

        config.seconds = -1.0;
        assert!(config.validate().is_err());
        config.seconds = 1.0;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = HostConfig::load(dir.path().join("config.json")).unwrap();
        assert_eq!(config, HostConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = HostConfig {
            fps: 24,
            choreographies: vec![PathBuf::from("drop.json")],
            ..HostConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = HostConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ fps: ").unwrap();

        let err = HostConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
