//! # 统一错误处理模块
//!
//! 定义 imsrg-sweep 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// imsrg-sweep 统一错误类型
#[derive(Error, Debug)]
pub enum SweepError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("File already exists: {path} (use --force to overwrite)")]
    FileExists { path: String },

    // ─────────────────────────────────────────────────────────────
    // 扫描文件错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse sweep file: {path}\nReason: {reason}")]
    SweepFileError { path: String, reason: String },

    #[error("Unknown placeholder '{{{name}}}' in template: {template}")]
    UnknownPlaceholder { name: String, template: String },

    #[error("No element symbol for Z = {0}")]
    UnknownElement(u32),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Missing required parameter '{key}'")]
    MissingParameter { key: String },

    #[error("Invalid value '{value}' for parameter '{key}': {reason}")]
    InvalidParameter {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to run '{command}'")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("External command failed: {command} ({status})")]
    CommandFailed { command: String, status: String },

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, SweepError>;
