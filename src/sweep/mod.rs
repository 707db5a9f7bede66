//! # 参数扫描模块
//!
//! 读取扫描文件并将嵌套循环展开为逐点参数集。
//!
//! ## 功能
//! - TOML 扫描文件解析
//! - `{name}` / `{name:0N}` 占位符替换
//! - 按 Z 生成元素符号
//! - 外层到内层的笛卡尔积展开
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/parameters.rs`
//! - 子模块: config, elements, expansion, template

pub mod config;
pub mod elements;
pub mod expansion;
pub mod template;

pub use config::{SweepFile, SAMPLE_SWEEP};
pub use expansion::SweepPlan;
