//! # plan 子命令 CLI 定义
//!
//! 列出扫描文件展开后的全部作业
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/plan.rs`

use clap::Args;
use std::path::PathBuf;

/// plan 子命令参数
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the sweep definition (TOML)
    pub sweep: PathBuf,

    /// Also write the job list to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}
