//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `submit`: 展开扫描并提交/运行作业
//! - `plan`: 列出扫描中的作业
//! - `detect`: 显示探测到的调度系统
//! - `init`: 生成示例扫描文件
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: init, plan, submit

pub mod init;
pub mod plan;
pub mod submit;

use clap::{Parser, Subcommand};

/// imsrg-sweep - IMSRG++ 参数扫描作业提交工具
#[derive(Parser)]
#[command(name = "imsrg-sweep")]
#[command(version)]
#[command(about = "Generate and submit PBS/SLURM jobs for IMSRG++ parameter sweeps", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Expand a sweep file and submit (or run) every job
    Submit(submit::SubmitArgs),

    /// List the jobs a sweep file expands to
    Plan(plan::PlanArgs),

    /// Print the detected batch scheduler
    Detect,

    /// Write a sample sweep file
    Init(init::InitArgs),
}
