//! # submit 子命令 CLI 定义
//!
//! 展开扫描文件并逐个提交 imsrg++ 作业
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/submit.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 调度系统选择
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SchedulerChoice {
    /// Detect from available commands (qsub, then srun)
    Auto,
    /// PBS / Torque (qsub)
    Pbs,
    /// SLURM (sbatch)
    Slurm,
    /// No scheduler: run in the current shell
    None,
}

/// submit 子命令参数
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Path to the sweep definition (TOML)
    pub sweep: PathBuf,

    /// Path to the imsrg++ executable [default: $HOME/bin/imsrg++]
    #[arg(long, env = "IMSRG_EXE")]
    pub exe: Option<String>,

    /// OpenMP threads per job [default: 12]
    #[arg(long, env = "IMSRG_NTHREADS")]
    pub threads: Option<u32>,

    /// Notification e-mail address for the scheduler
    #[arg(long, env = "IMSRG_MAIL")]
    pub mail: Option<String>,

    /// Scheduler to submit to
    #[arg(long, value_enum, default_value = "auto")]
    pub scheduler: SchedulerChoice,

    /// PBS queue name [default: batchmpi]
    #[arg(long)]
    pub pbs_queue: Option<String>,

    // ─────────────────────────────────────────────────────────────
    // 执行控制
    // ─────────────────────────────────────────────────────────────
    /// Run every job in the current shell instead of submitting
    #[arg(long, default_value_t = false)]
    pub no_batch: bool,

    /// Print scripts/commands without writing or running anything
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Pause between scheduler submissions, in milliseconds
    #[arg(long, default_value_t = 100)]
    pub delay_ms: u64,
}
