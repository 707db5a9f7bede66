//! # 调度系统类型
//!
//! 启动时探测一次可用的批处理系统（PBS / SLURM），进程生命周期内不变。
//!
//! ## 依赖关系
//! - 被 `dispatch/`, `commands/` 使用
//! - 无外部模块依赖

use std::ffi::OsStr;
use std::fmt;
use std::process::{Command, Stdio};

/// 探测所用的 shell（与 `type` 内建命令配合）
const DETECT_SHELL: &str = "/bin/sh";

/// 批处理系统类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerKind {
    /// 无调度系统，直接在当前终端运行
    None,
    /// PBS / Torque (`qsub`)
    Pbs,
    /// SLURM (`sbatch` / `srun`)
    Slurm,
}

impl SchedulerKind {
    /// 探测当前环境的调度系统：先 `qsub`，后 `srun`
    pub fn detect() -> Self {
        Self::detect_with(|tool| shell_has_command(tool, None))
    }

    /// 使用自定义探测函数判定调度系统
    pub fn detect_with<F: FnMut(&str) -> bool>(mut has_tool: F) -> Self {
        if has_tool("qsub") {
            SchedulerKind::Pbs
        } else if has_tool("srun") {
            SchedulerKind::Slurm
        } else {
            SchedulerKind::None
        }
    }

    /// 提交命令
    pub fn submit_command(&self) -> Option<&'static str> {
        match self {
            SchedulerKind::None => None,
            SchedulerKind::Pbs => Some("qsub"),
            SchedulerKind::Slurm => Some("sbatch"),
        }
    }

    /// 临时脚本文件名
    pub fn script_file_name(&self, job_name: &str) -> Option<String> {
        match self {
            SchedulerKind::None => None,
            SchedulerKind::Pbs => Some(format!("{}.batch", job_name)),
            SchedulerKind::Slurm => Some(job_name.to_string()),
        }
    }
}

impl fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerKind::None => write!(f, "NONE"),
            SchedulerKind::Pbs => write!(f, "PBS"),
            SchedulerKind::Slurm => write!(f, "SLURM"),
        }
    }
}

/// 通过 `sh -c "type <tool>"` 检查命令是否可用，输出丢弃
///
/// `path` 指定时替换子进程的 `PATH`。
pub fn shell_has_command(tool: &str, path: Option<&OsStr>) -> bool {
    let mut cmd = Command::new(DETECT_SHELL);
    cmd.arg("-c")
        .arg(format!("type {}", tool))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    if let Some(path) = path {
        cmd.env("PATH", path);
    }

    cmd.status().map(|s| s.success()).unwrap_or(false)
}
