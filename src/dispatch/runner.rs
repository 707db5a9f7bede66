//! # 外部命令执行
//!
//! 提交命令 (`qsub` / `sbatch`) 和 imsrg++ 直接运行的进程边界。
//!
//! ## 依赖关系
//! - 被 `dispatch/dispatcher.rs` 使用
//! - 无外部模块依赖

use crate::error::{Result, SweepError};

use std::path::Path;
use std::process::{Command, ExitStatus};

/// 进程执行接口
pub trait CommandRunner {
    /// 提交脚本，返回调度系统的标准输出（通常是作业 ID）
    fn submit(&mut self, program: &str, script: &Path) -> Result<String>;

    /// 前台运行程序，标准输出/错误直接继承到当前终端，阻塞至结束
    fn execute(&mut self, program: &str, args: &[&str]) -> Result<()>;
}

/// 基于 `std::process::Command` 的实现
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn submit(&mut self, program: &str, script: &Path) -> Result<String> {
        let command = format!("{} {}", program, script.display());
        let out = Command::new(program)
            .arg(script)
            .output()
            .map_err(|e| SweepError::CommandSpawn {
                command: command.clone(),
                source: e,
            })?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(SweepError::CommandFailed {
                command,
                status: describe_status(out.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }

    fn execute(&mut self, program: &str, args: &[&str]) -> Result<()> {
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| SweepError::CommandSpawn {
                command: program.to_string(),
                source: e,
            })?;

        if !status.success() {
            return Err(SweepError::CommandFailed {
                command: program.to_string(),
                status: describe_status(status, ""),
            });
        }
        Ok(())
    }
}

fn describe_status(status: ExitStatus, stderr: &str) -> String {
    let code = match status.code() {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    };
    if stderr.is_empty() {
        code
    } else {
        format!("{}: {}", code, stderr)
    }
}
