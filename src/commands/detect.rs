//! # detect 命令实现
//!
//! 显示探测到的批处理系统。
//!
//! ## 依赖关系
//! - 使用 `models/scheduler.rs`, `utils/output.rs`

use crate::error::Result;
use crate::models::SchedulerKind;
use crate::utils::output;

/// 执行 detect 命令
pub fn execute() -> Result<()> {
    let kind = SchedulerKind::detect();
    match kind.submit_command() {
        Some(cmd) => output::print_success(&format!("Scheduler: {} (submit with {})", kind, cmd)),
        None => output::print_info("Scheduler: NONE (jobs run in the current shell)"),
    }
    Ok(())
}
