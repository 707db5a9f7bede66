//! # 作业分发模块
//!
//! 将构建好的作业交给调度系统或直接在终端运行。
//!
//! ## 功能
//! - PBS / SLURM 脚本模板渲染
//! - 临时脚本写入、提交、删除
//! - 无调度系统时前台运行 imsrg++
//! - 预演模式（只打印不执行）
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 使用
//! - 使用 `models/` 模块
//! - 子模块: dispatcher, runner, script

pub mod dispatcher;
pub mod runner;
pub mod script;

pub use dispatcher::{DispatchConfig, Dispatcher, Outcome, RunMode};
pub use runner::{CommandRunner, SystemRunner};
