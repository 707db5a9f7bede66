//! # imsrg-sweep - IMSRG++ 参数扫描作业提交工具
//!
//! 根据扫描文件生成 PBS/SLURM 提交脚本并提交，或在当前终端直接运行 imsrg++。
//!
//! ## 子命令
//! - `submit` - 展开扫描并提交/运行所有作业
//! - `plan`   - 列出扫描中的作业
//! - `detect` - 显示探测到的调度系统
//! - `init`   - 生成示例扫描文件
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── sweep/     (扫描文件与循环展开)
//!   │     ├── dispatch/  (脚本生成与提交)
//!   │     └── models/    (参数集、作业、调度系统)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod dispatch;
mod error;
mod models;
mod sweep;
mod utils;

use clap::Parser;
use cli::Cli;
use std::error::Error;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        let mut source = e.source();
        while let Some(cause) = source {
            utils::output::print_error(&format!("  caused by: {}", cause));
            source = cause.source();
        }
        std::process::exit(1);
    }
}
