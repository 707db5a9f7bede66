//! # init 命令实现
//!
//! 写出示例扫描文件。
//!
//! ## 依赖关系
//! - 使用 `cli/init.rs` 定义的参数
//! - 使用 `sweep/config.rs` 中的示例内容

use crate::cli::init::InitArgs;
use crate::error::{Result, SweepError};
use crate::sweep::SAMPLE_SWEEP;
use crate::utils::output;

use std::fs;
use std::path::Path;

/// 执行 init 命令
pub fn execute(args: InitArgs) -> Result<()> {
    write_sample(&args.path, args.force)?;
    output::print_success(&format!("Wrote sample sweep: {}", args.path.display()));
    Ok(())
}

fn write_sample(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(SweepError::FileExists {
            path: path.display().to_string(),
        });
    }
    fs::write(path, SAMPLE_SWEEP).map_err(|e| SweepError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}
