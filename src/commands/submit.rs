//! # submit 命令实现
//!
//! 展开扫描文件，逐个构建作业并提交到 PBS/SLURM 或在终端直接运行。
//!
//! ## 功能
//! - 读取扫描文件并展开嵌套循环
//! - 探测调度系统，构建一次分发配置
//! - 顺序提交，每次提交后短暂停顿
//! - 首个失败即中止，并报告正在处理的作业
//!
//! ## 依赖关系
//! - 使用 `cli/submit.rs` 定义的参数
//! - 使用 `sweep/`, `models/`, `dispatch/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::submit::{SchedulerChoice, SubmitArgs};
use crate::dispatch::dispatcher::{DEFAULT_PBS_QUEUE, DEFAULT_THREADS};
use crate::dispatch::{CommandRunner, DispatchConfig, Dispatcher, Outcome, RunMode, SystemRunner};
use crate::error::{Result, SweepError};
use crate::models::{Job, ParameterSet, SchedulerKind};
use crate::sweep::{SweepFile, SweepPlan};
use crate::utils::{output, progress};

use indicatif::ProgressBar;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// 需要预先创建的日志目录
const LOG_DIRS: [&str; 2] = ["imsrg_log", "slurm_log"];

/// 扫描执行统计
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub submitted: usize,
    pub executed: usize,
    pub previewed: usize,
}

/// 执行 submit 命令
pub fn execute(args: SubmitArgs) -> Result<()> {
    output::print_header("IMSRG++ Sweep Submission");

    let file = SweepFile::load(&args.sweep)?;
    let plan = SweepPlan::from_file(&file)?;
    if plan.is_empty() {
        output::print_warning("Sweep defines an empty axis; nothing to submit");
    }
    let points = plan.expand()?;
    output::print_info(&format!(
        "Expanded '{}' into {} jobs",
        args.sweep.display(),
        points.len()
    ));

    let executable = resolve_executable(args.exe.as_deref(), file.executable.as_deref())?;
    let config = build_config(&args, &file, resolve_scheduler(args.scheduler))?;

    let effective = config.effective_scheduler();
    output::print_info(&format!("Scheduler: {}", config.scheduler));
    if effective == SchedulerKind::None {
        output::print_info("Jobs will run in the current shell");
    } else if config.mail.is_empty() {
        output::print_warning("No notification address set (--mail or `mail` in the sweep file)");
    }
    output::print_info(&format!("Executable: {}", executable));
    output::print_info(&format!("Threads per job: {}", config.threads));

    if !config.dry_run {
        for dir in LOG_DIRS {
            fs::create_dir_all(dir).map_err(|e| SweepError::FileWriteError {
                path: dir.to_string(),
                source: e,
            })?;
        }
    }

    let pb = if effective != SchedulerKind::None && !config.dry_run {
        progress::create_progress_bar(points.len() as u64, "Submitting")
    } else {
        ProgressBar::hidden()
    };

    let mut dispatcher = Dispatcher::new(config, SystemRunner);
    let result = run_sweep(&mut dispatcher, points, &executable, &pb);
    pb.finish_and_clear();
    let summary = result?;

    output::print_separator();
    output::print_done(&format!(
        "Submitted {} jobs, ran {} jobs, previewed {} jobs",
        summary.submitted, summary.executed, summary.previewed
    ));
    Ok(())
}

/// 顺序分发所有扫描点；遇到首个错误即返回
pub fn run_sweep<R: CommandRunner>(
    dispatcher: &mut Dispatcher<R>,
    points: Vec<ParameterSet>,
    executable: &str,
    pb: &ProgressBar,
) -> Result<SweepSummary> {
    let mut summary = SweepSummary::default();

    for params in points {
        let job = match Job::build(params.clone(), executable) {
            Ok(job) => job,
            Err(e) => {
                pb.suspend(|| {
                    output::print_error(&format!(
                        "Could not build job from: {}",
                        params.render_command(executable)
                    ))
                });
                return Err(e);
            }
        };

        match dispatcher.dispatch(&job) {
            Ok(Outcome::Submitted { script, response }) => {
                pb.suspend(|| {
                    output::print_success(&format!("Submitted: {} - {}", script, response))
                });
                summary.submitted += 1;
            }
            Ok(Outcome::Executed) => {
                output::print_success(&format!("Finished: {}", job.name));
                summary.executed += 1;
            }
            Ok(Outcome::Previewed(text)) => {
                output::print_dry(&job.name, &text);
                summary.previewed += 1;
            }
            Err(e) => {
                pb.suspend(|| {
                    output::print_error(&format!("Sweep stopped at job: {}", job.name));
                    output::print_error(&format!("Command: {}", job.command));
                });
                return Err(e);
            }
        }
        pb.inc(1);
    }

    Ok(summary)
}

/// 确定调度系统（仅在 auto 时探测）
fn resolve_scheduler(choice: SchedulerChoice) -> SchedulerKind {
    match choice {
        SchedulerChoice::Auto => SchedulerKind::detect(),
        SchedulerChoice::Pbs => SchedulerKind::Pbs,
        SchedulerChoice::Slurm => SchedulerKind::Slurm,
        SchedulerChoice::None => SchedulerKind::None,
    }
}

/// 可执行文件：命令行 > 扫描文件 > `$HOME/bin/imsrg++`
fn resolve_executable(cli: Option<&str>, file: Option<&str>) -> Result<String> {
    if let Some(exe) = cli.or(file) {
        return Ok(exe.to_string());
    }
    let home = env::var("HOME").map_err(|_| {
        SweepError::InvalidArgument("HOME is not set; pass --exe explicitly".to_string())
    })?;
    Ok(format!("{}/bin/imsrg++", home))
}

/// PBS 工作目录：`$PWD`，否则进程当前目录
fn resolve_workdir() -> Result<String> {
    if let Ok(pwd) = env::var("PWD") {
        return Ok(pwd);
    }
    env::current_dir()
        .map(|p| p.display().to_string())
        .map_err(|e| SweepError::FileReadError {
            path: ".".to_string(),
            source: e,
        })
}

/// 合并默认值、扫描文件和命令行参数
fn build_config(
    args: &SubmitArgs,
    file: &SweepFile,
    scheduler: SchedulerKind,
) -> Result<DispatchConfig> {
    let threads = args
        .threads
        .or(file.threads)
        .unwrap_or(DEFAULT_THREADS);
    if threads == 0 {
        return Err(SweepError::InvalidArgument(
            "thread count must be at least 1".to_string(),
        ));
    }

    Ok(DispatchConfig {
        scheduler,
        mode: if args.no_batch {
            RunMode::Direct
        } else {
            RunMode::Batch
        },
        dry_run: args.dry_run,
        threads,
        mail: args
            .mail
            .clone()
            .or_else(|| file.mail.clone())
            .unwrap_or_default(),
        workdir: resolve_workdir()?,
        pbs_queue: args
            .pbs_queue
            .clone()
            .or_else(|| file.pbs_queue.clone())
            .unwrap_or_else(|| DEFAULT_PBS_QUEUE.to_string()),
        submit_delay: Duration::from_millis(args.delay_ms),
        script_dir: PathBuf::new(),
    })
}
