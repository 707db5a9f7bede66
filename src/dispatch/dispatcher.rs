//! # 作业分发器
//!
//! 对单个作业：生成调度脚本 → 写入临时文件 → 提交 → 删除临时文件，
//! 或在直接模式下前台运行 imsrg++。
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 使用
//! - 使用 `dispatch/script.rs`, `dispatch/runner.rs`
//! - 使用 `models/job.rs`, `models/scheduler.rs`

use super::runner::CommandRunner;
use super::script::{render_script, ScriptContext};
use crate::error::{Result, SweepError};
use crate::models::{Job, SchedulerKind};

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// 默认 OpenMP 线程数
pub const DEFAULT_THREADS: u32 = 12;

/// 两次提交之间的默认间隔
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(100);

/// 默认 PBS 队列
pub const DEFAULT_PBS_QUEUE: &str = "batchmpi";

/// 运行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// 提交到调度系统（无调度系统时退化为直接运行）
    Batch,
    /// 在当前终端直接运行
    Direct,
}

/// 分发配置，启动时构建一次
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub scheduler: SchedulerKind,
    pub mode: RunMode,
    /// 只渲染不执行
    pub dry_run: bool,
    pub threads: u32,
    pub mail: String,
    pub workdir: String,
    pub pbs_queue: String,
    pub submit_delay: Duration,
    /// 临时脚本所在目录（空路径即当前目录）
    pub script_dir: PathBuf,
}

impl DispatchConfig {
    /// 实际生效的调度系统；直接模式下为 `None`
    pub fn effective_scheduler(&self) -> SchedulerKind {
        match self.mode {
            RunMode::Batch => self.scheduler,
            RunMode::Direct => SchedulerKind::None,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            scheduler: SchedulerKind::None,
            mode: RunMode::Batch,
            dry_run: false,
            threads: DEFAULT_THREADS,
            mail: String::new(),
            workdir: ".".to_string(),
            pbs_queue: DEFAULT_PBS_QUEUE.to_string(),
            submit_delay: DEFAULT_SUBMIT_DELAY,
            script_dir: PathBuf::new(),
        }
    }
}

/// 单个作业的分发结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 已提交；附带调度系统输出
    Submitted { script: String, response: String },
    /// 已在前台运行结束
    Executed,
    /// 预演：渲染出的脚本或命令行
    Previewed(String),
}

/// 作业分发器
pub struct Dispatcher<R: CommandRunner> {
    config: DispatchConfig,
    runner: R,
}

impl<R: CommandRunner> Dispatcher<R> {
    pub fn new(config: DispatchConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// 分发一个作业
    pub fn dispatch(&mut self, job: &Job) -> Result<Outcome> {
        let kind = self.config.effective_scheduler();
        let ctx = ScriptContext {
            job_name: &job.name,
            log_name: &job.log_name,
            wall_time: job.wall_time,
            threads: self.config.threads,
            mail: &self.config.mail,
            workdir: &self.config.workdir,
            pbs_queue: &self.config.pbs_queue,
            command: &job.command,
        };

        let rendered = render_script(kind, &ctx);
        let (script, submit_cmd, file_name) = match (
            rendered,
            kind.submit_command(),
            kind.script_file_name(&job.name),
        ) {
            (Some(script), Some(cmd), Some(file)) => (script, cmd, file),
            _ => return self.run_direct(job),
        };

        if self.config.dry_run {
            return Ok(Outcome::Previewed(script));
        }

        let path = self.config.script_dir.join(&file_name);
        fs::write(&path, &script).map_err(|e| SweepError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;

        // 无法启动提交命令时保留脚本文件
        let response = match self.runner.submit(submit_cmd, &path) {
            Err(e @ SweepError::CommandSpawn { .. }) => return Err(e),
            other => other,
        };

        // 提交失败时优先返回调度系统的错误
        let removed = fs::remove_file(&path);
        let response = response?;
        removed.map_err(|e| SweepError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;

        thread::sleep(self.config.submit_delay);
        Ok(Outcome::Submitted {
            script: file_name,
            response,
        })
    }

    /// 按空白拆分命令行并前台运行
    fn run_direct(&mut self, job: &Job) -> Result<Outcome> {
        if self.config.dry_run {
            return Ok(Outcome::Previewed(job.command.clone()));
        }

        let mut tokens = job.command.split_whitespace();
        let program = tokens
            .next()
            .ok_or_else(|| SweepError::InvalidArgument("empty command line".to_string()))?;
        let args: Vec<&str> = tokens.collect();

        self.runner.execute(program, &args)?;
        Ok(Outcome::Executed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParameterSet;
    use std::path::Path;

    /// 记录调用的假执行器
    #[derive(Default)]
    struct RecordingRunner {
        submissions: Vec<(String, PathBuf, String)>,
        executions: Vec<(String, Vec<String>)>,
        fail_submit: Option<fn(&str) -> SweepError>,
        /// 提交时自行删除脚本
        consume_script: bool,
    }

    impl CommandRunner for RecordingRunner {
        fn submit(&mut self, program: &str, script: &Path) -> Result<String> {
            let content = fs::read_to_string(script).unwrap_or_default();
            self.submissions
                .push((program.to_string(), script.to_path_buf(), content));
            if self.consume_script {
                fs::remove_file(script).unwrap();
            }
            match self.fail_submit {
                Some(make_err) => Err(make_err(program)),
                None => Ok("4242.headnode".to_string()),
            }
        }

        fn execute(&mut self, program: &str, args: &[&str]) -> Result<()> {
            self.executions.push((
                program.to_string(),
                args.iter().map(|a| a.to_string()).collect(),
            ));
            Ok(())
        }
    }

    fn rejected(program: &str) -> SweepError {
        SweepError::CommandFailed {
            command: program.to_string(),
            status: "exit code 1".to_string(),
        }
    }

    fn unspawnable(program: &str) -> SweepError {
        SweepError::CommandSpawn {
            command: program.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        }
    }

    fn job() -> Job {
        let params: ParameterSet = [
            ("valence_space", "p-shell"),
            ("LECs", "srg0625"),
            ("method", "magnus"),
            ("reference", "Be8"),
            ("emax", "10"),
            ("e3max", "14"),
            ("smax", "500"),
            ("hw", "12"),
            ("A", "8"),
            ("file2e1max", "14 file2e2max=28 file2lmax=10"),
        ]
        .into_iter()
        .collect();
        Job::build(params, "/x/imsrg++").unwrap()
    }

    fn config(dir: &Path, scheduler: SchedulerKind) -> DispatchConfig {
        DispatchConfig {
            scheduler,
            mail: "user@example.org".to_string(),
            submit_delay: Duration::ZERO,
            script_dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_slurm_submission_writes_and_removes_script() {
        let dir = tempfile::tempdir().unwrap();
        let job = job();
        let mut dispatcher =
            Dispatcher::new(config(dir.path(), SchedulerKind::Slurm), RecordingRunner::default());

        let outcome = dispatcher.dispatch(&job).unwrap();
        assert_eq!(
            outcome,
            Outcome::Submitted {
                script: job.name.clone(),
                response: "4242.headnode".to_string()
            }
        );

        let (program, path, content) = &dispatcher.runner.submissions[0];
        assert_eq!(program, "sbatch");
        assert_eq!(path, &dir.path().join(&job.name));
        assert!(content.contains("#SBATCH --time=12:00:00\n"));
        assert!(content.ends_with(&format!("time srun {}\n", job.command)));
        assert!(!path.exists());
    }

    #[test]
    fn test_pbs_submission_uses_batch_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let job = job();
        let mut dispatcher =
            Dispatcher::new(config(dir.path(), SchedulerKind::Pbs), RecordingRunner::default());

        dispatcher.dispatch(&job).unwrap();
        let (program, path, content) = &dispatcher.runner.submissions[0];
        assert_eq!(program, "qsub");
        assert_eq!(path, &dir.path().join(format!("{}.batch", job.name)));
        assert!(content.contains(&format!("#PBS -o imsrg_log/{}.o\n", job.log_name)));
        assert!(!path.exists());
    }

    #[test]
    fn test_direct_mode_splits_on_whitespace_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let job = job();
        let mut cfg = config(dir.path(), SchedulerKind::Slurm);
        cfg.mode = RunMode::Direct;
        let mut dispatcher = Dispatcher::new(cfg, RecordingRunner::default());

        assert_eq!(dispatcher.dispatch(&job).unwrap(), Outcome::Executed);
        assert!(dispatcher.runner.submissions.is_empty());

        let (program, args) = &dispatcher.runner.executions[0];
        assert_eq!(program, "/x/imsrg++");
        assert!(args.contains(&"file2e1max=14".to_string()));
        assert!(args.contains(&"file2e2max=28".to_string()));
        assert_eq!(args.last().unwrap(), &format!("intfile=output/{}", job.name));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_no_scheduler_falls_back_to_direct() {
        let dir = tempfile::tempdir().unwrap();
        let mut dispatcher =
            Dispatcher::new(config(dir.path(), SchedulerKind::None), RecordingRunner::default());
        assert_eq!(dispatcher.dispatch(&job()).unwrap(), Outcome::Executed);
        assert_eq!(dispatcher.runner.executions.len(), 1);
    }

    #[test]
    fn test_dry_run_previews_without_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let job = job();
        let mut cfg = config(dir.path(), SchedulerKind::Pbs);
        cfg.dry_run = true;
        let mut dispatcher = Dispatcher::new(cfg, RecordingRunner::default());

        match dispatcher.dispatch(&job).unwrap() {
            Outcome::Previewed(script) => assert!(script.starts_with("#!/bin/bash\n#PBS -N ")),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(dispatcher.runner.submissions.is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_rejected_submission_removes_script_and_fails() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner {
            fail_submit: Some(rejected as fn(&str) -> SweepError),
            ..Default::default()
        };
        let mut dispatcher = Dispatcher::new(config(dir.path(), SchedulerKind::Slurm), runner);

        assert!(matches!(
            dispatcher.dispatch(&job()),
            Err(SweepError::CommandFailed { .. })
        ));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_rejection_wins_over_cleanup_failure() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner {
            fail_submit: Some(rejected as fn(&str) -> SweepError),
            consume_script: true,
            ..Default::default()
        };
        let mut dispatcher = Dispatcher::new(config(dir.path(), SchedulerKind::Pbs), runner);

        match dispatcher.dispatch(&job()) {
            Err(SweepError::CommandFailed { command, .. }) => assert_eq!(command, "qsub"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_cleanup_failure_after_accepted_submission() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner {
            consume_script: true,
            ..Default::default()
        };
        let mut dispatcher = Dispatcher::new(config(dir.path(), SchedulerKind::Slurm), runner);

        assert!(matches!(
            dispatcher.dispatch(&job()),
            Err(SweepError::FileWriteError { .. })
        ));
    }

    #[test]
    fn test_spawn_failure_leaves_script_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let job = job();
        let runner = RecordingRunner {
            fail_submit: Some(unspawnable as fn(&str) -> SweepError),
            ..Default::default()
        };
        let mut dispatcher = Dispatcher::new(config(dir.path(), SchedulerKind::Slurm), runner);

        assert!(dispatcher.dispatch(&job).is_err());
        assert!(dir.path().join(&job.name).exists());
    }
}
