//! # plan 命令实现
//!
//! 展开扫描文件并以表格列出全部作业，不提交任何内容。
//!
//! ## 功能
//! - 终端表格（作业名、参考核、emax、hw、墙钟时间）
//! - 可选 CSV 导出
//! - 作业名重复检查
//!
//! ## 依赖关系
//! - 使用 `cli/plan.rs` 定义的参数
//! - 使用 `sweep/`, `models/job.rs`, `utils/output.rs`

use crate::cli::plan::PlanArgs;
use crate::error::{Result, SweepError};
use crate::models::Job;
use crate::sweep::{SweepFile, SweepPlan};
use crate::utils::output;

use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tabled::{Table, Tabled};

/// 作业列表行
#[derive(Debug, Clone, Tabled, Serialize)]
struct PlanRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Job name")]
    job_name: String,
    #[tabled(rename = "Reference")]
    reference: String,
    #[tabled(rename = "emax")]
    emax: String,
    #[tabled(rename = "hw")]
    hw: String,
    #[tabled(rename = "Wall time (SLURM)")]
    wall_time: String,
}

/// 执行 plan 命令
pub fn execute(args: PlanArgs) -> Result<()> {
    output::print_header("IMSRG++ Sweep Plan");

    let file = SweepFile::load(&args.sweep)?;
    let points = SweepPlan::from_file(&file)?.expand()?;
    let executable = file.executable.as_deref().unwrap_or("imsrg++");

    let jobs = points
        .into_iter()
        .map(|params| Job::build(params, executable))
        .collect::<Result<Vec<_>>>()?;
    let rows = plan_rows(&jobs);

    println!("{}", Table::new(&rows));
    output::print_info(&format!("{} jobs in '{}'", rows.len(), args.sweep.display()));

    for name in duplicate_names(&jobs) {
        output::print_warning(&format!(
            "Job name '{}' appears more than once; scheduler scripts would collide",
            name
        ));
    }

    if let Some(ref csv_path) = args.csv {
        save_plan_csv(&rows, csv_path)?;
        output::print_success(&format!("Plan saved to '{}'", csv_path.display()));
    }

    Ok(())
}

fn plan_rows(jobs: &[Job]) -> Vec<PlanRow> {
    jobs.iter()
        .enumerate()
        .map(|(i, job)| PlanRow {
            index: i + 1,
            job_name: job.name.clone(),
            reference: job.params.get("reference").unwrap_or("").to_string(),
            emax: job.params.get("emax").unwrap_or("").to_string(),
            hw: job.params.get("hw").unwrap_or("").to_string(),
            wall_time: job.wall_time.to_string(),
        })
        .collect()
}

/// 重复出现的作业名，按首次出现顺序
fn duplicate_names(jobs: &[Job]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();
    for job in jobs {
        if !seen.insert(job.name.as_str()) && reported.insert(job.name.as_str()) {
            duplicates.push(job.name.clone());
        }
    }
    duplicates
}

/// 保存作业列表到 CSV
fn save_plan_csv(rows: &[PlanRow], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(|e| SweepError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    Ok(())
}
