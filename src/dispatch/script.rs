//! # 调度脚本生成
//!
//! 按调度系统生成 PBS (`qsub`) 或 SLURM (`sbatch`) 提交脚本。
//!
//! ## 依赖关系
//! - 被 `dispatch/dispatcher.rs` 使用
//! - 使用 `models/scheduler.rs`

use crate::models::SchedulerKind;

/// PBS 固定墙钟时间
pub const PBS_WALLTIME: &str = "192:00:00";

/// PBS 固定虚拟内存
pub const PBS_VMEM: &str = "60gb";

/// 渲染脚本所需的作业信息
#[derive(Debug, Clone)]
pub struct ScriptContext<'a> {
    pub job_name: &'a str,
    pub log_name: &'a str,
    pub wall_time: &'a str,
    pub threads: u32,
    pub mail: &'a str,
    pub workdir: &'a str,
    pub pbs_queue: &'a str,
    pub command: &'a str,
}

/// 按调度系统生成脚本；无调度系统时返回 `None`
pub fn render_script(kind: SchedulerKind, ctx: &ScriptContext<'_>) -> Option<String> {
    match kind {
        SchedulerKind::None => None,
        SchedulerKind::Pbs => Some(generate_pbs_script(ctx)),
        SchedulerKind::Slurm => Some(generate_sbatch_script(ctx)),
    }
}

/// 生成 PBS 脚本内容
pub fn generate_pbs_script(ctx: &ScriptContext<'_>) -> String {
    format!(
        r#"#!/bin/bash
#PBS -N {}
#PBS -q {}
#PBS -d {}
#PBS -l walltime={}
#PBS -l nodes=1:ppn={}
#PBS -l vmem={}
#PBS -m ae
#PBS -M {}
#PBS -j oe
#PBS -o imsrg_log/{}.o
cd $PBS_O_WORKDIR
export OMP_NUM_THREADS={}
{}
"#,
        ctx.job_name,
        ctx.pbs_queue,
        ctx.workdir,
        PBS_WALLTIME,
        ctx.threads,
        PBS_VMEM,
        ctx.mail,
        ctx.log_name,
        ctx.threads,
        ctx.command,
    )
}

/// 生成 sbatch 脚本内容
pub fn generate_sbatch_script(ctx: &ScriptContext<'_>) -> String {
    format!(
        r#"#!/bin/bash
#SBATCH --nodes=1
#SBATCH --ntasks=1
#SBATCH --cpus-per-task={}
#SBATCH --output=imsrg_log/{}.%j
#SBATCH --time={}
#SBATCH --mail-user={}
#SBATCH --mail-type=END
cd $SLURM_SUBMIT_DIR
echo NTHREADS = {}
export OMP_NUM_THREADS={}
time srun {}
"#,
        ctx.threads,
        ctx.job_name,
        ctx.wall_time,
        ctx.mail,
        ctx.threads,
        ctx.threads,
        ctx.command,
    )
}
