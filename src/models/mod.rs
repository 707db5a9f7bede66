//! # 数据模型模块
//!
//! 定义参数集、作业描述和调度系统类型。
//!
//! ## 依赖关系
//! - 被 `sweep/`, `dispatch/`, `commands/` 使用
//! - 子模块: parameters, job, scheduler

pub mod job;
pub mod parameters;
pub mod scheduler;

pub use job::Job;
pub use parameters::ParameterSet;
pub use scheduler::SchedulerKind;
