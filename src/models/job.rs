//! # 作业描述模型
//!
//! 从参数集派生作业名、日志名、输出文件路径和墙钟时间估计。
//!
//! ## 作业名规则
//! ```text
//! <valence_space>_<LECs>_<method>_<reference>_e<emax>_E<e3max>_s<smax>_hw<hw>_A<A>
//!     [_l<lmax3>][_eta<eta_criterion>][_<core_generator>][_<BetaCM>]
//! ```
//!
//! ## 依赖关系
//! - 被 `sweep/`, `dispatch/`, `commands/` 使用
//! - 使用 `models/parameters.rs`
//! - 使用 `chrono` 生成日志时间戳

use super::parameters::ParameterSet;
use crate::error::{Result, SweepError};

use chrono::NaiveDateTime;

/// 日志名时间戳格式（分钟精度）
const LOG_TIMESTAMP_FORMAT: &str = "%y%m%d%H%M";

/// 参与作业命名的字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingFields {
    pub valence_space: String,
    pub lecs: String,
    pub method: String,
    pub reference: String,
    pub emax: String,
    pub e3max: String,
    pub smax: String,
    pub hw: String,
    pub mass_number: String,
    /// `emax` 的整数值，用于时间估计
    pub emax_level: u32,
    pub lmax3: Option<u32>,
    pub eta_criterion: Option<String>,
    pub core_generator: Option<String>,
    pub beta_cm: Option<String>,
}

impl NamingFields {
    /// 从参数集提取命名字段
    pub fn from_parameters(params: &ParameterSet) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            params
                .get(key)
                .map(str::to_string)
                .ok_or_else(|| SweepError::MissingParameter {
                    key: key.to_string(),
                })
        };
        let optional = |key: &str| params.get(key).map(str::to_string);

        let emax = required("emax")?;
        let emax_level = parse_integer("emax", &emax)?;
        let lmax3 = params
            .get("lmax3")
            .map(|v| parse_integer("lmax3", v))
            .transpose()?;

        Ok(Self {
            valence_space: required("valence_space")?,
            lecs: required("LECs")?,
            method: required("method")?,
            reference: required("reference")?,
            emax,
            e3max: required("e3max")?,
            smax: required("smax")?,
            hw: required("hw")?,
            mass_number: required("A")?,
            emax_level,
            lmax3,
            eta_criterion: optional("eta_criterion"),
            core_generator: optional("core_generator"),
            beta_cm: optional("BetaCM"),
        })
    }

    /// 基础作业名（不含可选后缀）
    pub fn base_name(&self) -> String {
        format!(
            "{}_{}_{}_{}_e{}_E{}_s{}_hw{}_A{}",
            self.valence_space,
            self.lecs,
            self.method,
            self.reference,
            self.emax,
            self.e3max,
            self.smax,
            self.hw,
            self.mass_number
        )
    }

    /// 可选后缀，按固定顺序逐项检查
    pub fn suffixes(&self) -> Vec<String> {
        let mut suffixes = Vec::new();
        if let Some(lmax3) = self.lmax3 {
            suffixes.push(format!("l{}", lmax3));
        }
        if let Some(ref eta) = self.eta_criterion {
            suffixes.push(format!("eta{}", eta));
        }
        if let Some(ref generator) = self.core_generator {
            suffixes.push(generator.clone());
        }
        if let Some(ref beta) = self.beta_cm {
            suffixes.push(beta.clone());
        }
        suffixes
    }

    /// 完整作业名
    pub fn job_name(&self) -> String {
        let mut name = self.base_name();
        for suffix in self.suffixes() {
            name.push('_');
            name.push_str(&suffix);
        }
        name
    }
}

fn parse_integer(key: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| SweepError::InvalidParameter {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a non-negative integer".to_string(),
        })
}

/// 按 emax 估计墙钟时间（仅 SLURM 模板使用）
pub fn estimate_wall_time(emax: u32) -> &'static str {
    match emax {
        0..=4 => "00:10:00",
        5..=7 => "01:00:00",
        8..=9 => "04:00:00",
        10..=11 => "12:00:00",
        _ => "24:00:00",
    }
}

/// 输出 flow 文件路径
pub fn flow_file_path(job_name: &str) -> String {
    format!("output/BCH_{}.dat", job_name)
}

/// 输出积分文件路径
pub fn int_file_path(job_name: &str) -> String {
    format!("output/{}", job_name)
}

/// 扫描中一个完全确定的作业
#[derive(Debug, Clone)]
pub struct Job {
    /// 作业名
    pub name: String,
    /// 日志文件名
    pub log_name: String,
    /// 墙钟时间估计 (HH:MM:SS)
    pub wall_time: &'static str,
    /// 最终参数集（含 flowfile / intfile）
    pub params: ParameterSet,
    /// 渲染后的命令行
    pub command: String,
}

impl Job {
    /// 以当前本地时间构建作业
    pub fn build(params: ParameterSet, executable: &str) -> Result<Self> {
        Self::build_at(params, executable, chrono::Local::now().naive_local())
    }

    /// 以指定时间戳构建作业
    pub fn build_at(
        mut params: ParameterSet,
        executable: &str,
        timestamp: NaiveDateTime,
    ) -> Result<Self> {
        let fields = NamingFields::from_parameters(&params)?;
        let name = fields.job_name();
        let log_name = format!(
            "{}_{}.log",
            name,
            timestamp.format(LOG_TIMESTAMP_FORMAT)
        );

        params.set("flowfile", flow_file_path(&name));
        params.set("intfile", int_file_path(&name));
        let command = params.render_command(executable);

        Ok(Self {
            name,
            log_name,
            wall_time: estimate_wall_time(fields.emax_level),
            params,
            command,
        })
    }
}
