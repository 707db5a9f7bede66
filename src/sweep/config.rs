//! # 扫描文件
//!
//! 解析 TOML 格式的扫描定义：基础参数、循环轴和逐点模板参数。
//!
//! ## 文件结构
//! ```toml
//! threads = 12
//! mail = "you@example.org"
//!
//! [params]          # 基础参数集，保持文件顺序
//! smax = "500"
//!
//! [sweep]
//! Z = [12, 13]
//! A = [25]
//! reference = ["{elem}{A}"]
//! emax = [2]
//! hw = [20]
//!
//! [sweep.axes]      # 额外循环（最内层）
//! BetaCM = ["0.0", "1.0"]
//!
//! [sweep.params]    # 逐点模板参数
//! 2bme = "input/chi2b_hwHO{hw:03}.me2j.gz"
//! ```
//!
//! ## 依赖关系
//! - 被 `sweep/expansion.rs`, `commands/` 使用
//! - 使用 `serde` + `toml`（`preserve_order` 保持键顺序）

use crate::error::{Result, SweepError};

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// 扫描文件顶层结构
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepFile {
    /// imsrg++ 可执行文件路径
    pub executable: Option<String>,
    /// OpenMP 线程数
    pub threads: Option<u32>,
    /// 作业通知邮箱
    pub mail: Option<String>,
    /// PBS 队列名
    pub pbs_queue: Option<String>,
    /// 基础参数集
    #[serde(default)]
    pub params: toml::Table,
    /// 循环定义
    #[serde(default)]
    pub sweep: SweepAxes,
}

/// 嵌套循环轴，外层到内层：Z, A, reference, emax, hw, axes
///
/// 未给出（或为空）的轴不参与循环，沿用基础参数中的值。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepAxes {
    /// 质子数，仅提供 `{Z}` 和 `{elem}` 占位符
    #[serde(rename = "Z", default)]
    pub z: Vec<u32>,
    /// 质量数
    #[serde(rename = "A", default)]
    pub mass_number: Vec<u32>,
    /// 参考核模板；给出 Z 但未给出时默认为 `{elem}{A}`
    #[serde(default)]
    pub reference: Vec<String>,
    #[serde(default)]
    pub emax: Vec<u32>,
    #[serde(default)]
    pub hw: Vec<u32>,
    /// 额外循环轴
    #[serde(default)]
    pub axes: toml::Table,
    /// 逐点模板参数，在所有循环变量确定后按顺序写入
    #[serde(default)]
    pub params: toml::Table,
}

impl SweepFile {
    /// 从文件加载
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SweepError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(path).map_err(|e| SweepError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// 从字符串解析
    pub fn parse(content: &str, origin: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SweepError::SweepFileError {
            path: origin.to_string(),
            reason: e.to_string(),
        })
    }

    /// 基础参数，按文件顺序
    pub fn base_parameters(&self) -> Result<Vec<(String, String)>> {
        table_entries(&self.params, "params")
    }
}

impl SweepAxes {
    /// 参考核模板列表
    pub fn reference_templates(&self) -> Vec<String> {
        if self.reference.is_empty() && !self.z.is_empty() {
            vec!["{elem}{A}".to_string()]
        } else {
            self.reference.clone()
        }
    }

    /// 额外循环轴，按声明顺序
    pub fn extra_axes(&self) -> Result<Vec<(String, Vec<String>)>> {
        let mut axes = Vec::new();
        for (key, value) in &self.axes {
            let values = match value {
                toml::Value::Array(items) => items
                    .iter()
                    .map(|item| scalar_to_string(item, &format!("sweep.axes.{}", key)))
                    .collect::<Result<Vec<_>>>()?,
                other => vec![scalar_to_string(other, &format!("sweep.axes.{}", key))?],
            };
            axes.push((key.clone(), values));
        }
        Ok(axes)
    }

    /// 逐点模板参数，按声明顺序
    pub fn templated_parameters(&self) -> Result<Vec<(String, String)>> {
        table_entries(&self.params, "sweep.params")
    }
}

fn table_entries(table: &toml::Table, section: &str) -> Result<Vec<(String, String)>> {
    table
        .iter()
        .map(|(key, value)| {
            scalar_to_string(value, &format!("{}.{}", section, key)).map(|v| (key.clone(), v))
        })
        .collect()
}

/// 标量转为参数字符串
fn scalar_to_string(value: &toml::Value, key: &str) -> Result<String> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(float_to_string(*f)),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        other => Err(SweepError::InvalidParameter {
            key: key.to_string(),
            value: other.to_string(),
            reason: "expected a string, number or boolean".to_string(),
        }),
    }
}

/// 浮点按 `Debug` 输出：整数值保留 `.0`，极小值用指数形式（`1.0`, `0.25`, `1e-5`）
fn float_to_string(f: f64) -> String {
    format!("{:?}", f)
}

/// `init` 生成的示例扫描文件
pub const SAMPLE_SWEEP: &str = r#"# imsrg-sweep sweep definition
#
# Every [params] entry is passed to imsrg++ as key=value, in file order.
# Values containing spaces are split into separate arguments when the job
# runs directly in the terminal, so "14 file2e2max=28" sets two options.

# executable = "/home/you/bin/imsrg++"   # default: $HOME/bin/imsrg++
threads = 12
mail = "you@example.org"
pbs_queue = "batchmpi"

[params]
smax = "500"
emax = "14"
e3max = "14"
omega_norm_max = "0.25"
ode_tolerance = "1e-5"
file2e1max = "14 file2e2max=28 file2lmax=10"
file3e1max = "14 file3e2max=28 file3e3max=14"
method = "magnus"
# lmax3 = "10"
# core_generator = "imaginary-time"

[sweep]
Z = [12, 13]
A = [25]
reference = ["{elem}{A}"]
emax = [2]
hw = [20]

[sweep.axes]
# BetaCM = ["0.0", "1.0", "3.0"]
# eta_criterion = ["1e-6", "1e-8"]

[sweep.params]
2bme = "/itch/exch/me2j/chi2b_srg0625_eMax14_lMax10_hwHO{hw:03}.me2j.gz"
3bme = "/itch/exch/me3j/new/chi2b3b400cD-02cE0098_hwconv036_srg0625ho40J_eMax14_EMax14_hwHO{hw:03}.me3j.gz"
LECs = "srg0625"
valence_space = "0hw-shell"
Operators = "M1p,M1n,Sigma_p,Sigma_n"
"#;
