//! # 扫描展开
//!
//! 将扫描文件的嵌套循环展开为逐点参数集。每个扫描点从基础参数集复制一份
//! 新记录，再按循环层级覆盖对应键，点与点之间不共享可变状态。
//!
//! 循环嵌套顺序（Z, A, reference, emax, hw, 额外轴）与键的写入顺序
//! （reference, A, emax, hw, 额外轴）不同；基础参数中没有的键按后者追加。
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs`, `commands/plan.rs` 使用
//! - 使用 `sweep/config.rs`, `sweep/template.rs`, `sweep/elements.rs`
//! - 使用 `models/parameters.rs`

use super::config::SweepFile;
use super::elements;
use super::template::{self, Variables};
use crate::error::{Result, SweepError};
use crate::models::ParameterSet;

/// 单层循环
#[derive(Debug, Clone)]
enum Axis {
    /// 质子数：只设置占位符变量 `Z` 和 `elem`
    ProtonNumber(Vec<u32>),
    /// 参数键及其取值（取值可含占位符）
    Parameter { key: String, values: Vec<String> },
}

/// 固定轴的键写入顺序
const FIXED_KEY_ORDER: [&str; 4] = ["reference", "A", "emax", "hw"];

/// 已解析的扫描计划
#[derive(Debug, Clone)]
pub struct SweepPlan {
    base: ParameterSet,
    axes: Vec<Axis>,
    /// 逐点键的写入顺序
    key_order: Vec<String>,
    overrides: Vec<(String, String)>,
}

impl SweepPlan {
    /// 从扫描文件构建
    pub fn from_file(file: &SweepFile) -> Result<Self> {
        let base: ParameterSet = file.base_parameters()?.into_iter().collect();
        let sweep = &file.sweep;

        let mut axes = Vec::new();
        if !sweep.z.is_empty() {
            axes.push(Axis::ProtonNumber(sweep.z.clone()));
        }
        push_axis(&mut axes, "A", numbers(&sweep.mass_number));
        push_axis(&mut axes, "reference", sweep.reference_templates());
        push_axis(&mut axes, "emax", numbers(&sweep.emax));
        push_axis(&mut axes, "hw", numbers(&sweep.hw));

        let mut key_order: Vec<String> = FIXED_KEY_ORDER
            .iter()
            .filter(|key| axes.iter().any(|axis| axis.key() == Some(**key)))
            .map(|key| key.to_string())
            .collect();

        // 额外轴即使为空也保留，空轴意味着没有扫描点
        for (key, values) in sweep.extra_axes()? {
            key_order.push(key.clone());
            axes.push(Axis::Parameter { key, values });
        }

        Ok(Self {
            base,
            axes,
            key_order,
            overrides: sweep.templated_parameters()?,
        })
    }

    /// 扫描点总数
    pub fn len(&self) -> usize {
        self.axes
            .iter()
            .map(|axis| match axis {
                Axis::ProtonNumber(zs) => zs.len(),
                Axis::Parameter { values, .. } => values.len(),
            })
            .product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 展开所有扫描点，外层循环在前
    pub fn expand(&self) -> Result<Vec<ParameterSet>> {
        let mut points = Vec::with_capacity(self.len());
        let vars = variables_from(&self.base);

        // 预先占位，使新键按写入顺序排列；每个扫描点都会覆盖这些占位值
        let mut seeded = self.base.clone();
        for key in &self.key_order {
            if seeded.get(key).is_none() {
                seeded.set(key.clone(), String::new());
            }
        }

        self.walk(0, seeded, vars, &mut points)?;
        Ok(points)
    }

    fn walk(
        &self,
        depth: usize,
        params: ParameterSet,
        vars: Variables,
        out: &mut Vec<ParameterSet>,
    ) -> Result<()> {
        let Some(axis) = self.axes.get(depth) else {
            out.push(self.finish(params, vars)?);
            return Ok(());
        };

        match axis {
            Axis::ProtonNumber(zs) => {
                for &z in zs {
                    let symbol = elements::symbol(z).ok_or(SweepError::UnknownElement(z))?;
                    let mut vars = vars.clone();
                    vars.insert("Z", z.to_string());
                    vars.insert("elem", symbol);
                    self.walk(depth + 1, params.clone(), vars, out)?;
                }
            }
            Axis::Parameter { key, values } => {
                for value in values {
                    let value = template::render(value, &vars)?;
                    let mut params = params.clone();
                    let mut vars = vars.clone();
                    params.set(key.clone(), value.clone());
                    vars.insert(key.clone(), value);
                    self.walk(depth + 1, params, vars, out)?;
                }
            }
        }
        Ok(())
    }

    /// 写入逐点模板参数
    fn finish(&self, mut params: ParameterSet, mut vars: Variables) -> Result<ParameterSet> {
        for (key, raw) in &self.overrides {
            let value = template::render(raw, &vars)?;
            params.set(key.clone(), value.clone());
            vars.insert(key.clone(), value);
        }
        Ok(params)
    }
}

impl Axis {
    fn key(&self) -> Option<&str> {
        match self {
            Axis::ProtonNumber(_) => None,
            Axis::Parameter { key, .. } => Some(key),
        }
    }
}

fn push_axis(axes: &mut Vec<Axis>, key: &str, values: Vec<String>) {
    if !values.is_empty() {
        axes.push(Axis::Parameter {
            key: key.to_string(),
            values,
        });
    }
}

fn numbers(values: &[u32]) -> Vec<String> {
    values.iter().map(u32::to_string).collect()
}

fn variables_from(params: &ParameterSet) -> Variables {
    let mut vars = Variables::new();
    for (key, value) in params.iter() {
        vars.insert(key, value);
    }
    vars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::NamingFields;
    use crate::sweep::config::SAMPLE_SWEEP;

    fn plan(content: &str) -> SweepPlan {
        let file = SweepFile::parse(content, "inline").unwrap();
        SweepPlan::from_file(&file).unwrap()
    }

    #[test]
    fn test_sample_sweep_expands_to_mg_and_al() {
        let plan = plan(SAMPLE_SWEEP);
        assert_eq!(plan.len(), 2);

        let points = plan.expand().unwrap();
        let names: Vec<String> = points
            .iter()
            .map(|p| NamingFields::from_parameters(p).unwrap().job_name())
            .collect();
        assert_eq!(
            names,
            vec![
                "0hw-shell_srg0625_magnus_Mg25_e2_E14_s500_hw20_A25",
                "0hw-shell_srg0625_magnus_Al25_e2_E14_s500_hw20_A25",
            ]
        );
        assert_eq!(
            points[0].get("2bme"),
            Some("/itch/exch/me2j/chi2b_srg0625_eMax14_lMax10_hwHO020.me2j.gz")
        );
    }

    #[test]
    fn test_swept_key_keeps_base_position() {
        let points = plan(
            r#"
[params]
smax = "500"
emax = "14"
[sweep]
A = [8]
emax = [4]
"#,
        )
        .expand()
        .unwrap();

        let rendered = points[0].render_command("imsrg++");
        assert_eq!(rendered, "imsrg++ smax=500 emax=4 A=8");
    }

    #[test]
    fn test_sample_keys_follow_write_order() {
        let points = plan(SAMPLE_SWEEP).expand().unwrap();
        let keys: Vec<&str> = points[0].iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "smax",
                "emax",
                "e3max",
                "omega_norm_max",
                "ode_tolerance",
                "file2e1max",
                "file3e1max",
                "method",
                "reference",
                "A",
                "hw",
                "2bme",
                "3bme",
                "LECs",
                "valence_space",
                "Operators",
            ]
        );

        let rendered = points[0].render_command("imsrg++");
        assert!(rendered.contains(" method=magnus reference=Mg25 A=25 hw=20 2bme="));
    }

    #[test]
    fn test_new_keys_append_in_write_order_after_extra_axes() {
        let points = plan(
            r#"
[sweep]
A = [8]
reference = ["He{A}"]
emax = [4]
hw = [16]
[sweep.axes]
BetaCM = ["1.0"]
"#,
        )
        .expand()
        .unwrap();
        assert_eq!(
            points[0].render_command("imsrg++"),
            "imsrg++ reference=He8 A=8 emax=4 hw=16 BetaCM=1.0"
        );
    }

    #[test]
    fn test_outer_loops_vary_slowest() {
        let points = plan(
            r#"
[sweep]
A = [8, 10]
emax = [4, 6]
hw = [16, 20]
"#,
        )
        .expand()
        .unwrap();
        assert_eq!(points.len(), 8);

        let triples: Vec<(&str, &str, &str)> = points
            .iter()
            .map(|p| {
                (
                    p.get("A").unwrap(),
                    p.get("emax").unwrap(),
                    p.get("hw").unwrap(),
                )
            })
            .collect();
        assert_eq!(triples[0], ("8", "4", "16"));
        assert_eq!(triples[1], ("8", "4", "20"));
        assert_eq!(triples[2], ("8", "6", "16"));
        assert_eq!(triples[7], ("10", "6", "20"));
    }

    #[test]
    fn test_extra_axes_and_templated_params() {
        let points = plan(
            r#"
[sweep]
A = [8]
reference = ["He{A}", "Be8"]
[sweep.axes]
BetaCM = ["0.0", "3.0"]
[sweep.params]
intfile_tag = "{reference}_b{BetaCM}"
"#,
        )
        .expand()
        .unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].get("reference"), Some("He8"));
        assert_eq!(points[0].get("intfile_tag"), Some("He8_b0.0"));
        assert_eq!(points[3].get("intfile_tag"), Some("Be8_b3.0"));
    }

    #[test]
    fn test_float_beta_cm_axis_names_jobs_with_one_decimal() {
        let content = SAMPLE_SWEEP.replace(
            "# BetaCM = [\"0.0\", \"1.0\", \"3.0\"]",
            "BetaCM = [1.0]",
        );
        let points = plan(&content).expand().unwrap();
        let name = NamingFields::from_parameters(&points[0]).unwrap().job_name();
        assert!(name.ends_with("_A25_1.0"), "{}", name);
        assert_eq!(points[0].get("BetaCM"), Some("1.0"));
    }

    #[test]
    fn test_points_do_not_leak_between_iterations() {
        let points = plan(
            r#"
[sweep]
A = [8, 9]
[sweep.params]
tag = "A{A}"
"#,
        )
        .expand()
        .unwrap();
        assert_eq!(points[0].get("tag"), Some("A8"));
        assert_eq!(points[1].get("tag"), Some("A9"));
        assert_eq!(points[0].len(), points[1].len());
    }

    #[test]
    fn test_elem_without_z_is_an_error() {
        let result = plan("[sweep]\nA = [8]\nreference = [\"{elem}{A}\"]\n").expand();
        assert!(matches!(
            result,
            Err(SweepError::UnknownPlaceholder { .. })
        ));
    }

    #[test]
    fn test_out_of_table_z_is_an_error() {
        let result = plan("[sweep]\nZ = [120]\nA = [300]\n").expand();
        assert!(matches!(result, Err(SweepError::UnknownElement(120))));
    }

    #[test]
    fn test_empty_extra_axis_yields_no_points() {
        let plan = plan("[sweep]\nA = [8]\n[sweep.axes]\nBetaCM = []\n");
        assert!(plan.is_empty());
        assert!(plan.expand().unwrap().is_empty());
    }

    #[test]
    fn test_no_axes_yields_base_point() {
        let plan = plan("[params]\nA = \"4\"\n");
        assert_eq!(plan.len(), 1);
        let points = plan.expand().unwrap();
        assert_eq!(points[0].get("A"), Some("4"));
    }
}
