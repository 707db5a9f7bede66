//! # 占位符模板
//!
//! 替换扫描文件中 `{name}` / `{name:0N}` 形式的占位符。
//!
//! ## 依赖关系
//! - 被 `sweep/expansion.rs` 使用
//! - 使用 `regex` crate

use crate::error::{Result, SweepError};

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// `{name:0N}` 允许的最大宽度
pub const MAX_PAD_WIDTH: usize = 32;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)(?::0(\d+))?\}").expect("valid placeholder regex")
    })
}

/// 单个扫描点上可用的占位符变量
#[derive(Debug, Clone, Default)]
pub struct Variables {
    values: BTreeMap<String, String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// 渲染模板
///
/// `{hw:03}` 将值左侧补零至 3 位；未定义的占位符返回错误。
pub fn render(template: &str, vars: &Variables) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in placeholder_pattern().captures_iter(template) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let name = &caps[1];

        let value = vars
            .get(name)
            .ok_or_else(|| SweepError::UnknownPlaceholder {
                name: name.to_string(),
                template: template.to_string(),
            })?;

        out.push_str(&template[last..whole.start]);
        match caps.get(2) {
            Some(w) => {
                let width = pad_width(w.as_str(), name, template)?;
                out.push_str(&format!("{:0>width$}", value, width = width));
            }
            None => out.push_str(value),
        }
        last = whole.end;
    }

    out.push_str(&template[last..]);
    Ok(out)
}

fn pad_width(digits: &str, name: &str, template: &str) -> Result<usize> {
    digits
        .parse::<usize>()
        .ok()
        .filter(|width| *width <= MAX_PAD_WIDTH)
        .ok_or_else(|| SweepError::InvalidParameter {
            key: name.to_string(),
            value: template.to_string(),
            reason: format!("padding width must be at most {}", MAX_PAD_WIDTH),
        })
}
