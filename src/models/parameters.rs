//! # 参数集模型
//!
//! 传递给 imsrg++ 的有序 `key=value` 参数表。
//!
//! ## 依赖关系
//! - 被 `models/job.rs`, `sweep/expansion.rs` 使用
//! - 无外部模块依赖

/// 有序参数集
///
/// 键唯一。对已存在的键赋值时原位替换（保持位置），新键追加到末尾，
/// 迭代顺序即命令行参数的渲染顺序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<(String, String)>,
}

impl ParameterSet {
    /// 创建空参数集
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置参数
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// 读取参数
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按插入顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 渲染完整命令行：`<exe> k1=v1 k2=v2 ...`
    ///
    /// 不做任何转义或引号处理。
    pub fn render_command(&self, executable: &str) -> String {
        let mut cmd = executable.to_string();
        for (key, value) in self.iter() {
            cmd.push(' ');
            cmd.push_str(key);
            cmd.push('=');
            cmd.push_str(value);
        }
        cmd
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = ParameterSet::new();
        for (k, v) in iter {
            set.set(k, v);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_command_in_insertion_order() {
        let params: ParameterSet = [("A", "8"), ("hw", "12")].into_iter().collect();
        assert_eq!(params.render_command("/x/imsrg++"), "/x/imsrg++ A=8 hw=12");
    }

    #[test]
    fn test_set_existing_key_keeps_position() {
        let mut params: ParameterSet = [("smax", "500"), ("emax", "14"), ("e3max", "14")]
            .into_iter()
            .collect();
        params.set("emax", "2");
        params.set("hw", "20");

        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["smax", "emax", "e3max", "hw"]);
        assert_eq!(params.get("emax"), Some("2"));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_render_empty_set_is_just_executable() {
        let params = ParameterSet::new();
        assert!(params.is_empty());
        assert_eq!(params.render_command("imsrg++"), "imsrg++");
    }
}
