//! 类型键与名称规范化
//!
//! 注册表与内省查询使用统一的规范化键：宿主运行时认为相同的两个类型名，
//! 规范化后必须得到同一个键。

use std::fmt;

/// 命名空间分隔符
pub const SEPARATOR: char = '.';

/// 通用基类型的规范化名称，provider 查找的兜底祖先
pub const UNIVERSAL_BASE: &str = "object";

/// 规范化类型键
///
/// 由符号类型名派生：去除首尾空白、剥掉前导分隔符、大小写折叠。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(String);

impl TypeKey {
    /// 从符号类型名构造规范化键
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim().trim_start_matches(SEPARATOR);
        Self(trimmed.to_lowercase())
    }

    /// 键的字符串形式
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 通用基类型键
    pub fn universal_base() -> Self {
        Self(UNIVERSAL_BASE.to_string())
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// 将相对名称限定到命名空间下
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}{SEPARATOR}{name}")
    }
}

/// 取限定名的末段（短名）
pub fn short_name(qualified: &str) -> &str {
    qualified.rsplit(SEPARATOR).next().unwrap_or(qualified)
}

/// 取限定名的命名空间部分，无命名空间时为空串
pub fn namespace_of(qualified: &str) -> &str {
    match qualified.rfind(SEPARATOR) {
        Some(index) => &qualified[..index],
        None => "",
    }
}
