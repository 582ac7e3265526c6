//! 显式实参集合
//!
//! 调用方可以按参数名或按参数位置提供实参；同一参数两者皆有时按名优先。

use std::collections::HashMap;

use crate::metadata::ParameterDescriptor;
use crate::value::Value;

/// 显式实参集合
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    named: HashMap<String, Value>,
    positional: HashMap<usize, Value>,
}

impl Arguments {
    /// 空实参集
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加按名实参
    pub fn with_named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    /// 添加按位置实参
    pub fn with_positional(mut self, position: usize, value: impl Into<Value>) -> Self {
        self.positional.insert(position, value.into());
        self
    }

    /// 按实参名直接取值
    pub fn named(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    /// 按位置直接取值
    pub fn positional(&self, position: usize) -> Option<&Value> {
        self.positional.get(&position)
    }

    /// 是否为该参数提供了实参
    pub fn covers(&self, param: &ParameterDescriptor) -> bool {
        self.named.contains_key(&param.name) || self.positional.contains_key(&param.position)
    }

    /// 取该参数对应的实参，按名优先于按位置
    pub fn value_for(&self, param: &ParameterDescriptor) -> Option<&Value> {
        self.named
            .get(&param.name)
            .or_else(|| self.positional.get(&param.position))
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.positional.is_empty()
    }
}

impl From<Vec<Value>> for Arguments {
    /// 纯位置实参列表
    fn from(values: Vec<Value>) -> Self {
        let mut arguments = Self::new();
        for (position, value) in values.into_iter().enumerate() {
            arguments.positional.insert(position, value);
        }
        arguments
    }
}

/// 填充完成的参数值，保持声明顺序
#[derive(Debug, Clone, Default)]
pub struct ParameterValues {
    entries: Vec<(String, Value)>,
}

impl ParameterValues {
    /// 空参数值集
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个已填充的参数
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.entries.push((name.into(), value));
    }

    /// 按参数名取值
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, value)| value)
    }

    /// 按声明顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.entries.iter()
    }

    /// 参数个数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, position: usize) -> ParameterDescriptor {
        let mut descriptor = ParameterDescriptor::new(name);
        descriptor.position = position;
        descriptor
    }

    #[test]
    fn named_argument_wins_over_positional() {
        let arguments = Arguments::new()
            .with_named("arg", "by name")
            .with_positional(0, "by position");
        assert_eq!(
            arguments.value_for(&param("arg", 0)),
            Some(&Value::from("by name"))
        );
    }

    #[test]
    fn positional_list_covers_by_declaration_order() {
        let arguments = Arguments::from(vec![Value::from("first"), Value::from("second")]);
        assert_eq!(
            arguments.value_for(&param("whatever", 1)),
            Some(&Value::from("second"))
        );
        assert!(!arguments.covers(&param("whatever", 2)));
    }
}
