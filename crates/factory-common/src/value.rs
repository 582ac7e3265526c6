//! 运行时值模型
//!
//! 引擎构造出的实例是动态属性包对象：注入器按名读写属性、按名调用方法，
//! 单例语义要求引用相等，因此对象一律以 `Arc` 共享。

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::key::TypeKey;

/// 对象引用，引用相等即实例相同
pub type ObjectRef = Arc<Instance>;

/// 运行时值
#[derive(Debug, Clone)]
pub enum Value {
    /// 空值
    Null,
    /// 布尔
    Bool(bool),
    /// 整数
    Int(i64),
    /// 浮点
    Float(f64),
    /// 字符串
    String(String),
    /// 列表
    List(Vec<Value>),
    /// 字符串键映射
    Map(BTreeMap<String, Value>),
    /// 对象
    Object(ObjectRef),
}

impl Value {
    /// 是否为空值
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// 取对象引用
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// 取字符串切片
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// 取整数
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(number) => Some(*number),
            _ => None,
        }
    }

    /// 取布尔
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// 从 JSON 值转换（元数据默认值可直接用 JSON 书写）
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(flag) => Self::Bool(flag),
            serde_json::Value::Number(number) => number
                .as_i64()
                .map_or_else(|| Self::Float(number.as_f64().unwrap_or(0.0)), Self::Int),
            serde_json::Value::String(text) => Self::String(text),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(name, item)| (name, Self::from_json(item)))
                    .collect(),
            ),
        }
    }

    /// 转回 JSON 值，对象不在 JSON 值域内，返回 `None`
    pub fn to_json(&self) -> Option<serde_json::Value> {
        match self {
            Self::Null => Some(serde_json::Value::Null),
            Self::Bool(flag) => Some(serde_json::Value::Bool(*flag)),
            Self::Int(number) => Some(serde_json::Value::from(*number)),
            Self::Float(number) => serde_json::Number::from_f64(*number).map(serde_json::Value::Number),
            Self::String(text) => Some(serde_json::Value::String(text.clone())),
            Self::List(items) => items
                .iter()
                .map(Self::to_json)
                .collect::<Option<Vec<_>>>()
                .map(serde_json::Value::Array),
            Self::Map(entries) => entries
                .iter()
                .map(|(name, item)| item.to_json().map(|json| (name.clone(), json)))
                .collect::<Option<serde_json::Map<_, _>>>()
                .map(serde_json::Value::Object),
            Self::Object(_) => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            // 对象按引用相等比较
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Int(number) => write!(f, "{number}"),
            Self::Float(number) => write!(f, "{number}"),
            Self::String(text) => f.write_str(text),
            Self::List(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Self::Map(entries) => {
                let rendered: Vec<String> = entries
                    .iter()
                    .map(|(name, item)| format!("{name}: {item}"))
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            Self::Object(object) => write!(f, "[object {}]", object.class()),
        }
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Self::Int(number)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Float(number)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::String(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::String(text)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Self::Object(object)
    }
}

/// 动态对象实例
///
/// 属性表由读写锁保护；读取返回克隆值，`Null` 与缺失在注入幂等性判断中
/// 同样视为"无值"。
pub struct Instance {
    class: TypeKey,
    properties: RwLock<BTreeMap<String, Value>>,
}

impl Instance {
    /// 创建指定运行时类型的空实例
    pub fn new(class: TypeKey) -> ObjectRef {
        Arc::new(Self {
            class,
            properties: RwLock::new(BTreeMap::new()),
        })
    }

    /// 实例的运行时类型键
    pub fn class(&self) -> &TypeKey {
        &self.class
    }

    /// 读属性
    pub fn get(&self, name: &str) -> Option<Value> {
        self.properties.read().get(name).cloned()
    }

    /// 写属性
    pub fn set(&self, name: &str, value: Value) {
        self.properties.write().insert(name.to_string(), value);
    }

    /// 属性存在且非空
    pub fn has_value(&self, name: &str) -> bool {
        matches!(self.properties.read().get(name), Some(value) if !value.is_null())
    }

    /// 属性名列表，按名称排序
    pub fn property_names(&self) -> Vec<String> {
        self.properties.read().keys().cloned().collect()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class)
            .field("properties", &*self.properties.read())
            .finish()
    }
}
