//! 值滤镜
//!
//! 纯的值到值强制转换，供容器外围在装配标量配置时复用。注册表按规范化
//! 类型名查找，精确命中失败后沿请求类型的祖先链回退。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parking_lot::RwLock;

use factory_abstractions::Filter;
use factory_common::{FactoryError, FactoryResult, TypeIntrospector, TypeKey, Value};

/// 字符串化
#[derive(Debug)]
pub struct StringFilter;

impl Filter for StringFilter {
    fn filter(&self, value: Value) -> FactoryResult<Value> {
        Ok(Value::String(value.to_string()))
    }
}

/// 取整；无法转换的值得 0
#[derive(Debug)]
pub struct IntegerFilter;

impl Filter for IntegerFilter {
    fn filter(&self, value: Value) -> FactoryResult<Value> {
        let number = match &value {
            Value::Int(number) => *number,
            Value::Float(number) => *number as i64,
            Value::Bool(flag) => i64::from(*flag),
            Value::String(text) => text.trim().parse().unwrap_or(0),
            _ => 0,
        };
        Ok(Value::Int(number))
    }
}

/// 浮点化；无法转换的值得 0.0
#[derive(Debug)]
pub struct FloatFilter;

impl Filter for FloatFilter {
    fn filter(&self, value: Value) -> FactoryResult<Value> {
        let number = match &value {
            Value::Float(number) => *number,
            Value::Int(number) => *number as f64,
            Value::Bool(flag) => f64::from(u8::from(*flag)),
            Value::String(text) => text.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        };
        Ok(Value::Float(number))
    }
}

/// 布尔化；字符串 "false"（不分大小写）为假，其余按真值规则
#[derive(Debug)]
pub struct BooleanFilter;

impl Filter for BooleanFilter {
    fn filter(&self, value: Value) -> FactoryResult<Value> {
        let flag = match &value {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::Int(number) => *number != 0,
            Value::Float(number) => *number != 0.0,
            Value::String(text) => {
                !(text.is_empty() || text == "0" || text.eq_ignore_ascii_case("false"))
            }
            Value::List(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
            Value::Object(_) => true,
        };
        Ok(Value::Bool(flag))
    }
}

/// 列表化；空值得空列表，映射取其值序列，其余值包装成单元素列表
#[derive(Debug)]
pub struct ListFilter;

impl Filter for ListFilter {
    fn filter(&self, value: Value) -> FactoryResult<Value> {
        let items = match value {
            Value::Null => Vec::new(),
            Value::List(items) => items,
            Value::Map(entries) => entries.into_values().collect(),
            other => vec![other],
        };
        Ok(Value::List(items))
    }
}

/// 日期时间解析；接受 RFC 3339、`年-月-日 时:分:秒`、`年-月-日` 三种
/// 写法，统一输出 RFC 3339 风格字符串；空值原样放行
#[derive(Debug)]
pub struct DateTimeFilter;

impl Filter for DateTimeFilter {
    fn filter(&self, value: Value) -> FactoryResult<Value> {
        let text = match &value {
            Value::Null => return Ok(Value::Null),
            Value::String(text) if text.trim().is_empty() => return Ok(Value::Null),
            Value::String(text) => text.trim(),
            other => {
                return Err(FactoryError::callback(format!(
                    "Could not parse [{other}] as a datetime."
                )))
            }
        };

        let normalized = DateTime::parse_from_rfc3339(text)
            .map(|parsed| parsed.to_rfc3339())
            .or_else(|_| {
                NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                    .map(|parsed| parsed.format("%Y-%m-%dT%H:%M:%S").to_string())
            })
            .or_else(|_| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .map(|parsed| format!("{}T00:00:00", parsed.format("%Y-%m-%d")))
            })
            .map_err(|_| {
                FactoryError::callback(format!("Could not parse [{text}] as a datetime."))
            })?;
        Ok(Value::String(normalized))
    }
}

/// 滤镜注册表
pub struct FilterRegistry {
    introspector: Arc<dyn TypeIntrospector>,
    filters: RwLock<HashMap<String, Arc<dyn Filter>>>,
}

impl FilterRegistry {
    /// 创建空注册表
    pub fn new(introspector: Arc<dyn TypeIntrospector>) -> Self {
        Self {
            introspector,
            filters: RwLock::new(HashMap::new()),
        }
    }

    /// 创建并注册默认滤镜集
    pub fn with_defaults(introspector: Arc<dyn TypeIntrospector>) -> Self {
        let registry = Self::new(introspector);
        registry.register("list", ListFilter);
        registry.register("boolean", BooleanFilter);
        registry.register("datetime", DateTimeFilter);
        registry.register("float", FloatFilter);
        registry.register("integer", IntegerFilter);
        registry.register("string", StringFilter);
        registry
    }

    /// 为类型名注册滤镜，同名覆盖
    pub fn register(&self, type_ref: &str, filter: impl Filter + 'static) {
        self.filters
            .write()
            .insert(Self::normalize(type_ref), Arc::new(filter));
    }

    /// 查找滤镜：精确匹配 → 沿祖先链回退
    pub fn filter_for(&self, type_ref: &str) -> FactoryResult<Arc<dyn Filter>> {
        let filters = self.filters.read();
        if let Some(found) = filters.get(&Self::normalize(type_ref)) {
            return Ok(found.clone());
        }
        for ancestor in self.introspector.ancestors(&TypeKey::new(type_ref)) {
            if let Some(found) = filters.get(&Self::normalize(&ancestor.name)) {
                return Ok(found.clone());
            }
        }
        Err(FactoryError::FilterNotFound {
            type_ref: type_ref.to_string(),
        })
    }

    /// 类型名规范化：缩写展开（int → integer、bool → boolean），其余与
    /// 类型键一致
    fn normalize(type_ref: &str) -> String {
        let key = TypeKey::new(type_ref);
        match key.as_str() {
            "int" => "integer".to_string(),
            "bool" => "boolean".to_string(),
            _ => key.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factory_common::{TypeDescriptor, TypeModel};

    #[test]
    fn normalization_expands_abbreviations() {
        let model = Arc::new(TypeModel::new());
        let registry = FilterRegistry::with_defaults(model);
        let filter = registry.filter_for(".Int").unwrap();
        assert_eq!(filter.filter(Value::from("42")).unwrap(), Value::Int(42));
    }

    #[test]
    fn lookup_falls_back_along_the_ancestor_chain() {
        let model = Arc::new(TypeModel::new());
        model.define(TypeDescriptor::class("Base"));
        model.define(TypeDescriptor::class("Sub").with_parent("Base"));

        let registry = FilterRegistry::new(model);
        registry.register("Base", StringFilter);
        assert!(registry.filter_for("Sub").is_ok());
        assert!(registry.filter_for("Unrelated").is_err());
    }

    #[test]
    fn boolean_filter_follows_string_false_convention() {
        let filter = BooleanFilter;
        assert_eq!(filter.filter(Value::from("False")).unwrap(), Value::Bool(false));
        assert_eq!(filter.filter(Value::from("yes")).unwrap(), Value::Bool(true));
        assert_eq!(filter.filter(Value::from(0_i64)).unwrap(), Value::Bool(false));
    }

    #[test]
    fn datetime_filter_normalizes_supported_shapes() {
        let filter = DateTimeFilter;
        assert_eq!(
            filter.filter(Value::from("2024-05-01")).unwrap(),
            Value::from("2024-05-01T00:00:00")
        );
        assert_eq!(
            filter.filter(Value::from("2024-05-01 08:30:00")).unwrap(),
            Value::from("2024-05-01T08:30:00")
        );
        assert!(filter.filter(Value::from("not a date")).is_err());
        assert_eq!(filter.filter(Value::Null).unwrap(), Value::Null);
    }
}
