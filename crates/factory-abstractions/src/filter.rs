//! 滤镜与注入策略回调

use std::sync::Arc;

use factory_common::{FactoryResult, FieldDescriptor, ParameterDescriptor, PropertyAnnotation, Value};

/// 值滤镜：纯的值到值变换
pub trait Filter: std::fmt::Debug + Send + Sync {
    /// 变换一个值
    fn filter(&self, value: Value) -> FactoryResult<Value>;
}

/// 参数注入过滤器：判定参数是否有自动注入资格
pub type ParameterFilter = Arc<dyn Fn(&ParameterDescriptor) -> bool + Send + Sync>;

/// 字段注入过滤器
pub type FieldFilter = Arc<dyn Fn(&FieldDescriptor) -> bool + Send + Sync>;

/// 类级注解注入过滤器
pub type AnnotationFilter = Arc<dyn Fn(&PropertyAnnotation) -> bool + Send + Sync>;

/// 属性类型解析失败时的处理策略，按调用逐次选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedPolicy {
    /// 解析失败即报错
    #[default]
    Fail,
    /// 静默跳过该属性
    Skip,
}
