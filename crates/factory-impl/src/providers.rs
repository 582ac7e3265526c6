//! 内置构造策略
//!
//! 四种 provider：Minimal（仅构造注入）、Default（构造 + 约定方法 + 两趟
//! 属性注入）、Singleton（固定实例）、Callback（用户回调）。

use std::sync::Arc;

use factory_abstractions::{
    AnnotationFilter, Container, FieldFilter, ParameterFilter, Provider, UnresolvedPolicy,
};
use factory_common::{Arguments, FactoryResult, TypeKey, Value};

use crate::injector::Injector;

/// 约定注入方法的默认名称
pub const DEFAULT_INJECTION_METHOD: &str = "inject";

/// 最小构造策略：只做构造注入
pub struct MinimalProvider {
    injector: Arc<Injector>,
    parameter_filter: ParameterFilter,
}

impl MinimalProvider {
    /// 创建最小构造策略，默认所有参数都可注入
    pub fn new(injector: Arc<Injector>) -> Self {
        Self {
            injector,
            parameter_filter: Arc::new(|_| true),
        }
    }

    /// 设置参数过滤器
    pub fn with_parameter_filter(mut self, filter: ParameterFilter) -> Self {
        self.parameter_filter = filter;
        self
    }
}

impl Provider for MinimalProvider {
    fn provide(
        &self,
        class: &TypeKey,
        args: &Arguments,
        container: &dyn Container,
    ) -> FactoryResult<Value> {
        self.injector
            .inject_constructor(class, args, self.parameter_filter.as_ref(), container)
    }
}

/// 默认构造策略
///
/// 构造注入之后依次执行：约定方法注入（方法存在时）、字段注入、类级注解
/// 注入。默认过滤器全部以描述符上的注入标记为准。
pub struct DefaultProvider {
    injector: Arc<Injector>,
    parameter_filter: ParameterFilter,
    field_filter: FieldFilter,
    annotation_filter: AnnotationFilter,
    injection_method: String,
    unresolved_policy: UnresolvedPolicy,
}

impl DefaultProvider {
    /// 创建默认构造策略
    ///
    /// 默认参数过滤器：带声明类型或带注入标记的参数可注入。
    pub fn new(injector: Arc<Injector>) -> Self {
        Self {
            injector,
            parameter_filter: Arc::new(|param| param.inject || param.declared_type.is_some()),
            field_filter: Arc::new(|field| field.inject),
            annotation_filter: Arc::new(|annotation| annotation.inject),
            injection_method: DEFAULT_INJECTION_METHOD.to_string(),
            unresolved_policy: UnresolvedPolicy::Fail,
        }
    }

    /// 设置参数过滤器
    pub fn with_parameter_filter(mut self, filter: ParameterFilter) -> Self {
        self.parameter_filter = filter;
        self
    }

    /// 设置字段过滤器
    pub fn with_field_filter(mut self, filter: FieldFilter) -> Self {
        self.field_filter = filter;
        self
    }

    /// 设置类级注解过滤器
    pub fn with_annotation_filter(mut self, filter: AnnotationFilter) -> Self {
        self.annotation_filter = filter;
        self
    }

    /// 设置约定注入方法名，空串禁用方法注入
    pub fn with_injection_method(mut self, method: impl Into<String>) -> Self {
        self.injection_method = method.into();
        self
    }

    /// 设置属性类型解析失败时的策略
    pub fn with_unresolved_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved_policy = policy;
        self
    }
}

impl Provider for DefaultProvider {
    fn provide(
        &self,
        class: &TypeKey,
        args: &Arguments,
        container: &dyn Container,
    ) -> FactoryResult<Value> {
        let value = self.injector.inject_constructor(
            class,
            args,
            self.parameter_filter.as_ref(),
            container,
        )?;

        if let Value::Object(instance) = &value {
            if !self.injection_method.is_empty()
                && self
                    .injector
                    .has_method(instance.class(), &self.injection_method)
            {
                self.injector
                    .inject_method(instance, &self.injection_method, &Arguments::new(), container)?;
            }
            self.injector.inject_fields(
                instance,
                self.field_filter.as_ref(),
                self.unresolved_policy,
                container,
            )?;
            self.injector.inject_annotations(
                instance,
                self.annotation_filter.as_ref(),
                self.unresolved_policy,
                container,
            )?;
        }
        Ok(value)
    }
}

/// 单例构造策略：忽略类型与实参，总是返回捕获的实例
pub struct SingletonProvider {
    instance: Value,
}

impl SingletonProvider {
    /// 创建单例构造策略
    pub fn new(instance: Value) -> Self {
        Self { instance }
    }
}

impl Provider for SingletonProvider {
    fn provide(
        &self,
        _class: &TypeKey,
        _args: &Arguments,
        _container: &dyn Container,
    ) -> FactoryResult<Value> {
        Ok(self.instance.clone())
    }

    fn singleton_instance(&self) -> Option<Value> {
        Some(self.instance.clone())
    }
}

/// 回调构造策略：构造完全委托给用户函数
pub struct CallbackProvider {
    callback: Arc<dyn Fn(&TypeKey, &Arguments, &dyn Container) -> FactoryResult<Value> + Send + Sync>,
}

impl CallbackProvider {
    /// 创建回调构造策略
    pub fn new(
        callback: impl Fn(&TypeKey, &Arguments, &dyn Container) -> FactoryResult<Value>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            callback: Arc::new(callback),
        }
    }
}

impl Provider for CallbackProvider {
    fn provide(
        &self,
        class: &TypeKey,
        args: &Arguments,
        container: &dyn Container,
    ) -> FactoryResult<Value> {
        (self.callback)(class, args, container)
    }
}
