//! 注入引擎
//!
//! 四种注入形态：构造注入、具名方法注入、字段注入、类级注解注入。每一层
//! 失败都只追加一行作用域描述，最终错误消息是一条自顶向下的因果链而不是
//! 扁平的调用栈。

use std::sync::Arc;

use tracing::debug;

use factory_abstractions::{Container, UnresolvedPolicy};
use factory_common::{
    Arguments, ConstructorDescriptor, FactoryError, FactoryResult, FieldDescriptor, InjectionError,
    Instance, InstantiationError, ObjectRef, ParameterDescriptor, PropertyAnnotation,
    ResolutionError, TypeDescriptor, TypeIntrospector, TypeKey, TypeKind, Value,
};

use crate::analyzer::MethodAnalyzer;
use crate::resolver::TypeResolver;

/// 构造器在错误消息中的显示名
pub const CONSTRUCTOR_NAME: &str = "new";

/// 注入器
pub struct Injector {
    introspector: Arc<dyn TypeIntrospector>,
    resolver: Arc<TypeResolver>,
}

impl Injector {
    /// 创建注入器
    pub fn new(introspector: Arc<dyn TypeIntrospector>, resolver: Arc<TypeResolver>) -> Self {
        Self {
            introspector,
            resolver,
        }
    }

    /// 解析器
    pub fn resolver(&self) -> Arc<TypeResolver> {
        self.resolver.clone()
    }

    /// 类型是否有指定方法（含继承）
    pub fn has_method(&self, class: &TypeKey, method_name: &str) -> bool {
        self.introspector.find_method(class, method_name).is_some()
    }

    /// 构造注入
    ///
    /// 无构造器的类型直接得到裸实例，不做任何实参处理；抽象类与接口在
    /// 进入构造前即失败。
    pub fn inject_constructor(
        &self,
        class: &TypeKey,
        args: &Arguments,
        filter: &(dyn Fn(&ParameterDescriptor) -> bool + Send + Sync),
        container: &dyn Container,
    ) -> FactoryResult<Value> {
        let descriptor = self.introspector.lookup(class).ok_or_else(|| {
            FactoryError::from(ResolutionError::TypeNotFound {
                type_ref: class.to_string(),
            })
        })?;

        match descriptor.kind {
            TypeKind::AbstractClass => {
                return Err(InstantiationError::AbstractClass {
                    name: descriptor.name.clone(),
                }
                .into())
            }
            TypeKind::Interface => {
                return Err(InstantiationError::Interface {
                    name: descriptor.name.clone(),
                }
                .into())
            }
            TypeKind::Class => {}
        }

        let instance = self.bare_instance(class);
        debug!(%class, "构造实例");

        if let Some(constructor) = &descriptor.constructor {
            self.invoke_constructor(&descriptor, constructor, &instance, args, filter, container)
                .map_err(|error| {
                    error.with_context(format!(
                        "Error while injecting constructor of [{}]",
                        descriptor.name
                    ))
                })?;
        }
        Ok(Value::Object(instance))
    }

    /// 具名方法注入，返回方法结果
    ///
    /// 与构造参数不同，方法参数一律默认可注入。
    pub fn inject_method(
        &self,
        instance: &ObjectRef,
        method_name: &str,
        args: &Arguments,
        container: &dyn Container,
    ) -> FactoryResult<Value> {
        let Some((owner, method)) = self.introspector.find_method(instance.class(), method_name)
        else {
            return Err(InjectionError::MethodNotFound {
                class: instance.class().to_string(),
                method: method_name.to_string(),
            }
            .into());
        };

        debug!(class = %instance.class(), method = method_name, "方法注入");
        let analyzer = MethodAnalyzer::new(&owner, method_name, &method.params, &self.resolver);
        analyzer
            .fill_parameters(args, &|_| true, container)
            .and_then(|filled| (method.body)(instance, &filled))
            .map_err(|error| {
                error.with_context(format!("Cannot inject method [{}::{}]", owner.name, method_name))
            })
    }

    /// 字段注入
    ///
    /// 遍历具体类型及其祖先声明的带类型注解字段（最派生优先，被遮蔽的
    /// 重名字段跳过）；已持有非空值的字段不覆盖。类型引用按**字段声明类**
    /// 的上下文解析。
    pub fn inject_fields(
        &self,
        instance: &ObjectRef,
        filter: &(dyn Fn(&FieldDescriptor) -> bool + Send + Sync),
        policy: UnresolvedPolicy,
        container: &dyn Container,
    ) -> FactoryResult<()> {
        for (declaring, field) in self.introspector.fields_of(instance.class()) {
            let Some(annotated) = field.annotated_type.clone() else {
                continue;
            };
            if !filter(&field) || instance.has_value(&field.name) {
                continue;
            }
            self.inject_property(instance, &field.name, &annotated, &declaring, policy, container)?;
        }
        Ok(())
    }

    /// 类级注解注入
    ///
    /// 沿具体类型到祖先逐层（最派生优先）读取类级属性注解，同层内按声明
    /// 顺序赋值——该顺序可观测（先声明者的依赖先构造）。类型引用按声明
    /// 该注解的那一层类型自身的上下文解析。
    pub fn inject_annotations(
        &self,
        instance: &ObjectRef,
        filter: &(dyn Fn(&PropertyAnnotation) -> bool + Send + Sync),
        policy: UnresolvedPolicy,
        container: &dyn Container,
    ) -> FactoryResult<()> {
        for declaring in self.introspector.lineage(instance.class()) {
            for annotation in &declaring.annotations {
                if !filter(annotation) || instance.has_value(&annotation.name) {
                    continue;
                }
                self.inject_property(
                    instance,
                    &annotation.name,
                    &annotation.type_ref,
                    &declaring,
                    policy,
                    container,
                )?;
            }
        }
        Ok(())
    }

    fn invoke_constructor(
        &self,
        owner: &TypeDescriptor,
        constructor: &ConstructorDescriptor,
        instance: &ObjectRef,
        args: &Arguments,
        filter: &(dyn Fn(&ParameterDescriptor) -> bool + Send + Sync),
        container: &dyn Container,
    ) -> FactoryResult<()> {
        let analyzer =
            MethodAnalyzer::new(owner, CONSTRUCTOR_NAME, &constructor.params, &self.resolver);
        analyzer
            .fill_parameters(args, filter, container)
            .and_then(|filled| match &constructor.body {
                Some(body) => body(instance, &filled),
                None => {
                    // 缺省构造体：已填充参数按名存为同名属性
                    for (name, value) in filled.iter() {
                        instance.set(name, value.clone());
                    }
                    Ok(())
                }
            })
            .map_err(|error| {
                error.with_context(format!(
                    "Cannot inject method [{}::{}]",
                    owner.name, CONSTRUCTOR_NAME
                ))
            })
    }

    /// 创建裸实例，字段初始值沿祖先链写入
    fn bare_instance(&self, class: &TypeKey) -> ObjectRef {
        let instance = Instance::new(class.clone());
        for (_, field) in self.introspector.fields_of(class) {
            if let Some(initial) = field.initial {
                instance.set(&field.name, initial);
            }
        }
        instance
    }

    fn inject_property(
        &self,
        instance: &ObjectRef,
        name: &str,
        type_ref: &str,
        declaring: &TypeDescriptor,
        policy: UnresolvedPolicy,
        container: &dyn Container,
    ) -> FactoryResult<()> {
        let wrap = |error: FactoryError| {
            error.with_context(format!(
                "Error while injecting dependency [{}] of [{}]",
                name,
                declaring.short_name()
            ))
        };

        let resolved = self
            .resolver
            .resolve(type_ref, &declaring.key())
            .map_err(FactoryError::from)
            .map_err(wrap)?;
        let Some(class) = resolved else {
            return match policy {
                UnresolvedPolicy::Skip => Ok(()),
                UnresolvedPolicy::Fail => Err(wrap(
                    InjectionError::DependencyNotFound {
                        type_ref: type_ref.to_string(),
                    }
                    .into(),
                )),
            };
        };

        debug!(property = name, %class, "属性注入");
        let value = container
            .get_instance(class.as_str(), Arguments::new())
            .map_err(wrap)?;
        instance.set(name, value);
        Ok(())
    }
}
