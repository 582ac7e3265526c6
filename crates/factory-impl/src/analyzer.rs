//! 方法参数分析
//!
//! 为一个可调用目标（构造器或具名方法）的参数表逐个填值。填充优先级是
//! 严格的：按名实参 → 按位置实参 → 声明默认值 → 自动注入 → 失败；
//! 默认值永远先于自动注入，即使参数同时带有类型提示。

use factory_abstractions::Container;
use factory_common::{
    Arguments, FactoryError, FactoryResult, InjectionError, ParameterDescriptor, ParameterValues,
    TypeDescriptor, TypeKey, Value,
};

use crate::resolver::TypeResolver;

/// 方法分析器
pub struct MethodAnalyzer<'a> {
    owner: &'a TypeDescriptor,
    method_name: &'a str,
    params: &'a [ParameterDescriptor],
    resolver: &'a TypeResolver,
}

impl<'a> MethodAnalyzer<'a> {
    /// 创建针对某个方法参数表的分析器
    pub fn new(
        owner: &'a TypeDescriptor,
        method_name: &'a str,
        params: &'a [ParameterDescriptor],
        resolver: &'a TypeResolver,
    ) -> Self {
        Self {
            owner,
            method_name,
            params,
            resolver,
        }
    }

    /// 按声明顺序填充全部参数
    ///
    /// 任何一个参数失败都会带上 `Cannot fill parameter [名] of [类::方法]`
    /// 的上下文后整体失败。
    pub fn fill_parameters(
        &self,
        args: &Arguments,
        filter: &(dyn Fn(&ParameterDescriptor) -> bool + Send + Sync),
        container: &dyn Container,
    ) -> FactoryResult<ParameterValues> {
        let mut filled = ParameterValues::new();
        for param in self.params {
            let value = self
                .fill_parameter(param, args, filter, container)
                .map_err(|error| {
                    error.with_context(format!(
                        "Cannot fill parameter [{}] of [{}::{}]",
                        param.name, self.owner.name, self.method_name
                    ))
                })?;
            filled.push(param.name.clone(), value);
        }
        Ok(filled)
    }

    fn fill_parameter(
        &self,
        param: &ParameterDescriptor,
        args: &Arguments,
        filter: &(dyn Fn(&ParameterDescriptor) -> bool + Send + Sync),
        container: &dyn Container,
    ) -> FactoryResult<Value> {
        if let Some(given) = args.value_for(param) {
            return Ok(given.clone());
        }
        if let Some(default) = &param.default {
            return Ok(default.clone());
        }
        if !filter(param) {
            return Err(InjectionError::ArgumentNotInjectable.into());
        }
        match self.type_hint(param)? {
            Some(hint) => container.get_instance(hint.as_str(), Arguments::new()),
            None => Err(InjectionError::ArgumentMissingTypeHint.into()),
        }
    }

    /// 参数的类型提示
    ///
    /// 声明类型视为绝对引用直接使用；注解类型按声明上下文经解析器解析，
    /// 解析不到时按原文使用，留给后续构造环节报"找不到类型"。
    pub fn type_hint(&self, param: &ParameterDescriptor) -> FactoryResult<Option<TypeKey>> {
        if let Some(declared) = &param.declared_type {
            return Ok(Some(TypeKey::new(declared)));
        }
        let Some(annotated) = &param.annotated_type else {
            return Ok(None);
        };
        let resolved = self
            .resolver
            .resolve(annotated, &self.owner.key())
            .map_err(FactoryError::from)?;
        Ok(Some(resolved.unwrap_or_else(|| TypeKey::new(annotated))))
    }
}
