//! 错误类型定义
//!
//! 错误消息文本是对外可断言的观测面（两种缺参失败必须可区分），
//! 不要随意改动措辞。

use thiserror::Error;

/// 类型解析错误
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// 符号类型名无法映射到已知类型
    #[error("Could not find [{type_ref}].")]
    TypeNotFound { type_ref: String },

    /// 声明上下文的源文本解析失败
    #[error("Error while parsing [{context}]: {message}")]
    SourceParse { context: String, message: String },
}

/// 实例化错误
#[derive(Error, Debug)]
pub enum InstantiationError {
    /// 目标是抽象类
    #[error("Cannot instantiate abstract class [{name}].")]
    AbstractClass { name: String },

    /// 目标是接口
    #[error("Cannot instantiate interface [{name}].")]
    Interface { name: String },
}

/// 注入错误
#[derive(Error, Debug)]
pub enum InjectionError {
    /// 参数缺失且未标记为可注入
    #[error("Argument not given and not marked as injectable.")]
    ArgumentNotInjectable,

    /// 参数缺失且找不到类型提示
    #[error("Argument not given and no type hint found.")]
    ArgumentMissingTypeHint,

    /// 依赖的类型引用解析不到已知类型
    #[error("Could not find [{type_ref}].")]
    DependencyNotFound { type_ref: String },

    /// 请求注入的方法不存在
    #[error("Method [{class}::{method}] does not exist.")]
    MethodNotFound { class: String, method: String },
}

/// 工厂错误
///
/// 各层失败经 [`FactoryError::with_context`] 逐层包装，`Display` 自顶向下
/// 展开为一条可读的因果链。
#[derive(Error, Debug)]
pub enum FactoryError {
    /// 类型解析错误
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// 实例化错误
    #[error(transparent)]
    Instantiation(#[from] InstantiationError),

    /// 注入错误
    #[error(transparent)]
    Injection(#[from] InjectionError),

    /// 带作用域描述的包装层
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<FactoryError>,
    },

    /// 请求的单例不存在
    #[error("No singleton registered for [{type_ref}].")]
    NoSingleton { type_ref: String },

    /// 检测到循环依赖
    #[error("Circular dependency detected: {chain}")]
    CircularDependency { chain: String },

    /// 超过最大解析深度
    #[error("Resolution depth limit of {limit} exceeded while resolving [{type_ref}].")]
    DepthExceeded { type_ref: String, limit: usize },

    /// 用户回调报告的失败
    #[error("{message}")]
    Callback { message: String },

    /// 未指明类型的非对象单例
    #[error("Cannot register a non-object singleton without an explicit type.")]
    UntypedSingleton,

    /// 找不到对应类型的值滤镜
    #[error("Could not find filter for [{type_ref}].")]
    FilterNotFound { type_ref: String },
}

impl FactoryError {
    /// 包一层作用域上下文
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// 创建用户回调错误
    pub fn callback(message: impl Into<String>) -> Self {
        Self::Callback {
            message: message.into(),
        }
    }
}

/// 结果类型别名
pub type FactoryResult<T> = Result<T, FactoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_layers_render_as_causal_chain() {
        let error = FactoryError::from(InjectionError::DependencyNotFound {
            type_ref: "Missing".to_string(),
        })
        .with_context("Error while injecting dependency [baz] of [Inner]")
        .with_context("Error while injecting constructor of [Outer]");

        assert_eq!(
            error.to_string(),
            "Error while injecting constructor of [Outer]: \
             Error while injecting dependency [baz] of [Inner]: \
             Could not find [Missing]."
        );
    }

    #[test]
    fn missing_argument_causes_are_distinguishable() {
        let not_injectable = InjectionError::ArgumentNotInjectable.to_string();
        let no_hint = InjectionError::ArgumentMissingTypeHint.to_string();
        assert_ne!(not_injectable, no_hint);
        assert!(not_injectable.contains("not marked as injectable"));
        assert!(no_hint.contains("no type hint found"));
    }
}
