//! # Factory Impl
//!
//! 类型解析、注入引擎与 provider 注册表的具体实现。
//!
//! ## 核心组件
//!
//! - [`TypeResolver`] - 符号类型引用解析（绝对 / 相对 / 导入别名）
//! - [`MethodAnalyzer`] - 参数表按严格优先级填值
//! - [`Injector`] - 构造 / 方法 / 字段 / 类级注解四种注入形态
//! - [`Factory`] - 容器与层级化 provider 查找
//! - [`AliasFactory`] - 别名感知的容器包装
//! - [`FilterRegistry`] - 值滤镜注册表
//!
//! ## 使用示例
//!
//! ```
//! use std::sync::Arc;
//!
//! use factory_abstractions::Container;
//! use factory_common::{ConstructorDescriptor, ParameterDescriptor, TypeDescriptor, TypeModel};
//! use factory_impl::Factory;
//!
//! let model = Arc::new(TypeModel::new());
//! model.define(TypeDescriptor::class("app.Logger"));
//! model.define(
//!     TypeDescriptor::class("app.Service").with_constructor(
//!         ConstructorDescriptor::new()
//!             .with_param(ParameterDescriptor::new("logger").with_declared_type("app.Logger")),
//!     ),
//! );
//!
//! let factory = Factory::new(model);
//! let service = factory.get_instance("app.Service", Default::default()).unwrap();
//! let logger = service.as_object().unwrap().get("logger").unwrap();
//! assert!(logger.as_object().is_some());
//! ```

pub mod alias;
pub mod analyzer;
pub mod container;
pub mod filters;
pub mod imports;
pub mod injector;
pub mod providers;
pub mod resolver;

pub use alias::*;
pub use analyzer::*;
pub use container::*;
pub use filters::*;
pub use imports::*;
pub use injector::*;
pub use providers::*;
pub use resolver::*;
