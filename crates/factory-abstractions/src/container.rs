//! 容器抽象接口

use std::sync::Arc;

use factory_common::{Arguments, FactoryResult, TypeKey, Value};

use crate::provider::Provider;

/// 依赖注入容器能力
///
/// 对象安全：provider 在 `provide` 中拿到 `&dyn Container` 即可递归构造
/// 自己的依赖。
pub trait Container: Send + Sync {
    /// 构造（或取得）指定类型的实例
    fn get_instance(&self, type_ref: &str, args: Arguments) -> FactoryResult<Value>;

    /// 取得已注册的单例；未注册时报错
    fn get_singleton(&self, type_ref: &str) -> FactoryResult<Value>;

    /// 为类型注册 provider，同键重复注册后写覆盖先写
    fn set_provider(&self, type_ref: &str, provider: Arc<dyn Provider>);

    /// 注册单例
    ///
    /// `type_ref` 缺省时以实例自身的运行时类型为键；返回实际使用的键。
    fn set_singleton(&self, instance: Value, type_ref: Option<&str>) -> FactoryResult<TypeKey>;
}
