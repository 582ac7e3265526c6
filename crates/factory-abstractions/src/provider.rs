//! Provider 抽象接口

use factory_common::{Arguments, FactoryResult, TypeKey, Value};

use crate::container::Container;

/// 构造策略能力：由类型名与显式实参得到实例
///
/// 第三方扩展只需实现 `provide`；注册表按"精确键 → 祖先 → 接口 → 通用兜底"
/// 的顺序选中一个 provider 并把构造完全委托给它。
pub trait Provider: Send + Sync {
    /// 构造 `class` 的实例
    fn provide(
        &self,
        class: &TypeKey,
        args: &Arguments,
        container: &dyn Container,
    ) -> FactoryResult<Value>;

    /// 单例 provider 暴露其固定实例，其余 provider 返回 `None`
    fn singleton_instance(&self) -> Option<Value> {
        None
    }
}
