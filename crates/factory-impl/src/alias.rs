//! 别名工厂
//!
//! 在容器之上维护"别名 → 规范名"的映射，让调用方用短名或替换名请求实例；
//! 也可以把一个基础类型的名字别名到自己的扩展实现上。

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use factory_abstractions::{Container, Provider};
use factory_common::{
    Arguments, FactoryResult, SourceAccessor, TypeIntrospector, TypeKey, Value,
};

use crate::container::Factory;

/// 别名工厂
pub struct AliasFactory {
    factory: Factory,
    aliases: RwLock<HashMap<TypeKey, TypeKey>>,
}

impl AliasFactory {
    /// 创建别名工厂
    pub fn new<M>(model: Arc<M>) -> Self
    where
        M: TypeIntrospector + SourceAccessor + 'static,
    {
        Self::from_factory(Factory::new(model))
    }

    /// 包装一个既有容器
    pub fn from_factory(factory: Factory) -> Self {
        Self {
            factory,
            aliases: RwLock::new(HashMap::new()),
        }
    }

    /// 内层容器
    pub fn inner(&self) -> &Factory {
        &self.factory
    }

    /// 为类型名注册别名；`alias` 为 `None` 时不注册
    pub fn register_alias(&self, class: &str, alias: Option<&str>) {
        if let Some(alias) = alias {
            let alias_key = TypeKey::new(alias);
            let class_key = TypeKey::new(class);
            info!(alias = %alias_key, target = %class_key, "注册别名");
            self.aliases.write().insert(alias_key, class_key);
        }
    }

    /// 注册单例，同时为其键注册别名
    pub fn set_singleton_with_alias(
        &self,
        instance: Value,
        type_ref: Option<&str>,
        alias: Option<&str>,
    ) -> FactoryResult<TypeKey> {
        let key = self.factory.set_singleton(instance, type_ref)?;
        if let Some(alias) = alias {
            self.aliases.write().insert(TypeKey::new(alias), key.clone());
        }
        Ok(key)
    }

    /// 注册 provider，同时注册别名
    pub fn set_provider_with_alias(
        &self,
        class: &str,
        provider: Arc<dyn Provider>,
        alias: Option<&str>,
    ) {
        self.register_alias(class, alias);
        self.factory.set_provider(class, provider);
    }

    /// 展开别名；没有别名时原样规范化
    fn unalias(&self, type_ref: &str) -> TypeKey {
        let key = TypeKey::new(type_ref);
        self.aliases.read().get(&key).cloned().unwrap_or(key)
    }
}

impl Container for AliasFactory {
    fn get_instance(&self, type_ref: &str, args: Arguments) -> FactoryResult<Value> {
        let target = self.unalias(type_ref);
        self.factory.get_instance(target.as_str(), args)
    }

    fn get_singleton(&self, type_ref: &str) -> FactoryResult<Value> {
        let target = self.unalias(type_ref);
        self.factory.get_singleton(target.as_str())
    }

    fn set_provider(&self, type_ref: &str, provider: Arc<dyn Provider>) {
        self.factory.set_provider(type_ref, provider);
    }

    fn set_singleton(&self, instance: Value, type_ref: Option<&str>) -> FactoryResult<TypeKey> {
        self.factory.set_singleton(instance, type_ref)
    }
}
