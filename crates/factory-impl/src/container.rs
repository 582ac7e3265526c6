//! 依赖注入容器
//!
//! provider 注册表按"精确键 → 祖先链 → 可达接口 → 通用兜底"的顺序查找；
//! 兜底条目在容器创建时写入，查找永远能得到一个 provider。非单例实例
//! 从不缓存，每次 `get_instance` 都重新进入对应 provider。

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use factory_abstractions::{Container, Provider};
use factory_common::{
    Arguments, FactoryError, FactoryResult, SourceAccessor, TypeIntrospector, TypeKey, Value,
};

use crate::injector::Injector;
use crate::providers::{DefaultProvider, SingletonProvider};
use crate::resolver::TypeResolver;

/// 容器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactoryConfig {
    /// 是否启用循环依赖检测
    pub detect_cycles: bool,
    /// 最大解析深度
    pub max_resolution_depth: usize,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            detect_cycles: true,
            max_resolution_depth: 100,
        }
    }
}

/// 依赖注入容器
pub struct Factory {
    providers: RwLock<HashMap<TypeKey, Arc<dyn Provider>>>,
    introspector: Arc<dyn TypeIntrospector>,
    resolver: Arc<TypeResolver>,
    injector: Arc<Injector>,
    config: FactoryConfig,
    // 解析是单线程协作式递归；该链只在解析入口/出口短暂加锁
    resolution_chain: RwLock<Vec<TypeKey>>,
}

impl Factory {
    /// 以默认配置创建容器
    pub fn new<M>(model: Arc<M>) -> Self
    where
        M: TypeIntrospector + SourceAccessor + 'static,
    {
        Self::with_config(model, FactoryConfig::default())
    }

    /// 以指定配置创建容器
    pub fn with_config<M>(model: Arc<M>, config: FactoryConfig) -> Self
    where
        M: TypeIntrospector + SourceAccessor + 'static,
    {
        let introspector: Arc<dyn TypeIntrospector> = model.clone();
        let sources: Arc<dyn SourceAccessor> = model;
        let resolver = Arc::new(TypeResolver::new(introspector.clone(), sources));
        let injector = Arc::new(Injector::new(introspector.clone(), resolver.clone()));

        let factory = Self {
            providers: RwLock::new(HashMap::new()),
            introspector,
            resolver,
            injector,
            config,
            resolution_chain: RwLock::new(Vec::new()),
        };
        // 通用兜底 provider 常驻
        factory.providers.write().insert(
            TypeKey::universal_base(),
            Arc::new(DefaultProvider::new(factory.injector.clone())),
        );
        factory
    }

    /// 注入器，构建自定义 provider 时复用
    pub fn injector(&self) -> Arc<Injector> {
        self.injector.clone()
    }

    /// 类型解析器
    pub fn resolver(&self) -> Arc<TypeResolver> {
        self.resolver.clone()
    }

    /// 容器配置
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// 按层级查找匹配的 provider
    ///
    /// 精确注册先于内省检查，因此 provider 可以接管类型模型不认识的名称。
    fn find_matching_provider(&self, key: &TypeKey) -> Arc<dyn Provider> {
        let providers = self.providers.read();

        if let Some(found) = providers.get(key) {
            return found.clone();
        }
        for ancestor in self.introspector.ancestors(key) {
            if let Some(found) = providers.get(&ancestor.key()) {
                return found.clone();
            }
        }
        for interface in self.introspector.interfaces_of(key) {
            if let Some(found) = providers.get(&interface) {
                return found.clone();
            }
        }
        providers
            .get(&TypeKey::universal_base())
            .cloned()
            .expect("universal base provider is seeded at construction")
    }

    /// 进入一次解析：循环与深度检查
    fn enter(&self, key: &TypeKey) -> FactoryResult<()> {
        let mut chain = self.resolution_chain.write();
        if self.config.detect_cycles && chain.contains(key) {
            let rendered = chain
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(FactoryError::CircularDependency {
                chain: format!("{rendered} -> {key}"),
            });
        }
        if chain.len() >= self.config.max_resolution_depth {
            return Err(FactoryError::DepthExceeded {
                type_ref: key.to_string(),
                limit: self.config.max_resolution_depth,
            });
        }
        chain.push(key.clone());
        Ok(())
    }

    fn leave(&self) {
        self.resolution_chain.write().pop();
    }
}

impl Container for Factory {
    fn get_instance(&self, type_ref: &str, args: Arguments) -> FactoryResult<Value> {
        let key = TypeKey::new(type_ref);
        debug!(%key, "解析实例");

        self.enter(&key)?;
        let provider = self.find_matching_provider(&key);
        let result = provider.provide(&key, &args, self);
        self.leave();
        result
    }

    fn get_singleton(&self, type_ref: &str) -> FactoryResult<Value> {
        let key = TypeKey::new(type_ref);
        self.providers
            .read()
            .get(&key)
            .and_then(|provider| provider.singleton_instance())
            .ok_or_else(|| FactoryError::NoSingleton {
                type_ref: key.to_string(),
            })
    }

    fn set_provider(&self, type_ref: &str, provider: Arc<dyn Provider>) {
        let key = TypeKey::new(type_ref);
        info!(%key, "注册 provider");
        self.providers.write().insert(key, provider);
    }

    fn set_singleton(&self, instance: Value, type_ref: Option<&str>) -> FactoryResult<TypeKey> {
        let key = match type_ref {
            Some(name) => TypeKey::new(name),
            None => match instance.as_object() {
                Some(object) => object.class().clone(),
                None => return Err(FactoryError::UntypedSingleton),
            },
        };
        info!(%key, "注册单例");
        self.providers
            .write()
            .insert(key.clone(), Arc::new(SingletonProvider::new(instance)));
        Ok(key)
    }
}
