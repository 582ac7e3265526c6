//! 内存型类型注册表
//!
//! [`TypeModel`] 同时实现内省与源文本访问两个能力，应用在引导期通过
//! [`TypeModel::define`] 声明类型定义。注册表归实例所有，不依赖全局状态。

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::introspection::{SourceAccessor, TypeIntrospector};
use crate::key::{TypeKey, UNIVERSAL_BASE};
use crate::metadata::TypeDescriptor;

/// 通用基类型描述符，所有模型共享
static UNIVERSAL_BASE_DESCRIPTOR: Lazy<Arc<TypeDescriptor>> =
    Lazy::new(|| Arc::new(TypeDescriptor::class(UNIVERSAL_BASE)));

/// 内存型类型注册表
#[derive(Default)]
pub struct TypeModel {
    types: RwLock<HashMap<TypeKey, Arc<TypeDescriptor>>>,
}

impl TypeModel {
    /// 创建空模型；通用基类型始终可见
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明一个类型定义，同键后声明覆盖先声明
    pub fn define(&self, descriptor: TypeDescriptor) -> TypeKey {
        let key = descriptor.key();
        debug!(type_name = %descriptor.name, "声明类型定义");
        self.types.write().insert(key.clone(), Arc::new(descriptor));
        key
    }

    /// 已声明的类型数量
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// 是否没有任何声明
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

impl TypeIntrospector for TypeModel {
    fn lookup(&self, key: &TypeKey) -> Option<Arc<TypeDescriptor>> {
        if let Some(found) = self.types.read().get(key) {
            return Some(found.clone());
        }
        (key.as_str() == UNIVERSAL_BASE).then(|| UNIVERSAL_BASE_DESCRIPTOR.clone())
    }
}

impl SourceAccessor for TypeModel {
    fn source_of(&self, key: &TypeKey) -> Option<String> {
        self.types
            .read()
            .get(key)
            .and_then(|descriptor| descriptor.source.clone())
    }
}
