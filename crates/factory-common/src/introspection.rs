//! 类型内省与源文本访问能力
//!
//! 解析器与注入器只依赖这两个能力接口；宿主元数据的来源（内存模型、
//! 代码生成、外部清单）均可替换。

use std::sync::Arc;

use crate::key::TypeKey;
use crate::metadata::{FieldDescriptor, MethodDescriptor, TypeDescriptor};

/// 类型内省能力
pub trait TypeIntrospector: Send + Sync {
    /// 按规范化键查找类型描述符
    fn lookup(&self, key: &TypeKey) -> Option<Arc<TypeDescriptor>>;

    /// 类型是否已知
    fn exists(&self, key: &TypeKey) -> bool {
        self.lookup(key).is_some()
    }

    /// 祖先链，最派生优先，不含自身；未知父类处链条截断
    fn ancestors(&self, key: &TypeKey) -> Vec<Arc<TypeDescriptor>> {
        let mut chain = Vec::new();
        let mut cursor = self.lookup(key).and_then(|own| own.parent.clone());
        while let Some(parent) = cursor {
            match self.lookup(&TypeKey::new(&parent)) {
                Some(descriptor) => {
                    cursor = descriptor.parent.clone();
                    chain.push(descriptor);
                }
                None => break,
            }
        }
        chain
    }

    /// 自身 + 祖先链，最派生优先
    fn lineage(&self, key: &TypeKey) -> Vec<Arc<TypeDescriptor>> {
        let mut chain = Vec::new();
        if let Some(own) = self.lookup(key) {
            chain.push(own);
        }
        chain.extend(self.ancestors(key));
        chain
    }

    /// 可达接口集合：自身声明序 → 祖先声明序 → 接口的父接口，首次出现为准
    fn interfaces_of(&self, key: &TypeKey) -> Vec<TypeKey> {
        let mut queue: Vec<String> = Vec::new();
        for descriptor in self.lineage(key) {
            queue.extend(descriptor.interfaces.iter().cloned());
        }

        let mut reachable: Vec<TypeKey> = Vec::new();
        let mut index = 0;
        while index < queue.len() {
            let interface_key = TypeKey::new(&queue[index]);
            index += 1;
            if reachable.contains(&interface_key) {
                continue;
            }
            reachable.push(interface_key.clone());
            if let Some(interface) = self.lookup(&interface_key) {
                // 接口可以通过 parent 或 interfaces 扩展其它接口
                if let Some(parent) = &interface.parent {
                    queue.push(parent.clone());
                }
                queue.extend(interface.interfaces.iter().cloned());
            }
        }
        reachable
    }

    /// 含继承的方法查找，最派生优先；返回声明类与方法
    fn find_method(
        &self,
        key: &TypeKey,
        name: &str,
    ) -> Option<(Arc<TypeDescriptor>, MethodDescriptor)> {
        for descriptor in self.lineage(key) {
            if let Some(method) = descriptor.method(name) {
                let method = method.clone();
                return Some((descriptor, method));
            }
        }
        None
    }

    /// 含继承的字段枚举，最派生优先，被遮蔽的重名字段跳过；返回声明类与字段
    fn fields_of(&self, key: &TypeKey) -> Vec<(Arc<TypeDescriptor>, FieldDescriptor)> {
        let mut fields: Vec<(Arc<TypeDescriptor>, FieldDescriptor)> = Vec::new();
        for descriptor in self.lineage(key) {
            for field in &descriptor.fields {
                if fields.iter().any(|(_, known)| known.name == field.name) {
                    continue;
                }
                fields.push((descriptor.clone(), field.clone()));
            }
        }
        fields
    }
}

/// 声明上下文的源文本访问能力
pub trait SourceAccessor: Send + Sync {
    /// 返回声明该类型的源文本（若有）
    fn source_of(&self, key: &TypeKey) -> Option<String>;
}
