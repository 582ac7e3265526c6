//! 符号类型引用解析
//!
//! 把源代码里书写的类型引用（绝对、命名空间相对、导入别名）解析为规范化
//! 类型键。解析依赖两个环境能力：类型内省（存在性判断）与声明上下文的
//! 源文本（导入表）。

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use factory_common::{
    qualify, ResolutionError, SourceAccessor, TypeDescriptor, TypeIntrospector, TypeKey, SEPARATOR,
};

use crate::imports::ImportTable;

/// 类型解析器
///
/// 导入表按声明上下文惰性解析并缓存；缓存归解析器实例所有，进程生命周期内
/// 不失效（声明上下文视为不可变）。
pub struct TypeResolver {
    introspector: Arc<dyn TypeIntrospector>,
    sources: Arc<dyn SourceAccessor>,
    import_tables: DashMap<TypeKey, Arc<ImportTable>>,
}

impl TypeResolver {
    /// 创建解析器
    pub fn new(introspector: Arc<dyn TypeIntrospector>, sources: Arc<dyn SourceAccessor>) -> Self {
        Self {
            introspector,
            sources,
            import_tables: DashMap::new(),
        }
    }

    /// 解析符号类型引用，依次尝试，首个命中生效：
    ///
    /// 1. 引用本身就是已知类型；
    /// 2. 前缀上下文命名空间后是已知类型（同空间兄弟类型）；
    /// 3. 引用命中上下文导入表中的别名——别名指向的名称**不**做存在性
    ///    检查，由调用方决定如何对待解析得到却不可用的名称。
    ///
    /// 三步都失败时返回 `Ok(None)`，由调用方转成各自的领域错误。
    pub fn resolve(
        &self,
        type_ref: &str,
        context: &TypeKey,
    ) -> Result<Option<TypeKey>, ResolutionError> {
        let direct = TypeKey::new(type_ref);
        if self.introspector.exists(&direct) {
            return Ok(Some(direct));
        }

        let Some(context_type) = self.introspector.lookup(context) else {
            return Ok(None);
        };
        let trimmed = type_ref.trim().trim_start_matches(SEPARATOR);

        if !context_type.namespace().is_empty() {
            let sibling = TypeKey::new(&qualify(context_type.namespace(), trimmed));
            if self.introspector.exists(&sibling) {
                return Ok(Some(sibling));
            }
        }

        let table = self.import_table(context, &context_type)?;
        if let Some(qualified) = table.resolve_alias(trimmed) {
            debug!(alias = trimmed, target = qualified, "导入别名命中");
            return Ok(Some(TypeKey::new(qualified)));
        }

        Ok(None)
    }

    /// 取（或解析并缓存）声明上下文的导入表
    fn import_table(
        &self,
        context: &TypeKey,
        context_type: &TypeDescriptor,
    ) -> Result<Arc<ImportTable>, ResolutionError> {
        if let Some(cached) = self.import_tables.get(context) {
            return Ok(cached.clone());
        }
        let table = match self.sources.source_of(context) {
            Some(source) => {
                ImportTable::parse(&source, context_type.namespace(), &context_type.name)?
            }
            None => ImportTable::empty(),
        };
        let table = Arc::new(table);
        self.import_tables.insert(context.clone(), table.clone());
        Ok(table)
    }
}
