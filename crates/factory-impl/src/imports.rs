//! 声明源文本的 import 表解析
//!
//! 源文本是语句式的：`namespace a.b;` 开启命名空间作用域，`use a.b.C;` 与
//! `use a.b.C as D;` 声明导入，`//` 注释与块形式（`namespace a.b { ... }`）
//! 均可容忍。同一源单元可以包含多个命名空间作用域，解析只收集与声明上下文
//! 自身命名空间一致的那一个作用域内的导入；根命名空间的上下文读取首个
//! `namespace` 语句之前的导入。

use std::collections::HashMap;

use factory_common::{ResolutionError, TypeKey, SEPARATOR};

/// 别名 → 完全限定名 的导入表
///
/// 每个声明上下文解析一次后不再变化，经 `Arc` 共享。
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    aliases: HashMap<String, String>,
}

impl ImportTable {
    /// 空导入表
    pub fn empty() -> Self {
        Self::default()
    }

    /// 按别名查找完全限定名，匹配是精确的（区分大小写）
    pub fn resolve_alias(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// 导入条目数
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// 从源文本解析出 `namespace` 作用域内的导入表
    ///
    /// `namespace` 是声明上下文自身的命名空间，`context` 仅用于错误消息。
    pub fn parse(source: &str, namespace: &str, context: &str) -> Result<Self, ResolutionError> {
        let wanted = TypeKey::new(namespace);
        let mut current = TypeKey::new("");
        let mut aliases = HashMap::new();

        for (line_index, raw_line) in source.lines().enumerate() {
            let line = match raw_line.find("//") {
                Some(comment) => &raw_line[..comment],
                None => raw_line,
            };
            for statement in line.split(';') {
                let statement = statement.trim().trim_end_matches('{').trim();
                if statement.is_empty() {
                    continue;
                }
                if let Some(rest) = statement.strip_prefix("namespace") {
                    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                        current = TypeKey::new(rest.trim());
                        continue;
                    }
                }
                if let Some(rest) = statement.strip_prefix("use") {
                    if rest.starts_with(char::is_whitespace) && current == wanted {
                        let (alias, path) = Self::parse_use(rest.trim()).map_err(|message| {
                            ResolutionError::SourceParse {
                                context: context.to_string(),
                                message: format!("{message} at line {}", line_index + 1),
                            }
                        })?;
                        aliases.insert(alias, path);
                    }
                }
            }
        }

        Ok(Self { aliases })
    }

    /// 解析单条 `use` 语句主体，返回 (别名, 完全限定名)
    fn parse_use(body: &str) -> Result<(String, String), String> {
        let mut parts = body.split_whitespace();
        let path = parts
            .next()
            .ok_or_else(|| "use statement without a path".to_string())?
            .trim_start_matches(SEPARATOR)
            .to_string();

        let alias = match parts.next() {
            None => factory_common::short_name(&path).to_string(),
            Some("as") => parts
                .next()
                .ok_or_else(|| "use statement without an alias after `as`".to_string())?
                .to_string(),
            Some(extra) => return Err(format!("unexpected token [{extra}] in use statement")),
        };
        if parts.next().is_some() {
            return Err("trailing tokens in use statement".to_string());
        }
        if path.is_empty() {
            return Err("use statement with an empty path".to_string());
        }
        Ok((alias, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_only_the_matching_namespace_block() {
        let source = "\
namespace other.scope;
use other.scope.Red;

namespace some.name;
use some.name.space.AliasedDependency;
use other.place.Thing as Alias;

namespace third.scope;
use third.scope.Blue;
";
        let table = ImportTable::parse(source, "some.name", "some.name.Ctx").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.resolve_alias("AliasedDependency"),
            Some("some.name.space.AliasedDependency")
        );
        assert_eq!(table.resolve_alias("Alias"), Some("other.place.Thing"));
        assert_eq!(table.resolve_alias("Red"), None);
        assert_eq!(table.resolve_alias("Blue"), None);
    }

    #[test]
    fn root_namespace_reads_leading_imports() {
        let source = "\
use some.name.space.AliasedDependency;

namespace inner;
use inner.Hidden;
";
        let table = ImportTable::parse(source, "", "Ctx").unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.resolve_alias("AliasedDependency").is_some());
    }

    #[test]
    fn tolerates_comments_blocks_and_leading_separators() {
        let source = "\
namespace a.b { // 作用域开始
    use .x.y.Dep; // 前导分隔符
}
";
        let table = ImportTable::parse(source, "a.b", "a.b.Ctx").unwrap();
        assert_eq!(table.resolve_alias("Dep"), Some("x.y.Dep"));
    }

    #[test]
    fn alias_match_is_case_sensitive() {
        let table = ImportTable::parse("use x.y.Dep;", "", "Ctx").unwrap();
        assert!(table.resolve_alias("Dep").is_some());
        assert!(table.resolve_alias("dep").is_none());
    }

    #[test]
    fn malformed_use_statement_is_a_parse_error() {
        let error = ImportTable::parse("use x.y.Dep as;", "", "Broken.Ctx").unwrap_err();
        let message = error.to_string();
        assert!(message.contains("Error while parsing [Broken.Ctx]"));
        assert!(message.contains("line 1"));
    }
}
