use crate::types::Declaration;
use indexmap::IndexMap;

/// 合并 CSS 声明
///
/// 功能：
/// - 处理 CSS 属性冲突（后者覆盖前者）
/// - 保持稳定输出顺序（使用 IndexMap，属性位置以首次出现为准）
pub fn merge_declarations(decls: Vec<Declaration>) -> Vec<Declaration> {
    let mut map: IndexMap<String, String> = IndexMap::with_capacity(decls.len());

    for decl in decls {
        map.insert(decl.property, decl.value);
    }

    map.into_iter()
        .map(|(property, value)| Declaration { property, value })
        .collect()
}

/// 为每条声明追加 `!important`（已带有的不重复追加）
pub fn apply_important(declarations: Vec<Declaration>) -> Vec<Declaration> {
    declarations
        .into_iter()
        .map(|mut decl| {
            if !decl.value.ends_with("!important") {
                decl.value = format!("{} !important", decl.value);
            }
            decl
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merge_override() {
        let decls = vec![
            Declaration::new("padding-left", "1rem"),
            Declaration::new("padding-left", "2rem"),
        ];
        let result = merge_declarations(decls);
        assert_eq!(result, vec![Declaration::new("padding-left", "2rem")]);
    }

    #[test]
    fn test_merge_keeps_first_position() {
        let decls = vec![
            Declaration::new("max-width", "640px"),
            Declaration::new("padding-right", "1rem"),
            Declaration::new("padding-left", "1rem"),
            Declaration::new("padding-right", "2rem"),
        ];
        let result = merge_declarations(decls);
        assert_eq!(
            result,
            vec![
                Declaration::new("max-width", "640px"),
                Declaration::new("padding-right", "2rem"),
                Declaration::new("padding-left", "1rem"),
            ]
        );
    }

    #[test]
    fn test_apply_important_is_idempotent() {
        let once = apply_important(vec![Declaration::new("width", "100%")]);
        let twice = apply_important(once.clone());
        assert_eq!(once[0].value, "100% !important");
        assert_eq!(once, twice);
    }
}
