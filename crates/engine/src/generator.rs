//! 对解析出的规则去重并排成输出顺序

use indexmap::IndexMap;

use crate::resolver::ResolvedClass;
use crate::rule::ResolvedRule;

/// 把解析结果展开为有序、去重的规则列表
///
/// 选择器与条件完全相同即视为重复，保留后出现的一条。
/// 输出顺序是全序，同样的输入集合总得到
/// 同样的序列。
pub fn generate<I>(resolved: I) -> Vec<ResolvedRule>
where
    I: IntoIterator<Item = ResolvedClass>,
{
    let mut unique: IndexMap<(String, Vec<String>), ResolvedRule> = IndexMap::new();
    for class in resolved {
        for rule in class.rules {
            unique.insert(rule.identity(), rule);
        }
    }

    let mut rules: Vec<ResolvedRule> = unique.into_values().collect();
    rules.sort_by(ResolvedRule::output_cmp);
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use crate::theme::{default_theme, ResolvedTheme};
    use crate::utility::{builtin_registry, UtilityRegistry};
    use pretty_assertions::assert_eq;

    fn fixture() -> (ResolvedTheme, UtilityRegistry) {
        let theme = ResolvedTheme::new(default_theme()).unwrap();
        let registry = builtin_registry(&theme);
        (theme, registry)
    }

    fn selectors(tokens: &[&str]) -> Vec<(String, usize)> {
        let (theme, registry) = fixture();
        let resolved: Vec<_> = tokens
            .iter()
            .filter_map(|t| resolve(t, &theme, &registry))
            .collect();
        generate(resolved)
            .into_iter()
            .map(|r| (r.selector, r.conditions.len()))
            .collect()
    }

    #[test]
    fn test_unwrapped_before_breakpoints_ascending() {
        let out = selectors(&["lg:p-4", "p-4", "sm:p-4", "md:p-4"]);
        assert_eq!(
            out,
            vec![
                (".p-4".to_string(), 0),
                (".sm\\:p-4".to_string(), 1),
                (".md\\:p-4".to_string(), 1),
                (".lg\\:p-4".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_category_precedence_within_screen() {
        let out = selectors(&["bg-red-500", "p-4", "flex", "w-4", "text-lg"]);
        let names: Vec<&str> = out.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, vec![".flex", ".p-4", ".w-4", ".text-lg", ".bg-red-500"]);
    }

    #[test]
    fn test_variants_after_plain_utilities() {
        let out = selectors(&["hover:flex", "block", "flex"]);
        let names: Vec<&str> = out.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, vec![".block", ".flex", ".hover\\:flex:hover"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let (theme, registry) = fixture();
        let first = resolve("p-4", &theme, &registry).unwrap();
        let second = first.clone();
        assert_eq!(generate(vec![first, second]).len(), 1);
    }

    #[test]
    fn test_order_independent_of_input_order() {
        let forward = selectors(&["container", "md:flex", "p-2", "hover:bg-blue-500"]);
        let backward = selectors(&["hover:bg-blue-500", "p-2", "md:flex", "container"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_container_breakpoint_rules_interleave_by_screen() {
        let (theme, registry) = fixture();
        let resolved: Vec<_> = ["md:p-4", "container", "sm:p-4"]
            .iter()
            .filter_map(|t| resolve(t, &theme, &registry))
            .collect();
        let out: Vec<(String, Option<String>)> = generate(resolved)
            .into_iter()
            .map(|r| (r.selector, r.conditions.last().map(|c| c.at_rule.clone())))
            .collect();

        let sm = Some("@media (min-width: 640px)".to_string());
        let md = Some("@media (min-width: 768px)".to_string());
        assert_eq!(out[0], (".container".to_string(), None));
        assert_eq!(out[1], (".container".to_string(), sm.clone()));
        assert_eq!(out[2], (".sm\\:p-4".to_string(), sm));
        assert_eq!(out[3], (".container".to_string(), md.clone()));
        assert_eq!(out[4], (".md\\:p-4".to_string(), md));
    }
}
