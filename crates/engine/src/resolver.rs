//! token → 规则
//!
//! 只有当每个修饰符都已知，且主体匹配到已注册的工具类、
//! 并能从主题（或任意值方括号）取得值时，token 才会被解析；
//! 否则不产生任何规则。

use std::collections::HashSet;

use crosswind_core::{apply_important, merge_declarations, Declaration};
use crosswind_parse::{parse_class, ParsedClass, ParsedValue};
use tracing::trace;

use crate::rule::{Condition, ResolvedRule, SortKey};
use crate::selector::SelectorBuilder;
use crate::theme::{MediaOrder, ResolvedTheme, DEFAULT_KEY};
use crate::utility::value::{infer_kind, negate, split_type_hint};
use crate::utility::{
    Category, DynamicUtility, Origin, RegisteredUtility, RuleBody, UtilityDefinition,
    UtilityRegistry,
};
use crate::variant::{resolve_variant, DarkMode, Variant, VariantAction};

/// 来自配置的解析选项
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    pub dark_mode: DarkMode,
    /// 把每条声明标记为 `!important`
    pub important: bool,
}

/// 单个 token 生成的全部规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedClass {
    pub token: String,
    pub rules: Vec<ResolvedRule>,
}

/// 应用变体前匹配到的工具类
struct Matched {
    body: RuleBody,
    category: Category,
    origin: Origin,
}

/// 工具类解析器
#[derive(Debug, Clone, Copy)]
pub struct UtilityResolver<'a> {
    theme: &'a ResolvedTheme,
    registry: &'a UtilityRegistry,
    options: ResolveOptions,
}

impl<'a> UtilityResolver<'a> {
    pub fn new(theme: &'a ResolvedTheme, registry: &'a UtilityRegistry) -> Self {
        Self {
            theme,
            registry,
            options: ResolveOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// 解析单个 token，不是工具类时返回 `None`
    pub fn resolve(&self, token: &str) -> Option<ResolvedClass> {
        let parsed = match parse_class(token) {
            Ok(parsed) => parsed,
            Err(err) => {
                trace!(token, error = %err, "token is not a class");
                return None;
            }
        };

        let Some(variants) = self.resolve_variants(&parsed) else {
            trace!(token, "unknown or conflicting modifier");
            return None;
        };

        let Some(matched) = self.match_utility(&parsed) else {
            trace!(token, "no matching utility");
            return None;
        };

        Some(ResolvedClass {
            token: token.to_string(),
            rules: self.build_rules(token, &parsed, &variants, matched),
        })
    }

    /// 按书写顺序返回修饰符；拒绝未知、重复或多于
    /// 一个的断点修饰符
    fn resolve_variants(&self, parsed: &ParsedClass) -> Option<Vec<Variant>> {
        let mut seen = HashSet::new();
        let mut responsive = false;
        let mut variants = Vec::with_capacity(parsed.modifiers.len());

        for modifier in &parsed.modifiers {
            if !seen.insert(modifier.as_str()) {
                return None;
            }
            let variant = resolve_variant(modifier, self.theme, self.options.dark_mode)?;
            if variant.responsive {
                if responsive {
                    return None;
                }
                responsive = true;
            }
            variants.push(variant);
        }
        Some(variants)
    }

    fn match_utility(&self, parsed: &ParsedClass) -> Option<Matched> {
        if let Some((property, value)) = parsed.arbitrary_property() {
            if parsed.negative {
                return None;
            }
            return Some(Matched {
                body: RuleBody::single(property, &value),
                category: Category::Other,
                origin: Origin::Builtin,
            });
        }

        // 最长前缀优先：整个主体先按静态类精确匹配，再依次尝试更短的动态前缀
        for split in parsed.splits() {
            match &split.value {
                None => {
                    if let Some(registered) = self.registry.get_static(split.name) {
                        if parsed.negative {
                            return None;
                        }
                        if let UtilityDefinition::Static(body) = &registered.definition {
                            return Some(matched(body.clone(), registered));
                        }
                    }
                    if let Some(registered) = self.registry.get_dynamic(split.name) {
                        let default = ParsedValue::Standard(DEFAULT_KEY.to_string());
                        if let Some(body) = self.apply_dynamic(registered, &default, parsed.negative) {
                            return Some(matched(body, registered));
                        }
                    }
                }
                Some(value) => {
                    if let Some(registered) = self.registry.get_dynamic(split.name) {
                        if let Some(body) = self.apply_dynamic(registered, value, parsed.negative) {
                            return Some(matched(body, registered));
                        }
                    }
                }
            }
        }
        None
    }

    /// 按顺序尝试每个重载
    fn apply_dynamic(
        &self,
        registered: &RegisteredUtility,
        value: &ParsedValue,
        negative: bool,
    ) -> Option<RuleBody> {
        let UtilityDefinition::Dynamic(candidates) = &registered.definition else {
            return None;
        };

        let accepts_sign = |candidate: &DynamicUtility| !negative || candidate.supports_negative;
        let signed = |css: &str| if negative { negate(css) } else { css.to_string() };

        match value {
            ParsedValue::Standard(key) => candidates
                .iter()
                .filter(|candidate| accepts_sign(*candidate))
                .find_map(|candidate| {
                    candidate
                        .namespaces
                        .iter()
                        .find_map(|namespace| self.theme.lookup(namespace, key))
                        .map(|css| candidate.apply(&signed(css)))
                }),
            ParsedValue::Arbitrary(arbitrary) => {
                let (hint, content) = split_type_hint(&arbitrary.content);
                if content.trim().is_empty() {
                    return None;
                }
                let kind = hint.unwrap_or_else(|| infer_kind(content));
                candidates
                    .iter()
                    .filter(|candidate| accepts_sign(*candidate))
                    .find(|candidate| candidate.kind.accepts(kind))
                    .map(|candidate| candidate.apply(&signed(content)))
            }
        }
    }

    fn build_rules(
        &self,
        token: &str,
        parsed: &ParsedClass,
        variants: &[Variant],
        matched: Matched,
    ) -> Vec<ResolvedRule> {
        let Matched {
            body,
            category,
            origin,
        } = matched;

        // 从最内层（紧挨主体）开始应用
        let mut builder = SelectorBuilder::new();
        let mut conditions: Vec<Condition> = Vec::new();
        for variant in variants.iter().rev() {
            builder.apply(variant);
            if let VariantAction::AtRule(condition) = &variant.action {
                conditions.insert(0, condition.clone());
            }
        }
        let selector = builder.build(token, body.selector_suffix.as_deref());
        let variant_depth = variants.iter().filter(|v| !v.responsive).count();
        let important = parsed.important || self.options.important;

        let finish = |declarations: Vec<Declaration>| {
            if important {
                apply_important(declarations)
            } else {
                declarations
            }
        };
        let rule = |declarations: Vec<Declaration>, conditions: Vec<Condition>| {
            let media = conditions
                .iter()
                .map(|c| c.order)
                .max()
                .unwrap_or(MediaOrder::UNCONDITIONAL);
            ResolvedRule {
                token: token.to_string(),
                selector: selector.clone(),
                declarations: finish(declarations),
                conditions,
                category,
                origin,
                sort_key: SortKey {
                    media,
                    variant_depth,
                    origin,
                    category,
                },
            }
        };

        let outer = conditions
            .iter()
            .map(|c| c.order)
            .max()
            .unwrap_or(MediaOrder::UNCONDITIONAL);
        let mut base = body.declarations;
        let mut nested = Vec::new();
        // 断点块已按升序排列；不大于外层断点的块在外层生效时总会生效，按顺序并入基础规则
        for block in body.screens {
            let same_screen = conditions.iter().any(|c| c.at_rule == block.condition.at_rule);
            if same_screen || block.condition.order.applies_within(&outer) {
                base.extend(block.declarations);
                continue;
            }
            let mut block_conditions = conditions.clone();
            block_conditions.push(block.condition);
            nested.push((block.declarations, block_conditions));
        }

        let mut rules = Vec::with_capacity(nested.len() + 1);
        rules.push(rule(merge_declarations(base), conditions.clone()));
        for (declarations, block_conditions) in nested {
            rules.push(rule(declarations, block_conditions));
        }
        rules
    }
}

fn matched(body: RuleBody, registered: &RegisteredUtility) -> Matched {
    Matched {
        body,
        category: registered.category,
        origin: registered.origin,
    }
}

/// 使用默认选项解析 `token`
pub fn resolve(
    token: &str,
    theme: &ResolvedTheme,
    registry: &UtilityRegistry,
) -> Option<ResolvedClass> {
    UtilityResolver::new(theme, registry).resolve(token)
}
