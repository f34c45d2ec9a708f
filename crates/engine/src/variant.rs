//! 修饰符名 → 变体（选择器改写或 at-rule 包装）
//!
//! 断点修饰符来自解析后主题的 screens，
//! 其余是固定词汇。

use phf::phf_map;
use serde::Deserialize;

use crate::rule::Condition;
use crate::theme::screens::MediaOrder;
use crate::theme::ResolvedTheme;

/// `dark:` 的表达方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DarkMode {
    /// `@media (prefers-color-scheme: dark)`
    #[default]
    Media,
    /// `.dark` 祖先类
    Class,
}

/// 变体对所包装规则的作用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantAction {
    /// 用 at-rule 包装规则
    AtRule(Condition),
    /// 追加在类选择器之后（`:hover`、`[data-open]`）
    Pseudo(String),
    /// 追加在其他所有选择器片段之后（`::before`）
    PseudoElement(String),
    /// 前置的上下文选择器，含组合符（`.group:hover `）
    Context(String),
}

/// 解析后的变体
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// 书写时的修饰符（`md`、`group-hover`）
    pub name: String,
    /// 同一个 token 中断点变体互斥
    pub responsive: bool,
    pub action: VariantAction,
}

impl Variant {
    fn new(name: &str, action: VariantAction) -> Self {
        Self {
            name: name.to_string(),
            responsive: false,
            action,
        }
    }

    fn responsive(name: &str, condition: Condition) -> Self {
        Self {
            name: name.to_string(),
            responsive: true,
            action: VariantAction::AtRule(condition),
        }
    }
}

/// 伪类缩写 → CSS 伪类（不含冒号）
static PSEUDO_CLASSES: phf::Map<&'static str, &'static str> = phf_map! {
    "hover" => "hover",
    "focus" => "focus",
    "focus-within" => "focus-within",
    "focus-visible" => "focus-visible",
    "active" => "active",
    "visited" => "visited",
    "target" => "target",
    "disabled" => "disabled",
    "enabled" => "enabled",
    "checked" => "checked",
    "indeterminate" => "indeterminate",
    "default" => "default",
    "required" => "required",
    "valid" => "valid",
    "invalid" => "invalid",
    "in-range" => "in-range",
    "out-of-range" => "out-of-range",
    "placeholder-shown" => "placeholder-shown",
    "autofill" => "autofill",
    "read-only" => "read-only",
    "empty" => "empty",
    "first" => "first-child",
    "last" => "last-child",
    "only" => "only-child",
    "odd" => "nth-child(odd)",
    "even" => "nth-child(even)",
    "first-of-type" => "first-of-type",
    "last-of-type" => "last-of-type",
    "only-of-type" => "only-of-type",
    "open" => "is([open], :popover-open)",
};

/// 伪元素缩写 → CSS 伪元素（不含冒号）
static PSEUDO_ELEMENTS: phf::Map<&'static str, &'static str> = phf_map! {
    "before" => "before",
    "after" => "after",
    "placeholder" => "placeholder",
    "file" => "file-selector-button",
    "marker" => "marker",
    "selection" => "selection",
    "first-line" => "first-line",
    "first-letter" => "first-letter",
    "backdrop" => "backdrop",
};

/// 媒体特性变体
static MEDIA_FEATURES: phf::Map<&'static str, &'static str> = phf_map! {
    "motion-safe" => "@media (prefers-reduced-motion: no-preference)",
    "motion-reduce" => "@media (prefers-reduced-motion: reduce)",
    "contrast-more" => "@media (prefers-contrast: more)",
    "contrast-less" => "@media (prefers-contrast: less)",
    "portrait" => "@media (orientation: portrait)",
    "landscape" => "@media (orientation: landscape)",
    "print" => "@media print",
    "forced-colors" => "@media (forced-colors: active)",
};

/// 解析单个修饰符，`None` 表示未知修饰符
pub fn resolve_variant(name: &str, theme: &ResolvedTheme, dark_mode: DarkMode) -> Option<Variant> {
    if let Some(variant) = responsive_variant(name, theme) {
        return Some(variant);
    }

    if let Some(pseudo) = PSEUDO_CLASSES.get(name) {
        return Some(Variant::new(
            name,
            VariantAction::Pseudo(format!(":{}", pseudo)),
        ));
    }

    if let Some(element) = PSEUDO_ELEMENTS.get(name) {
        return Some(Variant::new(
            name,
            VariantAction::PseudoElement(format!("::{}", element)),
        ));
    }

    if let Some(at_rule) = MEDIA_FEATURES.get(name) {
        return Some(Variant::new(
            name,
            VariantAction::AtRule(Condition::unordered(*at_rule)),
        ));
    }

    match name {
        "dark" => {
            let action = match dark_mode {
                DarkMode::Media => VariantAction::AtRule(Condition::unordered(
                    "@media (prefers-color-scheme: dark)",
                )),
                DarkMode::Class => VariantAction::Context(".dark ".to_string()),
            };
            return Some(Variant::new(name, action));
        }
        "rtl" => {
            return Some(Variant::new(
                name,
                VariantAction::Context("[dir=\"rtl\"] ".to_string()),
            ))
        }
        "ltr" => {
            return Some(Variant::new(
                name,
                VariantAction::Context("[dir=\"ltr\"] ".to_string()),
            ))
        }
        _ => {}
    }

    if let Some(state) = name.strip_prefix("group-") {
        let selector = state_selector(state)?;
        return Some(Variant::new(
            name,
            VariantAction::Context(format!(".group{} ", selector)),
        ));
    }

    if let Some(state) = name.strip_prefix("peer-") {
        let selector = state_selector(state)?;
        return Some(Variant::new(
            name,
            VariantAction::Context(format!(".peer{} ~ ", selector)),
        ));
    }

    if let Some(at_rule) = supports_at_rule(name) {
        return Some(Variant::new(
            name,
            VariantAction::AtRule(Condition::unordered(at_rule)),
        ));
    }

    parameterized_selector(name).map(|selector| Variant::new(name, VariantAction::Pseudo(selector)))
}

/// 断点：主题 screens、`max-<screen>`、`min-[..]`、`max-[..]`
fn responsive_variant(name: &str, theme: &ResolvedTheme) -> Option<Variant> {
    if let Some(screen) = theme.screen(name) {
        return Some(Variant::responsive(name, screen.condition()));
    }

    if let Some(rest) = name.strip_prefix("max-") {
        let width = match extract_bracket(rest) {
            Some(arbitrary) => unescape_bracket(arbitrary),
            None => theme.screen(rest)?.min_width.clone(),
        };
        // max-* 规则排在无条件规则之后、min-width 规则之前
        return Some(Variant::responsive(
            name,
            Condition::unordered(format!("@media not all and (min-width: {})", width)),
        ));
    }

    if let Some(rest) = name.strip_prefix("min-") {
        let width = unescape_bracket(extract_bracket(rest)?);
        let order = MediaOrder::from_width(&width, theme.screens().len());
        return Some(Variant::responsive(
            name,
            Condition::new(format!("@media (min-width: {})", width), order),
        ));
    }

    None
}

/// `hover` → `:hover`，`[open]` → `[open]`，`has-[img]` → `:has(img)`
fn state_selector(state: &str) -> Option<String> {
    if let Some(pseudo) = PSEUDO_CLASSES.get(state) {
        return Some(format!(":{}", pseudo));
    }
    if let Some(arbitrary) = extract_bracket(state) {
        return Some(unescape_bracket(arbitrary));
    }
    parameterized_selector(state)
}

/// 解析带方括号参数的伪类变体
///
/// - `"has-[.active]"` → `":has(.active)"`
/// - `"not-[.disabled]"` → `":not(.disabled)"`
/// - `"nth-[2n+1]"` → `":nth-child(2n+1)"`
/// - `"aria-[sort=ascending]"` → `"[aria-sort=ascending]"`
/// - `"aria-busy"` → `"[aria-busy=\"true\"]"`
/// - `"data-[loading]"` → `"[data-loading]"`
fn parameterized_selector(name: &str) -> Option<String> {
    if let Some(rest) = name.strip_prefix("has-") {
        let arg = extract_bracket(rest)?;
        return Some(format!(":has({})", unescape_bracket(arg)));
    }

    if let Some(rest) = name.strip_prefix("not-") {
        let arg = extract_bracket(rest)?;
        return Some(format!(":not({})", unescape_bracket(arg)));
    }

    if let Some(rest) = name.strip_prefix("nth-") {
        let arg = extract_bracket(rest)?;
        return Some(format!(":nth-child({})", unescape_bracket(arg)));
    }

    if let Some(rest) = name.strip_prefix("aria-") {
        if let Some(arg) = extract_bracket(rest) {
            return Some(format!("[aria-{}]", unescape_bracket(arg)));
        }
        if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_lowercase() || c == '-') {
            return None;
        }
        return Some(format!("[aria-{}=\"true\"]", rest));
    }

    if let Some(rest) = name.strip_prefix("data-") {
        let arg = extract_bracket(rest)?;
        return Some(format!("[data-{}]", unescape_bracket(arg)));
    }

    None
}

/// `supports-[display:grid]` → `@supports (display:grid)`
fn supports_at_rule(name: &str) -> Option<String> {
    let rest = name.strip_prefix("supports-")?;
    let arg = extract_bracket(rest)?;
    Some(format!("@supports ({})", unescape_bracket(arg)))
}

/// 贯穿剩余部分的 `[...]` 的内容
fn extract_bracket(s: &str) -> Option<&str> {
    let inner = s.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() {
        return None;
    }
    Some(inner)
}

/// 还原方括号写法（下划线 → 空格）
fn unescape_bracket(s: &str) -> String {
    s.replace('_', " ")
}
