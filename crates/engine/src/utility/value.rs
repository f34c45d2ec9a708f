//! 值工具：任意值类型推断与取负

use serde::Serialize;

/// CSS 值的大致类型，用于在重载的工具类之间选择
/// （`text-[#333]` 是颜色，`text-[14px]` 是字号）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    Any,
    Color,
    Length,
}

impl ValueKind {
    /// `value` 类型的值能否用于期望 `self` 的工具类
    pub fn accepts(self, value: ValueKind) -> bool {
        self == ValueKind::Any || value == ValueKind::Any || self == value
    }
}

const COLOR_FUNCTIONS: &[&str] = &["rgb(", "rgba(", "hsl(", "hsla(", "hwb(", "lab(", "lch(", "oklab(", "oklch(", "color("];
const COLOR_KEYWORDS: &[&str] = &["transparent", "currentColor", "currentcolor", "inherit"];

/// 推断任意值的类型
pub fn infer_kind(value: &str) -> ValueKind {
    let value = value.trim();
    if value.starts_with('#')
        || COLOR_FUNCTIONS.iter().any(|f| value.starts_with(f))
        || COLOR_KEYWORDS.contains(&value)
    {
        return ValueKind::Color;
    }
    let starts_numeric = value
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '.' || c == '-');
    if starts_numeric || value.starts_with("calc(") || value.starts_with("clamp(") {
        return ValueKind::Length;
    }
    ValueKind::Any
}

/// 从任意值中拆出显式类型提示：`color:var(--c)`
pub fn split_type_hint(content: &str) -> (Option<ValueKind>, &str) {
    if let Some(rest) = content.strip_prefix("color:") {
        return (Some(ValueKind::Color), rest);
    }
    if let Some(rest) = content.strip_prefix("length:") {
        return (Some(ValueKind::Length), rest);
    }
    (None, content)
}

/// 取负值
///
/// - `0`、`0px` 等零值保持不变
/// - 已带 `-` 的值去掉负号
/// - 简单数值直接加 `-`
/// - 其他（`var()`、关键字等）包成 `calc(x * -1)`
pub fn negate(value: &str) -> String {
    let value = value.trim();
    if is_zero(value) {
        return value.to_string();
    }
    if let Some(positive) = value.strip_prefix('-') {
        return positive.to_string();
    }
    if is_plain_number(value) {
        return format!("-{}", value);
    }
    format!("calc({} * -1)", value)
}

fn is_zero(value: &str) -> bool {
    let number: String = value
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    !number.is_empty()
        && number.chars().all(|c| c == '0' || c == '.')
        && value[number.len()..].chars().all(|c| c.is_ascii_alphabetic() || c == '%')
}

/// `1rem`、`0.5`、`25%`
fn is_plain_number(value: &str) -> bool {
    let digits = value
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .count();
    digits > 0
        && value[digits..]
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '%')
}
