//! 响应式断点：排序与断点键的语法

use crate::rule::Condition;
use crate::theme::{ThemeMap, ThemeValue};

/// 媒体条件的排序位置
///
/// 无条件规则排在最前。可解析的最小宽度按宽度升序；
/// 无法解析的排在最后，按声明顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MediaOrder {
    width: u64,
    index: usize,
}

impl MediaOrder {
    pub const UNCONDITIONAL: MediaOrder = MediaOrder { width: 0, index: 0 };

    /// `index` 用于决胜，并为无法解析的宽度排序
    pub fn from_width(css_length: &str, index: usize) -> Self {
        match parse_px(css_length) {
            // +1 使 `min-width: 0` 排在无条件规则之后
            Some(px) => MediaOrder {
                width: (px * 100.0).round() as u64 + 1,
                index,
            },
            None => MediaOrder {
                width: u64::MAX,
                index,
            },
        }
    }

    pub fn is_unconditional(&self) -> bool {
        *self == MediaOrder::UNCONDITIONAL
    }

    /// `outer` 匹配时，位于 `self` 的规则是否必然生效
    pub fn applies_within(&self, outer: &MediaOrder) -> bool {
        !outer.is_unconditional() && outer.width != u64::MAX && self.width <= outer.width
    }
}

/// 响应式断点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    /// 断点名（如 "sm"）
    pub name: String,
    /// 最小宽度（如 "640px"）
    pub min_width: String,
    pub order: MediaOrder,
}

impl Screen {
    /// `@media (min-width: 640px)`
    pub fn condition(&self) -> Condition {
        Condition::new(format!("@media (min-width: {})", self.min_width), self.order)
    }
}

/// 把 CSS 长度换算为像素，`rem`/`em` 按 16px 计
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let (number, factor) = if let Some(n) = value.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("rem") {
        (n, 16.0)
    } else if let Some(n) = value.strip_suffix("em") {
        (n, 16.0)
    } else {
        (value, 1.0)
    };
    let n: f64 = number.parse().ok()?;
    if !n.is_finite() || n < 0.0 {
        return None;
    }
    Some(n * factor)
}

/// 按最小宽度升序排列 `theme.screens`
///
/// 非字符串条目在校验时已被拒绝，这里直接跳过。
pub fn order_screens(screens: Option<&ThemeMap>) -> Vec<Screen> {
    let Some(screens) = screens else {
        return Vec::new();
    };

    let mut ordered: Vec<Screen> = screens
        .iter()
        .enumerate()
        .filter_map(|(index, (name, value))| match value {
            ThemeValue::Str(width) => Some(Screen {
                name: name.clone(),
                min_width: width.clone(),
                order: MediaOrder::from_width(width, index),
            }),
            _ => None,
        })
        .collect();

    ordered.sort_by_key(|screen| screen.order);
    ordered
}

/// `640px`、`40rem`、`0`、`12.5em`、`100%`
pub fn is_length(key: &str) -> bool {
    let number_end = key
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map(|(i, _)| i)
        .unwrap_or(key.len());
    let (number, unit) = key.split_at(number_end);
    if number.is_empty() || number.parse::<f64>().is_err() {
        return false;
    }
    matches!(unit, "" | "px" | "rem" | "em" | "vw" | "vh" | "%")
}

/// `2xl`、`tablet`、`wide_screen`
pub fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn screens(entries: &[(&str, &str)]) -> ThemeMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), ThemeValue::Str(v.to_string())))
            .collect()
    }

    #[test]
    fn test_parse_px_units() {
        assert_eq!(parse_px("640px"), Some(640.0));
        assert_eq!(parse_px("40rem"), Some(640.0));
        assert_eq!(parse_px("2em"), Some(32.0));
        assert_eq!(parse_px("0"), Some(0.0));
        assert_eq!(parse_px("wide"), None);
        assert_eq!(parse_px("-1px"), None);
    }

    #[test]
    fn test_screens_sorted_by_width_not_declaration() {
        let map = screens(&[("xl", "1280px"), ("sm", "640px"), ("lg", "64rem"), ("md", "768px")]);
        let names: Vec<String> = order_screens(Some(&map))
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["sm", "md", "lg", "xl"]);
    }

    #[test]
    fn test_unparsable_screens_go_last_in_declaration_order() {
        let map = screens(&[("print-b", "b"), ("sm", "640px"), ("print-a", "a")]);
        let names: Vec<String> = order_screens(Some(&map))
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["sm", "print-b", "print-a"]);
    }

    #[test]
    fn test_media_order_unconditional_first() {
        assert!(MediaOrder::UNCONDITIONAL < MediaOrder::from_width("0px", 0));
        assert!(MediaOrder::from_width("640px", 3) < MediaOrder::from_width("768px", 0));
    }

    #[test]
    fn test_breakpoint_key_grammar() {
        assert!(is_length("900px"));
        assert!(is_length("56.25rem"));
        assert!(!is_length("px"));
        assert!(is_identifier("2xl"));
        assert!(is_identifier("tablet"));
        assert!(!is_identifier("wide screen"));
        assert!(!is_identifier("-sm"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_applies_within() {
        let sm = MediaOrder::from_width("640px", 0);
        let md = MediaOrder::from_width("48rem", 1);
        let custom = MediaOrder::from_width("calc(10px)", 2);

        assert!(sm.applies_within(&md));
        assert!(md.applies_within(&md));
        assert!(!md.applies_within(&sm));
        assert!(!sm.applies_within(&MediaOrder::UNCONDITIONAL));
        assert!(!sm.applies_within(&custom));
    }
}
