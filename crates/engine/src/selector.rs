//! 类选择器构建

use crate::variant::{Variant, VariantAction};

/// 转义原始类名 token，用于 CSS 选择器中的 `.` 之后
///
/// ```
/// use crosswind_engine::selector::escape_class;
///
/// assert_eq!(escape_class("sm:container"), "sm\\:container");
/// assert_eq!(escape_class("w-1/2"), "w-1\\/2");
/// assert_eq!(escape_class("2xl:p-4"), "\\32 xl\\:p-4");
/// ```
pub fn escape_class(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len() + 8);
    for (i, ch) in raw.char_indices() {
        let leading_digit = ch.is_ascii_digit()
            && (i == 0 || (i == 1 && raw.starts_with('-')));
        if leading_digit {
            escaped.push_str(&format!("\\{:x} ", ch as u32));
        } else if ch == '-' && i == 0 && raw.len() == 1 {
            escaped.push_str("\\-");
        } else if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii() {
            escaped.push(ch);
        } else if ch.is_ascii_control() {
            escaped.push_str(&format!("\\{:x} ", ch as u32));
        } else {
            escaped.push('\\');
            escaped.push(ch);
        }
    }
    escaped
}

/// 应用变体（由内向外）时收集的选择器片段
#[derive(Debug, Clone, Default)]
pub struct SelectorBuilder {
    contexts: Vec<String>,
    pseudo: String,
    pseudo_elements: String,
}

impl SelectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录变体的选择器部分；at-rule 在这里忽略
    pub fn apply(&mut self, variant: &Variant) {
        match &variant.action {
            VariantAction::Pseudo(pseudo) => self.pseudo.push_str(pseudo),
            VariantAction::PseudoElement(element) => {
                self.pseudo_elements.insert_str(0, element)
            }
            VariantAction::Context(context) => self.contexts.push(context.clone()),
            VariantAction::AtRule(_) => {}
        }
    }

    /// `.group:hover .md\:group-hover\:p-4:focus > :not([hidden])::before`
    pub fn build(&self, token: &str, suffix: Option<&str>) -> String {
        let mut selector = String::new();
        // 外层变体的上下文在最前
        for context in self.contexts.iter().rev() {
            selector.push_str(context);
        }
        selector.push('.');
        selector.push_str(&escape_class(token));
        selector.push_str(&self.pseudo);
        if let Some(suffix) = suffix {
            selector.push_str(suffix);
        }
        selector.push_str(&self.pseudo_elements);
        selector
    }
}
