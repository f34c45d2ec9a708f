//! 合并后主题的结构校验

use crosswind_core::ConfigError;

use super::screens::{is_identifier, is_length};
use super::{ThemeMap, ThemeValue, DEFAULT_KEY};

/// 内置工具类读取的命名空间；存在时必须是映射
pub const UTILITY_NAMESPACES: &[&str] = &[
    "spacing",
    "padding",
    "margin",
    "gap",
    "space",
    "width",
    "height",
    "minWidth",
    "minHeight",
    "maxWidth",
    "maxHeight",
    "size",
    "inset",
    "colors",
    "textColor",
    "backgroundColor",
    "borderColor",
    "fontSize",
    "fontWeight",
    "fontFamily",
    "lineHeight",
    "letterSpacing",
    "borderWidth",
    "borderRadius",
    "opacity",
    "boxShadow",
    "zIndex",
    "order",
    "flex",
    "flexBasis",
    "flexGrow",
    "flexShrink",
];

/// 总是可以作为 container 内边距键的断点名
const STANDARD_BREAKPOINTS: &[&str] = &["sm", "md", "lg", "xl"];

/// 校验合并后的主题结构，错误信息带点分路径
pub fn validate_theme(theme: &ThemeMap) -> Result<(), ConfigError> {
    if let Some(screens) = theme.get("screens") {
        validate_screens(screens)?;
    }
    if let Some(container) = theme.get("container") {
        validate_container(container)?;
    }
    for namespace in UTILITY_NAMESPACES {
        if let Some(value) = theme.get(*namespace) {
            expect_mapping(&format!("theme.{}", namespace), value)?;
        }
    }
    Ok(())
}

fn expect_mapping<'a>(path: &str, value: &'a ThemeValue) -> Result<&'a ThemeMap, ConfigError> {
    value.as_map().ok_or_else(|| ConfigError::ExpectedMapping {
        path: path.to_string(),
        found: value.kind(),
    })
}

fn validate_screens(screens: &ThemeValue) -> Result<(), ConfigError> {
    let screens = expect_mapping("theme.screens", screens)?;
    for (name, value) in screens {
        let path = format!("theme.screens.{}", name);
        if !is_identifier(name) {
            return Err(ConfigError::InvalidBreakpoint {
                path: "theme.screens".to_string(),
                key: name.clone(),
            });
        }
        match value {
            ThemeValue::Str(width) if !width.trim().is_empty() => {}
            ThemeValue::Str(_) => {
                return Err(ConfigError::InvalidValue {
                    path,
                    message: "breakpoint width must not be empty".to_string(),
                })
            }
            other => {
                return Err(ConfigError::InvalidValue {
                    path,
                    message: format!("breakpoint width must be a string, found {}", other.kind()),
                })
            }
        }
    }
    Ok(())
}

fn validate_container(container: &ThemeValue) -> Result<(), ConfigError> {
    let container = expect_mapping("theme.container", container)?;

    if let Some(center) = container.get("center") {
        match center.as_str() {
            Some("true") | Some("false") => {}
            _ => {
                return Err(ConfigError::InvalidValue {
                    path: "theme.container.center".to_string(),
                    message: "must be a boolean".to_string(),
                })
            }
        }
    }

    let Some(padding) = container.get("padding") else {
        return Ok(());
    };
    let padding = expect_mapping("theme.container.padding", padding)?;
    for (key, value) in padding {
        let known = key == DEFAULT_KEY || STANDARD_BREAKPOINTS.contains(&key.as_str());
        if !known && !is_length(key) && !is_identifier(key) {
            return Err(ConfigError::InvalidBreakpoint {
                path: "theme.container.padding".to_string(),
                key: key.clone(),
            });
        }
        if value.as_str().is_none() {
            return Err(ConfigError::InvalidValue {
                path: format!("theme.container.padding.{}", key),
                message: format!("padding must be a length string, found {}", value.kind()),
            });
        }
    }
    Ok(())
}
