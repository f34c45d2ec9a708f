//! 两阶段主题合并
//!
//! 1. 覆盖：用户设置的每个顶层键（`extend` 除外）
//!    整体替换默认值。
//! 2. 扩展：`extend` 以及各插件主题层依次深度合并在上面。
//!
//! 两个阶段都是作用于自有映射的纯函数。

use crosswind_core::ConfigError;
use tracing::debug;

use super::{ResolvedTheme, ThemeMap, ThemeValue, DEFAULT_KEY};

const EXTEND_KEY: &str = "extend";

/// 阶段一：用户顶层键替换默认值
pub fn apply_overrides(defaults: &ThemeMap, user: &ThemeMap) -> ThemeMap {
    let mut merged = defaults.clone();
    for (key, value) in user {
        if key == EXTEND_KEY {
            continue;
        }
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// 阶段二：把 `extend` 深度合并进 `base`
///
/// 不会删除 `base` 已有的键。
pub fn apply_extend(base: &ThemeMap, extend: &ThemeMap) -> ThemeMap {
    let mut merged = base.clone();
    for (key, value) in extend {
        let next = match merged.get(key) {
            Some(existing) => merge_value(existing, value),
            None => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    merged
}

/// 合并单个值
///
/// - 映射 + 映射：递归合并
/// - 标量 + 映射：标量保留为 `DEFAULT`，再合并映射
/// - 映射 + 标量：标量写入 `DEFAULT`
/// - 标量 + 标量：extend 覆盖
fn merge_value(base: &ThemeValue, extend: &ThemeValue) -> ThemeValue {
    match (base, extend) {
        (ThemeValue::Map(base), ThemeValue::Map(extend)) => {
            ThemeValue::Map(apply_extend(base, extend))
        }
        (scalar, ThemeValue::Map(extend)) => {
            let mut promoted = ThemeMap::new();
            promoted.insert(DEFAULT_KEY.to_string(), scalar.clone());
            ThemeValue::Map(apply_extend(&promoted, extend))
        }
        (ThemeValue::Map(base), scalar) => {
            let mut merged = base.clone();
            let next = match merged.get(DEFAULT_KEY) {
                Some(existing) => merge_value(existing, scalar),
                None => scalar.clone(),
            };
            merged.insert(DEFAULT_KEY.to_string(), next);
            ThemeValue::Map(merged)
        }
        (_, scalar) => scalar.clone(),
    }
}

/// 把用户主题合并到默认主题上并校验结果
pub fn resolve_theme(defaults: &ThemeMap, user: &ThemeMap) -> Result<ResolvedTheme, ConfigError> {
    resolve_theme_with_layers(defaults, user, &[])
}

/// 同 [`resolve_theme`]，插件主题层按注册顺序在用户
/// `extend` 之后扩展
pub fn resolve_theme_with_layers(
    defaults: &ThemeMap,
    user: &ThemeMap,
    layers: &[ThemeMap],
) -> Result<ResolvedTheme, ConfigError> {
    let extend = match user.get(EXTEND_KEY) {
        None => ThemeMap::new(),
        Some(ThemeValue::Map(extend)) => extend.clone(),
        Some(other) => {
            return Err(ConfigError::ExpectedMapping {
                path: "theme.extend".to_string(),
                found: other.kind(),
            })
        }
    };

    let overridden = apply_overrides(defaults, user);
    let mut merged = apply_extend(&overridden, &extend);
    for layer in layers {
        merged = apply_extend(&merged, layer);
    }

    debug!(
        overrides = user.keys().filter(|k| *k != EXTEND_KEY).count(),
        extends = extend.len(),
        layers = layers.len(),
        "resolved theme"
    );

    ResolvedTheme::new(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::theme_map_from_json;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(value: serde_json::Value) -> ThemeMap {
        theme_map_from_json("theme", &value).unwrap()
    }

    #[test]
    fn test_override_replaces_wholesale() {
        let defaults = map(json!({"colors": {"red": "#f00", "blue": "#00f"}}));
        let user = map(json!({"colors": {"brand": "#123"}}));

        let merged = apply_overrides(&defaults, &user);
        assert_eq!(merged, map(json!({"colors": {"brand": "#123"}})));
    }

    #[test]
    fn test_extend_deep_merges() {
        let base = map(json!({"colors": {"red": {"500": "#f00"}}}));
        let extend = map(json!({"colors": {"red": {"600": "#c00"}, "brand": "#123"}}));

        let merged = apply_extend(&base, &extend);
        assert_eq!(
            merged,
            map(json!({"colors": {"red": {"500": "#f00", "600": "#c00"}, "brand": "#123"}}))
        );
    }

    #[test]
    fn test_extend_scalar_base_becomes_default() {
        let base = map(json!({"borderRadius": {"lg": "0.5rem"}, "spacing": {"4": "1rem"}}));
        let extend = map(json!({"spacing": {"4": {"tight": "0.9rem"}}}));

        let merged = apply_extend(&base, &extend);
        assert_eq!(
            merged.get("spacing"),
            Some(&ThemeValue::Map(
                map(json!({"4": {"DEFAULT": "1rem", "tight": "0.9rem"}}))
            ))
        );
    }

    #[test]
    fn test_extend_scalar_onto_mapping_sets_default() {
        let base = map(json!({"colors": {"brand": {"dark": "#000"}}}));
        let extend = map(json!({"colors": {"brand": "#123"}}));

        let merged = apply_extend(&base, &extend);
        assert_eq!(
            merged,
            map(json!({"colors": {"brand": {"dark": "#000", "DEFAULT": "#123"}}}))
        );
    }

    #[test]
    fn test_extend_scalar_shadows_scalar() {
        let base = map(json!({"spacing": {"4": "1rem"}}));
        let extend = map(json!({"spacing": {"4": "1.1rem"}}));
        assert_eq!(
            apply_extend(&base, &extend),
            map(json!({"spacing": {"4": "1.1rem"}}))
        );
    }

    #[test]
    fn test_resolve_applies_extend_after_override() {
        let defaults = map(json!({"colors": {"red": "#f00"}, "spacing": {"1": "0.25rem"}}));
        let user = map(json!({
            "colors": {"brand": "#123"},
            "extend": {"colors": {"accent": "#456"}, "spacing": {"2": "0.5rem"}}
        }));

        let theme = resolve_theme(&defaults, &user).unwrap();
        assert_eq!(theme.lookup("colors", "red"), None);
        assert_eq!(theme.lookup("colors", "brand"), Some("#123"));
        assert_eq!(theme.lookup("colors", "accent"), Some("#456"));
        assert_eq!(theme.lookup("spacing", "1"), Some("0.25rem"));
        assert_eq!(theme.lookup("spacing", "2"), Some("0.5rem"));
        assert!(theme.root().get("extend").is_none());
    }

    #[test]
    fn test_layers_extend_in_order() {
        let defaults = map(json!({"colors": {"red": "#f00"}}));
        let user = map(json!({"extend": {"colors": {"brand": "#111"}}}));
        let first = map(json!({"colors": {"brand": "#222"}}));
        let second = map(json!({"colors": {"brand": "#333", "mint": "#3fb"}}));

        let theme = resolve_theme_with_layers(&defaults, &user, &[first, second]).unwrap();
        assert_eq!(theme.lookup("colors", "brand"), Some("#333"));
        assert_eq!(theme.lookup("colors", "mint"), Some("#3fb"));
        assert_eq!(theme.lookup("colors", "red"), Some("#f00"));
    }

    #[test]
    fn test_extend_must_be_mapping() {
        let user = map(json!({"extend": "colors"}));
        let err = resolve_theme(&ThemeMap::new(), &user).unwrap_err();
        assert_eq!(err.to_string(), "theme.extend must be a mapping, found string");
    }

    #[test]
    fn test_merge_does_not_touch_inputs() {
        let defaults = map(json!({"colors": {"red": "#f00"}}));
        let extend = map(json!({"colors": {"blue": "#00f"}}));
        let snapshot = defaults.clone();
        let _ = apply_extend(&defaults, &extend);
        assert_eq!(defaults, snapshot);
    }
}
