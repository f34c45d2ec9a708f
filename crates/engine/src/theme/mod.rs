//! 设计令牌主题：值树、两阶段合并、校验与查找

pub mod defaults;
pub mod merge;
pub mod screens;
pub mod validate;

use std::collections::HashMap;

use crosswind_core::ConfigError;
use indexmap::IndexMap;
use serde::Serialize;

pub use defaults::default_theme;
pub use merge::{apply_extend, apply_overrides, resolve_theme, resolve_theme_with_layers};
pub use screens::{MediaOrder, Screen};

/// 命名空间默认值所用的键（`border` → `borderWidth.DEFAULT`）
pub const DEFAULT_KEY: &str = "DEFAULT";

/// 有序的主题键映射
pub type ThemeMap = IndexMap<String, ThemeValue>;

/// 主题值：字符串、字符串列表或嵌套映射
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ThemeValue {
    Str(String),
    List(Vec<String>),
    Map(ThemeMap),
}

impl ThemeValue {
    pub fn str(value: impl Into<String>) -> Self {
        ThemeValue::Str(value.into())
    }

    /// 转换 JSON 值，错误信息中带上 `path`
    ///
    /// 数字和布尔值转为字符串；`null` 与混合数组被拒绝。
    pub fn from_json(path: &str, value: &serde_json::Value) -> Result<Self, ConfigError> {
        use serde_json::Value;

        match value {
            Value::String(s) => Ok(ThemeValue::Str(s.clone())),
            Value::Number(n) => Ok(ThemeValue::Str(n.to_string())),
            Value::Bool(b) => Ok(ThemeValue::Str(b.to_string())),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::String(s) => Ok(s.clone()),
                    Value::Number(n) => Ok(n.to_string()),
                    _ => Err(ConfigError::InvalidValue {
                        path: format!("{}[{}]", path, i),
                        message: "list entries must be strings or numbers".to_string(),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(ThemeValue::List),
            Value::Object(entries) => {
                let mut map = ThemeMap::with_capacity(entries.len());
                for (key, child) in entries {
                    let child_path = format!("{}.{}", path, key);
                    map.insert(key.clone(), ThemeValue::from_json(&child_path, child)?);
                }
                Ok(ThemeValue::Map(map))
            }
            Value::Null => Err(ConfigError::InvalidValue {
                path: path.to_string(),
                message: "null is not a theme value".to_string(),
            }),
        }
    }

    /// 变体名称，用于错误信息
    pub fn kind(&self) -> &'static str {
        match self {
            ThemeValue::Str(_) => "string",
            ThemeValue::List(_) => "list",
            ThemeValue::Map(_) => "mapping",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ThemeValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ThemeMap> {
        match self {
            ThemeValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// 叶子的 CSS 文本；列表以逗号连接，映射取其 `DEFAULT`
    pub fn css_value(&self) -> Option<String> {
        match self {
            ThemeValue::Str(s) => Some(s.clone()),
            ThemeValue::List(items) => Some(items.join(", ")),
            ThemeValue::Map(map) => map.get(DEFAULT_KEY).and_then(ThemeValue::css_value),
        }
    }
}

impl From<&str> for ThemeValue {
    fn from(value: &str) -> Self {
        ThemeValue::Str(value.to_string())
    }
}

/// 把 JSON 对象转换为 [`ThemeMap`]，其他形状一律拒绝
pub fn theme_map_from_json(path: &str, value: &serde_json::Value) -> Result<ThemeMap, ConfigError> {
    match ThemeValue::from_json(path, value)? {
        ThemeValue::Map(map) => Ok(map),
        other => Err(ConfigError::ExpectedMapping {
            path: path.to_string(),
            found: other.kind(),
        }),
    }
}

/// 沿点分 `path` 逐层进入嵌套映射
///
/// 键本身含点（`spacing.0.5`）时无法这样访问；
/// 命名空间的值请用 [`ResolvedTheme::lookup`]。
pub fn get_path<'a>(root: &'a ThemeMap, path: &str) -> Option<&'a ThemeValue> {
    let mut segments = path.split('.');
    let mut current = root.get(segments.next()?)?;
    for segment in segments {
        current = current.as_map()?.get(segment)?;
    }
    Some(current)
}

/// 合并并校验完毕、可供工具类查找的主题
#[derive(Debug, Clone)]
pub struct ResolvedTheme {
    root: ThemeMap,
    /// 命名空间 → 展平后的键 → CSS 值
    namespaces: HashMap<String, IndexMap<String, String>>,
    screens: Vec<Screen>,
}

impl ResolvedTheme {
    /// 校验 `root`，并预先计算命名空间查找表与断点顺序
    pub fn new(root: ThemeMap) -> Result<Self, ConfigError> {
        validate::validate_theme(&root)?;

        let namespaces = root
            .iter()
            .filter_map(|(name, value)| {
                value.as_map().map(|map| {
                    let mut flat = IndexMap::new();
                    flatten_into(&mut flat, None, map);
                    (name.clone(), flat)
                })
            })
            .collect();

        let screens = screens::order_screens(root.get("screens").and_then(ThemeValue::as_map));

        Ok(Self {
            root,
            namespaces,
            screens,
        })
    }

    pub fn root(&self) -> &ThemeMap {
        &self.root
    }

    /// 按点分路径访问合并后的树（`container.padding`）
    pub fn get(&self, path: &str) -> Option<&ThemeValue> {
        get_path(&self.root, path)
    }

    /// 在命名空间中查找 `key`（`lookup("colors", "red-500")`）
    pub fn lookup(&self, namespace: &str, key: &str) -> Option<&str> {
        self.namespaces
            .get(namespace)
            .and_then(|flat| flat.get(key))
            .map(String::as_str)
    }

    /// 命名空间的展平视图
    pub fn namespace(&self, namespace: &str) -> Option<&IndexMap<String, String>> {
        self.namespaces.get(namespace)
    }

    /// 按最小宽度升序排列的断点
    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn screen(&self, name: &str) -> Option<&Screen> {
        self.screens.iter().find(|screen| screen.name == name)
    }
}

/// `colors.red.500` → `red-500`；嵌套的 `DEFAULT` 折叠到父键上
fn flatten_into(out: &mut IndexMap<String, String>, prefix: Option<&str>, map: &ThemeMap) {
    for (key, value) in map {
        let flat_key = match (prefix, key.as_str()) {
            (Some(prefix), DEFAULT_KEY) => prefix.to_string(),
            (Some(prefix), key) => format!("{}-{}", prefix, key),
            (None, key) => key.to_string(),
        };
        match value {
            ThemeValue::Map(child) => flatten_into(out, Some(&flat_key), child),
            leaf => {
                if let Some(css) = leaf.css_value() {
                    out.insert(flat_key, css);
                }
            }
        }
    }
}
