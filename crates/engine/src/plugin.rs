//! 插件注册表：按顺序提供主题层与工具类
//!
//! 插件不会在构建过程中执行代码，只在引擎加载时一次性交出数据：
//! 一棵像 `theme.extend` 一样合并的主题子树，以及注册在
//! 内置工具类之上的工具类定义。

use std::fmt;
use std::sync::Arc;

use crosswind_core::{ConfigError, Declaration};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::theme::{theme_map_from_json, ThemeMap};
use crate::utility::{
    Category, DynamicUtility, Origin, RuleBody, UtilityDefinition, UtilityRegistry, ValueKind,
};

/// 插件接口，两类贡献都是可选的
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    /// 在用户 `extend` 之后合并进主题的子树
    fn contribute_theme(&self) -> Option<ThemeMap> {
        None
    }

    /// 在内置工具类之后注册的工具类，同名替换
    fn contribute_utilities(&self) -> IndexMap<String, UtilityDefinition> {
        IndexMap::new()
    }
}

/// 按注册顺序保存插件
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|p| p.name().to_string()))
            .finish()
    }
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        debug!(plugin = plugin.name(), index = self.plugins.len(), "plugin registered");
        self.plugins.push(plugin);
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// 按注册顺序返回主题贡献
    pub fn theme_layers(&self) -> Vec<ThemeMap> {
        self.plugins
            .iter()
            .filter_map(|plugin| plugin.contribute_theme())
            .collect()
    }

    /// 注册所有插件工具类；插件序号即其来源层
    pub fn apply_utilities(&self, registry: &mut UtilityRegistry) {
        for (index, plugin) in self.plugins.iter().enumerate() {
            let utilities = plugin.contribute_utilities();
            debug!(plugin = plugin.name(), utilities = utilities.len(), "plugin utilities applied");
            for (name, definition) in utilities {
                registry.register(name, definition, Category::Other, Origin::Plugin(index));
            }
        }
    }
}

/// 宿主注册、可被配置按名称引用的插件
#[derive(Clone, Default)]
pub struct PluginCatalog {
    plugins: IndexMap<String, Arc<dyn Plugin>>,
}

impl fmt::Debug for PluginCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.plugins.keys()).finish()
    }
}

impl PluginCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以插件自身名称登记 `plugin`，替换先前的同名条目
    pub fn insert(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.insert(plugin.name().to_string(), plugin);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins.get(name).cloned()
    }
}

/// 把配置中的 `plugins` 数组转换为插件
///
/// 条目可以是目录中的名称或内联对象。其他形式、未知名称
/// 或不提供任何内容的插件都返回 [`ConfigError::InvalidPlugin`]。
pub fn resolve_plugins(
    entries: &[Value],
    catalog: &PluginCatalog,
) -> Result<Vec<Arc<dyn Plugin>>, ConfigError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let plugin: Arc<dyn Plugin> = match entry {
                Value::String(name) => catalog.get(name).ok_or_else(|| ConfigError::InvalidPlugin {
                    index,
                    reason: format!("unknown plugin '{}'", name),
                })?,
                Value::Object(_) => Arc::new(DeclarativePlugin::from_json(index, entry)?),
                other => {
                    return Err(ConfigError::InvalidPlugin {
                        index,
                        reason: format!("expected a plugin name or object, found {}", json_kind(other)),
                    })
                }
            };
            if plugin.contribute_theme().is_none() && plugin.contribute_utilities().is_empty() {
                return Err(ConfigError::InvalidPlugin {
                    index,
                    reason: format!("plugin '{}' contributes neither theme nor utilities", plugin.name()),
                });
            }
            Ok(plugin)
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PluginDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    theme: Option<Value>,
    #[serde(default)]
    utilities: IndexMap<String, UtilityDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UtilityDocument {
    Static {
        declarations: IndexMap<String, String>,
    },
    Dynamic {
        namespaces: Vec<String>,
        properties: Vec<String>,
        #[serde(default)]
        negative: bool,
        #[serde(default)]
        kind: Option<String>,
    },
}

/// 完全由配置描述的插件
///
/// ```json
/// {
///   "name": "tab-size",
///   "theme": { "tabSize": { "2": "2", "4": "4" } },
///   "utilities": {
///     "tab": { "namespaces": ["tabSize"], "properties": ["tab-size"] },
///     "content-auto": { "declarations": { "content-visibility": "auto" } }
///   }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DeclarativePlugin {
    name: String,
    theme: Option<ThemeMap>,
    utilities: IndexMap<String, UtilityDefinition>,
}

impl DeclarativePlugin {
    /// 解析 `plugins[index]`
    pub fn from_json(index: usize, value: &Value) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidPlugin { index, reason };

        let document: PluginDocument =
            serde_json::from_value(value.clone()).map_err(|err| invalid(err.to_string()))?;

        let theme = document
            .theme
            .as_ref()
            .map(|theme| theme_map_from_json(&format!("plugins[{}].theme", index), theme))
            .transpose()?;

        let mut utilities = IndexMap::new();
        for (name, utility) in document.utilities {
            if name.is_empty() {
                return Err(invalid("utility names must not be empty".to_string()));
            }
            let definition = match utility {
                UtilityDocument::Static { declarations } => {
                    UtilityDefinition::Static(RuleBody::new(
                        declarations
                            .into_iter()
                            .map(|(property, value)| Declaration::new(property, value))
                            .collect(),
                    ))
                }
                UtilityDocument::Dynamic {
                    namespaces,
                    properties,
                    negative,
                    kind,
                } => {
                    if namespaces.is_empty() || properties.is_empty() {
                        return Err(invalid(format!(
                            "utility '{}' needs at least one namespace and one property",
                            name
                        )));
                    }
                    let namespaces: Vec<&str> = namespaces.iter().map(String::as_str).collect();
                    let properties: Vec<&str> = properties.iter().map(String::as_str).collect();
                    let mut utility = DynamicUtility::properties(&namespaces, &properties);
                    if negative {
                        utility = utility.with_negative();
                    }
                    match kind.as_deref() {
                        None | Some("any") => {}
                        Some("color") => utility = utility.with_kind(ValueKind::Color),
                        Some("length") => utility = utility.with_kind(ValueKind::Length),
                        Some(other) => {
                            return Err(invalid(format!(
                                "utility '{}' has unknown kind '{}'",
                                name, other
                            )))
                        }
                    }
                    UtilityDefinition::dynamic(utility)
                }
            };
            utilities.insert(name, definition);
        }

        Ok(Self {
            name: document.name.unwrap_or_else(|| format!("plugins[{}]", index)),
            theme,
            utilities,
        })
    }
}

impl Plugin for DeclarativePlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn contribute_theme(&self) -> Option<ThemeMap> {
        self.theme.clone()
    }

    fn contribute_utilities(&self) -> IndexMap<String, UtilityDefinition> {
        self.utilities.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use crate::theme::{default_theme, resolve_theme_with_layers};
    use crate::utility::builtin_registry;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Brand;

    impl Plugin for Brand {
        fn name(&self) -> &str {
            "brand"
        }

        fn contribute_theme(&self) -> Option<ThemeMap> {
            theme_map_from_json("brand", &json!({"colors": {"brand": "#0ea5e9"}})).ok()
        }
    }

    fn declarations(
        token: &str,
        registry: &PluginRegistry,
    ) -> Option<(Vec<(String, String)>, Origin)> {
        let theme =
            resolve_theme_with_layers(&default_theme(), &ThemeMap::new(), &registry.theme_layers())
                .unwrap();
        let mut utilities = builtin_registry(&theme);
        registry.apply_utilities(&mut utilities);
        let resolved = resolve(token, &theme, &utilities)?;
        let rule = &resolved.rules[0];
        Some((
            rule.declarations
                .iter()
                .map(|d| (d.property.clone(), d.value.clone()))
                .collect(),
            rule.origin,
        ))
    }

    #[test]
    fn test_theme_layer_feeds_builtin_utilities() {
        let mut registry = PluginRegistry::new();
        registry.register(Arc::new(Brand));
        let (decls, origin) = declarations("bg-brand", &registry).unwrap();
        assert_eq!(decls, vec![("background-color".to_string(), "#0ea5e9".to_string())]);
        assert_eq!(origin, Origin::Builtin);
    }

    #[test]
    fn test_declarative_plugin() {
        let plugin = DeclarativePlugin::from_json(
            0,
            &json!({
                "name": "tab-size",
                "theme": {"tabSize": {"2": "2", "4": "4"}},
                "utilities": {
                    "tab": {"namespaces": ["tabSize"], "properties": ["tab-size"]},
                    "content-auto": {"declarations": {"content-visibility": "auto"}}
                }
            }),
        )
        .unwrap();
        let mut registry = PluginRegistry::new();
        registry.register(Arc::new(plugin));

        let (decls, origin) = declarations("tab-4", &registry).unwrap();
        assert_eq!(decls, vec![("tab-size".to_string(), "4".to_string())]);
        assert_eq!(origin, Origin::Plugin(0));

        let (decls, _) = declarations("content-auto", &registry).unwrap();
        assert_eq!(decls, vec![("content-visibility".to_string(), "auto".to_string())]);
        assert!(declarations("tab-3", &registry).is_none());
    }

    #[test]
    fn test_later_plugin_overrides() {
        let first = DeclarativePlugin::from_json(
            0,
            &json!({"utilities": {"flex": {"declarations": {"display": "-webkit-box"}}}}),
        )
        .unwrap();
        let second = DeclarativePlugin::from_json(
            1,
            &json!({"utilities": {"flex": {"declarations": {"display": "flex", "gap": "0"}}}}),
        )
        .unwrap();
        let mut registry = PluginRegistry::new();
        registry.register(Arc::new(first));
        registry.register(Arc::new(second));

        let (decls, origin) = declarations("flex", &registry).unwrap();
        assert_eq!(
            decls,
            vec![
                ("display".to_string(), "flex".to_string()),
                ("gap".to_string(), "0".to_string()),
            ]
        );
        assert_eq!(origin, Origin::Plugin(1));
    }

    #[test]
    fn test_resolve_plugins_catalog_and_inline() {
        let mut catalog = PluginCatalog::new();
        catalog.insert(Arc::new(Brand));
        let plugins = resolve_plugins(
            &[json!("brand"), json!({"theme": {"spacing": {"18": "4.5rem"}}})],
            &catalog,
        )
        .unwrap();
        let names: Vec<&str> = plugins.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["brand", "plugins[1]"]);
    }

    #[test]
    fn test_invalid_plugin_entries() {
        let catalog = PluginCatalog::new();
        let cases = [
            (json!(["missing"]), 0),
            (json!([{"name": "ok", "theme": {}}, 42]), 1),
            (json!([{"name": "empty"}]), 0),
            (json!([{"utilities": {"x": {"oops": true}}}]), 0),
            (json!([{"unknown": 1}]), 0),
        ];
        for (entries, expected) in cases {
            let entries = entries.as_array().unwrap().clone();
            match resolve_plugins(&entries, &catalog) {
                Err(ConfigError::InvalidPlugin { index, .. }) => assert_eq!(index, expected),
                other => panic!("expected InvalidPlugin for {:?}, got {:?}", entries, other.map(|p| p.len())),
            }
        }
    }

    #[test]
    fn test_plugin_theme_must_be_mapping() {
        let err = DeclarativePlugin::from_json(2, &json!({"theme": "dark"})).unwrap_err();
        assert!(matches!(err, ConfigError::ExpectedMapping { ref path, .. } if path == "plugins[2].theme"));
    }
}
