//! 工具类定义，以及解析器用来匹配的注册表

pub mod builtin;
pub mod value;

use std::fmt;
use std::sync::Arc;

use crosswind_core::Declaration;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

pub use builtin::builtin_registry;
pub use value::ValueKind;

/// 提供工具类的层。内置在插件之前，插件按
/// 注册顺序排列。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    Builtin,
    Plugin(usize),
}

/// 工具类类别，声明顺序即输出优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Layout,
    Spacing,
    Sizing,
    Typography,
    Background,
    Border,
    Effects,
    Interactivity,
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Layout => "layout",
            Category::Spacing => "spacing",
            Category::Sizing => "sizing",
            Category::Typography => "typography",
            Category::Background => "background",
            Category::Border => "border",
            Category::Effects => "effects",
            Category::Interactivity => "interactivity",
            Category::Other => "other",
        };
        f.write_str(name)
    }
}

/// 多规则工具类（如 `container`）中某个断点的声明
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenBlock {
    pub condition: crate::rule::Condition,
    pub declarations: Vec<Declaration>,
}

/// 静态工具类的固定输出
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleBody {
    pub declarations: Vec<Declaration>,
    /// 额外规则，每条多包一层媒体条件
    pub screens: Vec<ScreenBlock>,
    /// 追加在类选择器之后（`> :not([hidden]) ~ :not([hidden])`）
    pub selector_suffix: Option<String>,
}

impl RuleBody {
    pub fn new(declarations: Vec<Declaration>) -> Self {
        Self {
            declarations,
            ..Self::default()
        }
    }

    /// 单条 `property: value` 的规则体
    pub fn single(property: &str, value: &str) -> Self {
        Self::new(vec![Declaration::new(property, value)])
    }

    pub fn with_screen(mut self, block: ScreenBlock) -> Self {
        self.screens.push(block);
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.selector_suffix = Some(suffix.into());
        self
    }
}

/// 根据解析出的 CSS 值构建声明
pub type ValueBuilder = Arc<dyn Fn(&str) -> Vec<Declaration> + Send + Sync>;

/// 带值工具类：要搜索的主题命名空间，加上声明构建函数
#[derive(Clone)]
pub struct DynamicUtility {
    /// 按顺序搜索，第一个含有该键的命名空间生效
    pub namespaces: Vec<String>,
    /// 任意值时用于在重载之间选择
    pub kind: ValueKind,
    pub supports_negative: bool,
    pub selector_suffix: Option<String>,
    pub build: ValueBuilder,
}

impl DynamicUtility {
    pub fn new<F>(namespaces: &[&str], build: F) -> Self
    where
        F: Fn(&str) -> Vec<Declaration> + Send + Sync + 'static,
    {
        Self {
            namespaces: namespaces.iter().map(|ns| ns.to_string()).collect(),
            kind: ValueKind::Any,
            supports_negative: false,
            selector_suffix: None,
            build: Arc::new(build),
        }
    }

    /// 把 `properties` 中的每个属性都设为该值
    pub fn properties(namespaces: &[&str], properties: &[&str]) -> Self {
        let properties: Vec<String> = properties.iter().map(|p| p.to_string()).collect();
        Self::new(namespaces, move |value| {
            properties
                .iter()
                .map(|property| Declaration::new(property.as_str(), value))
                .collect()
        })
    }

    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_negative(mut self) -> Self {
        self.supports_negative = true;
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.selector_suffix = Some(suffix.into());
        self
    }

    /// 根据已解析的 CSS 值构建规则体
    pub fn apply(&self, value: &str) -> RuleBody {
        RuleBody {
            declarations: (self.build)(value),
            screens: Vec::new(),
            selector_suffix: self.selector_suffix.clone(),
        }
    }
}

impl fmt::Debug for DynamicUtility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicUtility")
            .field("namespaces", &self.namespaces)
            .field("kind", &self.kind)
            .field("supports_negative", &self.supports_negative)
            .field("selector_suffix", &self.selector_suffix)
            .finish_non_exhaustive()
    }
}

/// 工具类定义：固定规则，或按值构建的候选列表（`text` 同时对应颜色和字号）
#[derive(Debug, Clone)]
pub enum UtilityDefinition {
    Static(RuleBody),
    Dynamic(Vec<DynamicUtility>),
}

impl UtilityDefinition {
    pub fn dynamic(utility: DynamicUtility) -> Self {
        UtilityDefinition::Dynamic(vec![utility])
    }

    pub fn is_static(&self) -> bool {
        matches!(self, UtilityDefinition::Static(_))
    }
}

/// 带有输出顺序元数据的定义
#[derive(Debug, Clone)]
pub struct RegisteredUtility {
    pub definition: UtilityDefinition,
    pub category: Category,
    pub origin: Origin,
}

/// 名称 → 定义，分为精确匹配的静态表与前缀匹配的动态表
///
/// 在同一张表中注册已存在的名称会替换旧定义。
#[derive(Debug, Clone, Default)]
pub struct UtilityRegistry {
    statics: IndexMap<String, RegisteredUtility>,
    dynamics: IndexMap<String, RegisteredUtility>,
}

impl UtilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        definition: UtilityDefinition,
        category: Category,
        origin: Origin,
    ) {
        let name = name.into();
        let table = if definition.is_static() {
            &mut self.statics
        } else {
            &mut self.dynamics
        };
        let entry = RegisteredUtility {
            definition,
            category,
            origin,
        };
        if let Some(previous) = table.insert(name.clone(), entry) {
            debug!(
                utility = %name,
                previous = ?previous.origin,
                current = ?origin,
                "utility overridden"
            );
        }
    }

    pub fn get_static(&self, name: &str) -> Option<&RegisteredUtility> {
        self.statics.get(name)
    }

    pub fn get_dynamic(&self, name: &str) -> Option<&RegisteredUtility> {
        self.dynamics.get(name)
    }

    pub fn len(&self) -> usize {
        self.statics.len() + self.dynamics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statics.is_empty() && self.dynamics.is_empty()
    }
}
