//! 扫描内容的工具类引擎
//!
//! [`Config`] 只需加载一次得到 [`Engine`]；每次 [`Engine::build`] 定位
//! 内容文件、抽取候选类名 token、按主题与工具类注册表解析，
//! 并按输出顺序返回去重后的规则。

pub mod config;
pub mod content;
pub mod engine;
pub mod extract;
pub mod generator;
pub mod plugin;
pub mod resolver;
pub mod rule;
pub mod scan;
pub mod selector;
pub mod theme;
pub mod utility;
pub mod variant;

pub use config::{Config, ContentConfig};
pub use content::{locate, ContentSpec};
pub use engine::{BuildOutput, BuildStats, Engine, EngineBuilder};
pub use extract::{ClassAttributeExtractor, DefaultExtractor, Extractor, ExtractorSet};
pub use generator::generate;
pub use plugin::{DeclarativePlugin, Plugin, PluginCatalog, PluginRegistry};
pub use resolver::{resolve, ResolveOptions, ResolvedClass, UtilityResolver};
pub use rule::{Condition, ResolvedRule};
pub use scan::{CancellationToken, ScanCache, ScanOutcome, Scanner};
pub use theme::{default_theme, resolve_theme, ResolvedTheme, ThemeMap, ThemeValue};
pub use utility::{
    builtin_registry, Category, DynamicUtility, Origin, RuleBody, UtilityDefinition,
    UtilityRegistry,
};
pub use variant::DarkMode;

pub use crosswind_core::{
    ConfigError, Declaration, Error, Result, ScanError, ScanWarning, WarningKind,
};
