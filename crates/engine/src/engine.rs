//! 引擎入口：加载一次，多次构建

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crosswind_core::{Result, ScanError, ScanWarning};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::content::{locate, ContentSpec};
use crate::extract::{Extractor, ExtractorSet};
use crate::generator::generate;
use crate::plugin::{resolve_plugins, Plugin, PluginCatalog, PluginRegistry};
use crate::resolver::{ResolveOptions, ResolvedClass, UtilityResolver};
use crate::rule::ResolvedRule;
use crate::scan::{CancellationToken, ScanCache, Scanner};
use crate::theme::{default_theme, resolve_theme_with_layers, ResolvedTheme, ThemeMap};
use crate::utility::{builtin_registry, UtilityRegistry};

/// 单次构建的计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub files_scanned: usize,
    /// 经过 safelist 与 blocklist 后的不同候选 token 数
    pub tokens: usize,
    /// 至少生成一条规则的 token 数
    pub resolved_tokens: usize,
    pub rules: usize,
    pub cache_hits: usize,
}

/// 渲染所需的全部结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutput {
    pub rules: Vec<ResolvedRule>,
    pub warnings: Vec<ScanWarning>,
    pub stats: BuildStats,
}

/// 构建 [`Engine`]
///
/// 通过 [`EngineBuilder::plugin`] 传入的插件排在配置中
/// `plugins` 所列插件之前。
pub struct EngineBuilder {
    config: Config,
    root: Option<PathBuf>,
    plugins: Vec<Arc<dyn Plugin>>,
    catalog: PluginCatalog,
    extractors: IndexMap<String, Arc<dyn Extractor>>,
    jobs: Option<usize>,
    defaults: Option<ThemeMap>,
}

impl EngineBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            root: None,
            plugins: Vec::new(),
            catalog: PluginCatalog::new(),
            extractors: IndexMap::new(),
            jobs: None,
            defaults: None,
        }
    }

    /// `content.relative` 的解析目录，默认为
    /// 加载配置的目录
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// 登记 `plugin`，供配置条目按名称引用
    pub fn catalog_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.catalog.insert(plugin);
        self
    }

    /// 注册一个可在 `content.extract` 中引用的抽取器
    pub fn extractor(mut self, name: impl Into<String>, extractor: Arc<dyn Extractor>) -> Self {
        self.extractors.insert(name.into(), extractor);
        self
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// 替换内置默认主题
    pub fn default_theme(mut self, defaults: ThemeMap) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// 校验配置并构建主题、注册表和工作线程池
    pub fn build(self) -> Result<Engine> {
        let config = self.config;
        config.validate()?;
        let content = config.content_spec();

        let mut plugins = PluginRegistry::new();
        for plugin in self.plugins {
            plugins.register(plugin);
        }
        for plugin in resolve_plugins(&config.plugins, &self.catalog)? {
            plugins.register(plugin);
        }

        let defaults = self.defaults.unwrap_or_else(default_theme);
        let theme = resolve_theme_with_layers(&defaults, &config.theme_map()?, &plugins.theme_layers())?;

        let mut registry = builtin_registry(&theme);
        plugins.apply_utilities(&mut registry);

        let extractors = ExtractorSet::configure(&content.extract, &self.extractors)?;
        let scanner = Scanner::new(self.jobs, extractors)?;

        let config_dir = self
            .root
            .or_else(|| config.root.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        let base = content.base_dir(&config_dir)?;

        info!(
            plugins = plugins.len(),
            utilities = registry.len(),
            screens = theme.screens().len(),
            base = %base.display(),
            "engine loaded"
        );

        Ok(Engine {
            content,
            base,
            theme,
            registry,
            plugins,
            scanner,
            options: ResolveOptions {
                dark_mode: config.dark_mode,
                important: config.important,
            },
            safelist: config.safelist,
            blocklist: config.blocklist.into_iter().collect(),
        })
    }
}

/// 已加载的引擎；主题与注册表不可变，每次构建都从头开始
#[derive(Debug)]
pub struct Engine {
    content: ContentSpec,
    base: PathBuf,
    theme: ResolvedTheme,
    registry: UtilityRegistry,
    plugins: PluginRegistry,
    scanner: Scanner,
    options: ResolveOptions,
    safelist: Vec<String>,
    blocklist: HashSet<String>,
}

impl Engine {
    pub fn builder(config: Config) -> EngineBuilder {
        EngineBuilder::new(config)
    }

    pub fn theme(&self) -> &ResolvedTheme {
        &self.theme
    }

    pub fn registry(&self) -> &UtilityRegistry {
        &self.registry
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    /// 内容模式的解析目录
    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// 当前的内容文件
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        Ok(locate(&self.content, &self.base)?)
    }

    fn resolver(&self) -> UtilityResolver<'_> {
        UtilityResolver::new(&self.theme, &self.registry).with_options(self.options)
    }

    /// 使用本引擎的主题与选项解析单个 token
    pub fn resolve_token(&self, token: &str) -> Option<ResolvedClass> {
        self.resolver().resolve(token)
    }

    /// 扫描、解析并排序
    pub fn build(&self) -> Result<BuildOutput> {
        self.build_with(None, &CancellationToken::new())
    }

    /// 同 [`Engine::build`]，复用 `cache` 并响应 `cancel`
    pub fn build_with(
        &self,
        cache: Option<&mut ScanCache>,
        cancel: &CancellationToken,
    ) -> Result<BuildOutput> {
        let files = self.files()?;
        let scanned = self.scanner.scan(&files, cache, cancel)?;

        let mut tokens = scanned.tokens;
        tokens.extend(self.safelist.iter().cloned());
        tokens.retain(|token| !self.blocklist.contains(token));

        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled.into());
        }
        let resolved = self.resolve_all(&tokens);
        let resolved_tokens = resolved.len();
        let rules = generate(resolved);

        let stats = BuildStats {
            files_scanned: scanned.files_scanned,
            tokens: tokens.len(),
            resolved_tokens,
            rules: rules.len(),
            cache_hits: scanned.cache_hits,
        };
        info!(
            files = stats.files_scanned,
            tokens = stats.tokens,
            resolved = stats.resolved_tokens,
            rules = stats.rules,
            warnings = scanned.warnings.len(),
            "build finished"
        );

        Ok(BuildOutput {
            rules,
            warnings: scanned.warnings,
            stats,
        })
    }

    /// 为给定 token 集合生成规则，不访问文件系统
    ///
    /// 仍应用 blocklist，不应用 safelist。
    pub fn generate_for<I, S>(&self, tokens: I) -> Vec<ResolvedRule>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: BTreeSet<String> = tokens
            .into_iter()
            .map(Into::into)
            .filter(|token| !self.blocklist.contains(token))
            .collect();
        generate(self.resolve_all(&tokens))
    }

    fn resolve_all(&self, tokens: &BTreeSet<String>) -> Vec<ResolvedClass> {
        let resolver = self.resolver();
        let resolved: Vec<ResolvedClass> = self.scanner.pool().install(|| {
            tokens
                .par_iter()
                .filter_map(|token| resolver.resolve(token))
                .collect()
        });
        debug!(tokens = tokens.len(), resolved = resolved.len(), "tokens resolved");
        resolved
    }
}
