//! 内容定位：把 `content.files` 展开成有序的文件列表

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crosswind_core::{ConfigError, ScanError};
use globset::{Glob, GlobBuilder, GlobMatcher, GlobSetBuilder};
use ignore::WalkBuilder;
use indexmap::IndexMap;
use tracing::{debug, info};

/// 模板位置与读取方式
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSpec {
    /// 相对配置文件所在目录解析模式，而不是
    /// 当前工作目录
    pub relative: bool,
    /// glob 模式或字面路径；以 `!` 开头表示排除
    pub files: Vec<String>,
    /// 文件扩展名 → 抽取器名称
    pub extract: IndexMap<String, String>,
}

impl ContentSpec {
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            relative: false,
            files: files.into_iter().map(Into::into).collect(),
            extract: IndexMap::new(),
        }
    }

    pub fn relative(mut self, relative: bool) -> Self {
        self.relative = relative;
        self
    }

    /// 解析模式所用的目录
    pub fn base_dir(&self, config_dir: &Path) -> Result<PathBuf, ScanError> {
        if self.relative {
            return Ok(config_dir.to_path_buf());
        }
        std::env::current_dir().map_err(|source| ScanError::Io {
            path: PathBuf::from("."),
            source,
        })
    }

    /// 不访问文件系统，失败时返回 `EmptyContent` 或 `InvalidPattern`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.files.iter().all(|p| p.trim().is_empty()) {
            return Err(ConfigError::EmptyContent);
        }
        for pattern in &self.files {
            let pattern = normalize(pattern.strip_prefix('!').unwrap_or(pattern));
            compile(&pattern).map_err(|err| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                message: err.kind().to_string(),
            })?;
        }
        Ok(())
    }
}

/// `./templates/**/*.html` → `templates/**/*.html`
fn normalize(pattern: &str) -> String {
    let mut pattern = pattern.trim();
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest;
    }
    pattern.to_string()
}

fn compile(pattern: &str) -> Result<Glob, globset::Error> {
    GlobBuilder::new(pattern).literal_separator(true).build()
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}

/// 不含 glob 语法的前导路径段：`src/**/*.rs` → `src`
fn literal_prefix(pattern: &str) -> PathBuf {
    pattern
        .split('/')
        .take_while(|segment| !is_glob(segment))
        .fold(PathBuf::new(), |acc, segment| acc.join(segment))
}

/// 展开内容模式
///
/// 结果按模式顺序排列，同一模式内按路径字典序；重复文件只保留第一次出现。
/// 目录一律跟随符号链接，链接成环时返回 [`ScanError::SymlinkCycle`]。
pub fn locate(spec: &ContentSpec, base: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut includes = Vec::new();
    let mut excludes = GlobSetBuilder::new();
    for raw in &spec.files {
        if raw.trim().is_empty() {
            continue;
        }
        match raw.strip_prefix('!') {
            Some(negated) => {
                excludes.add(pattern_glob(&normalize(negated), base)?);
            }
            None => includes.push(normalize(raw)),
        }
    }
    let excludes = excludes.build().map_err(|err| ScanError::Walk {
        path: base.to_path_buf(),
        message: err.to_string(),
    })?;

    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for pattern in &includes {
        let mut matched = expand(pattern, base)?;
        matched.sort();
        let before = files.len();
        for path in matched {
            let relative = path.strip_prefix(base).unwrap_or(&path);
            if excludes.is_match(relative) {
                continue;
            }
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
        debug!(pattern = %pattern, files = files.len() - before, "content pattern expanded");
    }

    info!(files = files.len(), base = %base.display(), "located content files");
    Ok(files)
}

fn pattern_glob(pattern: &str, base: &Path) -> Result<Glob, ScanError> {
    compile(pattern).map_err(|err| ScanError::Walk {
        path: base.join(pattern),
        message: err.to_string(),
    })
}

/// 单个包含模式 → 匹配的文件（未排序）
fn expand(pattern: &str, base: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !is_glob(pattern) {
        let path = base.join(pattern);
        if path.is_file() {
            return Ok(vec![path]);
        }
        if path.is_dir() {
            return walk(&path, None, base);
        }
        debug!(path = %path.display(), "content path does not exist");
        return Ok(Vec::new());
    }

    let matcher = pattern_glob(pattern, base)?.compile_matcher();
    let prefix = literal_prefix(pattern);
    let root = if prefix.as_os_str().is_empty() {
        base.to_path_buf()
    } else {
        base.join(prefix)
    };
    if !root.exists() {
        debug!(root = %root.display(), "content root does not exist");
        return Ok(Vec::new());
    }
    walk(&root, Some(&matcher), base)
}

fn walk(root: &Path, matcher: Option<&GlobMatcher>, base: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(false)
        .follow_links(true)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|err| walk_error(err, root))?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(base).unwrap_or(path);
        if matcher.map_or(true, |m| m.is_match(relative)) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// 把遍历错误映射为扫描错误
fn walk_error(err: ignore::Error, root: &Path) -> ScanError {
    walk_error_at(err, root.to_path_buf())
}

fn walk_error_at(err: ignore::Error, path: PathBuf) -> ScanError {
    match err {
        ignore::Error::Loop { ancestor, child } => ScanError::SymlinkCycle {
            path: child,
            ancestor,
        },
        ignore::Error::WithPath { path, err } => walk_error_at(*err, path),
        ignore::Error::WithDepth { err, .. } => walk_error_at(*err, path),
        ignore::Error::WithLineNumber { err, .. } => walk_error_at(*err, path),
        ignore::Error::Io(source) => ScanError::Io { path, source },
        ignore::Error::Partial(mut errors) if errors.len() == 1 => {
            walk_error_at(errors.remove(0), path)
        }
        other => ScanError::Walk {
            path,
            message: other.to_string(),
        },
    }
}
