//! 对定位到的文件并行抽取
//!
//! 每个文件是有界 rayon 线程池上的一个任务。任务各自返回 token 集合，
//! 由一次顺序归约合并，热路径上不加锁。

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crosswind_core::{ScanError, ScanWarning};
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, info, warn};

use crate::extract::ExtractorSet;

/// `jobs` 交由机器决定时的线程数上限
pub const MAX_JOBS: usize = 16;

/// 共享的取消标志，每个文件任务开始前检查
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    hash: blake3::Hash,
    tokens: Arc<BTreeSet<String>>,
}

/// 按文件内容哈希缓存抽取结果
///
/// 命中与否只影响速度，不影响输出。
#[derive(Debug, Clone, Default)]
pub struct ScanCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl ScanCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn lookup(&self, path: &Path, hash: &blake3::Hash) -> Option<Arc<BTreeSet<String>>> {
        self.entries
            .get(path)
            .filter(|entry| entry.hash == *hash)
            .map(|entry| Arc::clone(&entry.tokens))
    }

    /// 丢弃不在最近一次扫描中的文件条目
    fn retain_paths(&mut self, files: &[PathBuf]) {
        let keep: std::collections::HashSet<&PathBuf> = files.iter().collect();
        self.entries.retain(|path, _| keep.contains(path));
    }
}

/// 单次扫描的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub tokens: BTreeSet<String>,
    pub warnings: Vec<ScanWarning>,
    pub files_scanned: usize,
    pub cache_hits: usize,
}

enum FileResult {
    Extracted {
        path: PathBuf,
        hash: blake3::Hash,
        tokens: Arc<BTreeSet<String>>,
        cached: bool,
    },
    Skipped {
        path: PathBuf,
        warning: ScanWarning,
    },
    Cancelled,
}

/// 有界工作线程池与抽取器表
pub struct Scanner {
    pool: ThreadPool,
    extractors: ExtractorSet,
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("threads", &self.pool.current_num_threads())
            .field("extractors", &self.extractors)
            .finish()
    }
}

/// `jobs` 为 `None` 或 `0` 时每个 CPU 一个线程，上限为 [`MAX_JOBS`]
pub fn worker_count(jobs: Option<usize>) -> usize {
    match jobs {
        Some(n) if n > 0 => n,
        _ => std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(MAX_JOBS),
    }
}

impl Scanner {
    pub fn new(jobs: Option<usize>, extractors: ExtractorSet) -> Result<Self, ScanError> {
        let threads = worker_count(jobs);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("crosswind-scan-{}", i))
            .build()
            .map_err(|err| ScanError::Pool(err.to_string()))?;
        debug!(threads, "scan pool started");
        Ok(Self { pool, extractors })
    }

    /// 与 token 解析共用的线程池
    pub fn pool(&self) -> &ThreadPool {
        &self.pool
    }

    /// 从所有文件中抽取 token
    ///
    /// 无法读取的文件和二进制文件记为警告。每个文件开始前检查取消；
    /// 取消后返回 [`ScanError::Cancelled`]，
    /// 且不修改 `cache`。
    pub fn scan(
        &self,
        files: &[PathBuf],
        cache: Option<&mut ScanCache>,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome, ScanError> {
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let snapshot = cache.as_deref();
        let results: Vec<FileResult> = self.pool.install(|| {
            files
                .par_iter()
                .map(|path| self.scan_file(path, snapshot, cancel))
                .collect()
        });

        if cancel.is_cancelled() || results.iter().any(|r| matches!(r, FileResult::Cancelled)) {
            info!("scan cancelled");
            return Err(ScanError::Cancelled);
        }

        let mut outcome = ScanOutcome::default();
        let mut fresh = Vec::new();
        let mut stale = Vec::new();
        for result in results {
            match result {
                FileResult::Extracted {
                    path,
                    hash,
                    tokens,
                    cached,
                } => {
                    outcome.files_scanned += 1;
                    outcome.tokens.extend(tokens.iter().cloned());
                    if cached {
                        outcome.cache_hits += 1;
                    } else {
                        fresh.push((path, CacheEntry { hash, tokens }));
                    }
                }
                FileResult::Skipped { path, warning } => {
                    warn!(path = %warning.path.display(), kind = %warning.kind, "{}", warning.message);
                    outcome.warnings.push(warning);
                    stale.push(path);
                }
                FileResult::Cancelled => {}
            }
        }

        if let Some(cache) = cache {
            for path in &stale {
                cache.entries.remove(path);
            }
            cache.entries.extend(fresh);
            cache.retain_paths(files);
        }

        info!(
            files = outcome.files_scanned,
            tokens = outcome.tokens.len(),
            warnings = outcome.warnings.len(),
            cache_hits = outcome.cache_hits,
            "scan finished"
        );
        Ok(outcome)
    }

    fn scan_file(
        &self,
        path: &Path,
        cache: Option<&ScanCache>,
        cancel: &CancellationToken,
    ) -> FileResult {
        if cancel.is_cancelled() {
            return FileResult::Cancelled;
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                return FileResult::Skipped {
                    path: path.to_path_buf(),
                    warning: ScanWarning::read(path, err.to_string()),
                }
            }
        };

        let hash = blake3::hash(&bytes);
        if let Some(tokens) = cache.and_then(|c| c.lookup(path, &hash)) {
            return FileResult::Extracted {
                path: path.to_path_buf(),
                hash,
                tokens,
                cached: true,
            };
        }

        match self.extractors.extract(path, &bytes) {
            Ok(tokens) => FileResult::Extracted {
                path: path.to_path_buf(),
                hash,
                tokens: Arc::new(tokens),
                cached: false,
            },
            Err(warning) => FileResult::Skipped {
                path: path.to_path_buf(),
                warning,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosswind_core::WarningKind;
    use pretty_assertions::assert_eq;

    fn scanner() -> Scanner {
        Scanner::new(Some(2), ExtractorSet::default()).unwrap()
    }

    fn write(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn sorted(tokens: &BTreeSet<String>) -> Vec<&str> {
        tokens.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_merges_tokens_across_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            write(dir.path(), "a.html", br#"<div class="p-4 flex">"#),
            write(dir.path(), "b.html", br#"<div class="flex sm:p-2">"#),
        ];
        let outcome = scanner().scan(&files, None, &CancellationToken::new()).unwrap();
        assert_eq!(sorted(&outcome.tokens), vec!["class", "div", "flex", "p-4", "sm:p-2"]);
        assert_eq!(outcome.files_scanned, 2);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_binary_and_missing_files_warn() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            write(dir.path(), "logo.png", &[0x89, b'P', b'N', b'G', 0xff, 0xfe]),
            dir.path().join("deleted.html"),
            write(dir.path(), "ok.html", b"flex"),
        ];
        let outcome = scanner().scan(&files, None, &CancellationToken::new()).unwrap();

        assert_eq!(sorted(&outcome.tokens), vec!["flex"]);
        let kinds: Vec<WarningKind> = outcome.warnings.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::Decode, WarningKind::Read]);
        assert_eq!(outcome.files_scanned, 1);
    }

    #[test]
    fn test_cache_hits_and_invalidation() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.html", b"p-4");
        let b = write(dir.path(), "b.html", b"m-2");
        let files = vec![a.clone(), b];
        let scanner = scanner();
        let cancel = CancellationToken::new();
        let mut cache = ScanCache::new();

        let first = scanner.scan(&files, Some(&mut cache), &cancel).unwrap();
        assert_eq!(first.cache_hits, 0);
        assert_eq!(cache.len(), 2);

        let second = scanner.scan(&files, Some(&mut cache), &cancel).unwrap();
        assert_eq!(second.cache_hits, 2);
        assert_eq!(second.tokens, first.tokens);

        fs::write(&a, b"p-8").unwrap();
        let third = scanner.scan(&files, Some(&mut cache), &cancel).unwrap();
        assert_eq!(third.cache_hits, 1);
        assert_eq!(sorted(&third.tokens), vec!["m-2", "p-8"]);

        let uncached = scanner.scan(&files, None, &cancel).unwrap();
        assert_eq!(uncached.tokens, third.tokens);
    }

    #[test]
    fn test_cache_forgets_removed_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.html", b"p-4");
        let b = write(dir.path(), "b.html", b"m-2");
        let scanner = scanner();
        let cancel = CancellationToken::new();
        let mut cache = ScanCache::new();

        scanner.scan(&[a.clone(), b], Some(&mut cache), &cancel).unwrap();
        scanner.scan(&[a], Some(&mut cache), &cancel).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cancelled_scan() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![write(dir.path(), "a.html", b"p-4")];
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut cache = ScanCache::new();

        let err = scanner().scan(&files, Some(&mut cache), &cancel).unwrap_err();
        assert!(matches!(err, ScanError::Cancelled));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_worker_count() {
        assert_eq!(worker_count(Some(3)), 3);
        let auto = worker_count(None);
        assert!(auto >= 1 && auto <= MAX_JOBS);
        assert_eq!(worker_count(Some(0)), auto);
    }
}
