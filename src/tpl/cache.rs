use crate::error::TemplateError;
use crate::fs::{FileSystem, LocalFs};
use crate::options::CacheOptions;
use crate::tpl::template::Template;
use anyhow::Context;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Source of shared, already parsed templates.
///
/// Repeated lookups of the same resolved path must return the same `Arc` until the entry is
/// dropped or reloaded.
pub trait TemplateCache: Send + Sync {
    fn get_template(&self, path: &Path) -> Result<Arc<Template>, TemplateError>;
}

/// 缓存模板 AST，按解析后的路径存放
pub struct FileTemplateCache {
    fs: Arc<dyn FileSystem>,
    options: CacheOptions,
    templates: DashMap<PathBuf, Arc<Template>>,
}

impl FileTemplateCache {
    pub fn new(options: CacheOptions) -> Self {
        Self::with_fs(Arc::new(LocalFs), options)
    }

    pub fn with_fs(fs: Arc<dyn FileSystem>, options: CacheOptions) -> Self {
        Self {
            fs,
            options,
            templates: DashMap::new(),
        }
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// Absolute paths must exist as given; relative ones are tried in each search path.
    pub fn resolve(&self, path: &Path) -> Result<PathBuf, TemplateError> {
        if path.is_absolute() {
            if self.fs.exists(path) {
                return Ok(path.to_path_buf());
            }
        } else {
            for dir in &self.options.search_paths {
                let candidate = dir.join(path);
                if self.fs.exists(&candidate) {
                    return Ok(candidate);
                }
            }
        }
        Err(TemplateError::TemplateNotFound(path.to_path_buf()))
    }

    /// 预加载目录下所有匹配扩展名的模板
    pub fn preload(&self, dir: &Path) -> anyhow::Result<usize> {
        let files = self
            .fs
            .list(dir)
            .with_context(|| format!("failed to list templates in {}", dir.display()))?;
        let mut loaded = 0;
        for path in files {
            if path.extension().is_none_or(|ext| ext != self.options.extension.as_str()) {
                continue;
            }
            let template = Template::from_path(&path, self.fs.as_ref())
                .with_context(|| format!("failed to preload {}", path.display()))?;
            self.templates.insert(path, Arc::new(template));
            loaded += 1;
        }
        debug!("preloaded templates: dir={}, count={}", dir.display(), loaded);
        Ok(loaded)
    }

    /// 移除 `path` 对应的缓存（路径解析同 [`TemplateCache::get_template`]）
    pub fn evict(&self, path: &Path) -> bool {
        match self.resolve(path) {
            Ok(resolved) => self.templates.remove(&resolved).is_some(),
            Err(_) => self.templates.remove(path).is_some(),
        }
    }

    pub fn clear(&self) {
        self.templates.clear();
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn is_stale(&self, path: &Path, template: &Template) -> bool {
        if !self.options.check_modified {
            return false;
        }
        match self.fs.modified(path) {
            Ok(Some(modified)) => modified > template.parsed_at(),
            _ => false,
        }
    }
}

impl TemplateCache for FileTemplateCache {
    fn get_template(&self, path: &Path) -> Result<Arc<Template>, TemplateError> {
        let resolved = self.resolve(path)?;

        let cached = self.templates.get(&resolved).map(|t| t.value().clone());
        if let Some(template) = cached {
            if !self.is_stale(&resolved, &template) {
                debug!("template cache hit: path={}", resolved.display());
                return Ok(template);
            }
            debug!("template changed on disk, reloading: path={}", resolved.display());
            let fresh = Arc::new(Template::from_path(&resolved, self.fs.as_ref())?);
            self.templates.insert(resolved, fresh.clone());
            return Ok(fresh);
        }

        debug!("template cache miss: path={}", resolved.display());
        let parsed = Arc::new(Template::from_path(&resolved, self.fs.as_ref())?);
        // Another thread may have parsed the same file meanwhile; whoever inserted first wins.
        let entry = self.templates.entry(resolved).or_insert(parsed);
        Ok(entry.value().clone())
    }
}
