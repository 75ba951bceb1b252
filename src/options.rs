use std::path::PathBuf;

/// [`FileTemplateCache`](crate::tpl::FileTemplateCache) 配置
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// 相对路径的查找目录，按顺序取第一个命中
    pub search_paths: Vec<PathBuf>,
    /// Re-parse a cached template when its file changed after it was parsed.
    pub check_modified: bool,
    /// `preload` 加载的文件扩展名（不含点）
    pub extension: String,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheOptions {
    pub fn new() -> Self {
        CacheOptions {
            search_paths: Vec::new(),
            check_modified: true,
            extension: "tpl".to_string(),
        }
    }

    pub fn search_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_paths.push(dir.into());
        self
    }

    pub fn check_modified(mut self, check_modified: bool) -> Self {
        self.check_modified = check_modified;
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}
