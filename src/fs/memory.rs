use crate::fs::FileSystem;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
struct MemoryFile {
    content: String,
    modified: DateTime<Utc>,
}

/// 内存文件系统，用于内嵌模板和测试
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: DashMap<PathBuf, MemoryFile>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(path, content)` pairs, e.g. the output of `embed_templates!`.
    pub fn from_assets(assets: &[(&str, &str)]) -> Self {
        let fs = Self::new();
        for (path, content) in assets {
            fs.insert(*path, *content);
        }
        fs
    }

    /// 添加或替换文件，修改时间取当前时间
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.insert_at(path, content, Utc::now());
    }

    /// Add or replace a file with an explicit modification time.
    pub fn insert_at(
        &self,
        path: impl Into<PathBuf>,
        content: impl Into<String>,
        modified: DateTime<Utc>,
    ) {
        self.files.insert(
            path.into(),
            MemoryFile {
                content: content.into(),
                modified,
            },
        );
    }

    pub fn remove(&self, path: &Path) {
        self.files.remove(path);
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file: {}", path.display()),
    )
}

impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .map(|f| f.content.clone())
            .ok_or_else(|| not_found(path))
    }

    fn modified(&self, path: &Path) -> io::Result<Option<DateTime<Utc>>> {
        self.files
            .get(path)
            .map(|f| Some(f.modified))
            .ok_or_else(|| not_found(path))
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = self
            .files
            .iter()
            .filter(|entry| entry.key().starts_with(dir))
            .map(|entry| entry.key().clone())
            .collect();
        files.sort();
        Ok(files)
    }
}
