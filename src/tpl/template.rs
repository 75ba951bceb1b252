use crate::error::TemplateError;
use crate::fs::{FileSystem, LocalFs};
use crate::tpl::ast::Node;
use crate::tpl::engine::Engine;
use crate::tpl::parser::parse_template;
use crate::tpl::render;
use crate::tpl::render_context::Context;
use crate::value::Value;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// A parsed template. Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Template {
    root: Node,
    path: Option<PathBuf>,
    parsed_at: DateTime<Utc>,
}

impl Template {
    /// Parse template source that has no file of its own.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        Self::parse_with(source, None, &LocalFs)
    }

    /// Parse `source` as the content of `path`; relative includes are resolved through `fs`
    /// against the directory of `path`.
    pub fn parse_with(
        source: &str,
        path: Option<&Path>,
        fs: &dyn FileSystem,
    ) -> Result<Self, TemplateError> {
        let parsed_at = Utc::now();
        let start = Instant::now();
        let root = parse_template(source, path, fs)?;
        debug!(
            "template parsed: path={:?}, nodes={}, elapsed_us={}",
            path,
            root.children().len(),
            start.elapsed().as_micros()
        );
        Ok(Self {
            root,
            path: path.map(Path::to_path_buf),
            parsed_at,
        })
    }

    /// 读取并解析模板文件
    pub fn from_path(path: &Path, fs: &dyn FileSystem) -> Result<Self, TemplateError> {
        if !fs.exists(path) {
            return Err(TemplateError::TemplateNotFound(path.to_path_buf()));
        }
        let source = fs.read_to_string(path)?;
        Self::parse_with(&source, Some(path), fs)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 开始解析的时间
    pub fn parsed_at(&self) -> DateTime<Utc> {
        self.parsed_at
    }

    /// 使用默认引擎渲染（本地文件系统，无缓存）
    pub fn render(&self, data: &mut Value, out: &mut dyn Write) -> Result<(), TemplateError> {
        self.render_with(&Engine::new(), data, out)
    }

    pub fn render_with(
        &self,
        engine: &Engine,
        data: &mut Value,
        out: &mut dyn Write,
    ) -> Result<(), TemplateError> {
        let mut ctx = Context::new(data);
        render::render(&self.root, &mut ctx, out, engine)
    }

    pub fn render_to_string(&self, data: &mut Value) -> Result<String, TemplateError> {
        self.render_to_string_with(&Engine::new(), data)
    }

    pub fn render_to_string_with(
        &self,
        engine: &Engine,
        data: &mut Value,
    ) -> Result<String, TemplateError> {
        let mut out = Vec::new();
        self.render_with(engine, data, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}
