use crate::error::TemplateError;
use crate::fs::{FileSystem, LocalFs};
use crate::tpl::cache::TemplateCache;
use crate::tpl::template::Template;
use crate::value::{Value, to_value};
use dashmap::DashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
struct InlineTemplate {
    template: Arc<Template>,
    content_hash: u64,
}

/// 模板引擎：文件系统加可选的模板缓存
///
/// 未配置缓存时，每次渲染都会重新读取并解析 include 的模板
pub struct Engine {
    fs: Arc<dyn FileSystem>,
    cache: Option<Arc<dyn TemplateCache>>,
    inline: DashMap<String, InlineTemplate>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            fs: Arc::new(LocalFs),
            cache: None,
            inline: DashMap::new(),
        }
    }

    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn TemplateCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// 加载模板：有缓存走缓存，否则重新解析
    pub fn load(&self, path: &Path) -> Result<Arc<Template>, TemplateError> {
        match &self.cache {
            Some(cache) => cache.get_template(path),
            None => Template::from_path(path, self.fs.as_ref()).map(Arc::new),
        }
    }

    /// 渲染模板文件
    pub fn render_file<T: serde::Serialize>(
        &self,
        path: &Path,
        data: &T,
    ) -> Result<String, TemplateError> {
        let template = self.load(path)?;
        let mut value = to_value(data)?;
        template.render_to_string_with(self, &mut value)
    }

    /// 渲染内联模板
    ///
    /// 按名称缓存解析结果，内容变化时重新解析
    pub fn render_str<T: serde::Serialize>(
        &self,
        name: &str,
        content: &str,
        data: &T,
    ) -> Result<String, TemplateError> {
        let template = self.inline_template(name, content)?;
        let mut value = to_value(data)?;
        template.render_to_string_with(self, &mut value)
    }

    /// 同 [`Engine::render_str`]，数据已经是 [`Value`]
    pub fn render_value(
        &self,
        name: &str,
        content: &str,
        data: &mut Value,
    ) -> Result<String, TemplateError> {
        self.inline_template(name, content)?
            .render_to_string_with(self, data)
    }

    /// 卸载内联模板缓存
    pub fn remove_template(&self, name: &str) {
        self.inline.remove(name);
    }

    fn inline_template(&self, name: &str, content: &str) -> Result<Arc<Template>, TemplateError> {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        let new_hash = hasher.finish();

        if let Some(cached) = self.inline.get(name) {
            if cached.content_hash == new_hash {
                return Ok(cached.template.clone());
            }
        }

        debug!("parsing inline template: name={}", name);
        let template = Arc::new(Template::parse_with(content, None, self.fs.as_ref())?);
        self.inline.insert(
            name.to_string(),
            InlineTemplate {
                template: template.clone(),
                content_hash: new_hash,
            },
        );
        Ok(template)
    }
}
