pub mod error;
pub mod fs;
pub mod options;
pub mod tpl;
pub mod value;

pub use error::{FrameKind, OpenFrame, TemplateError, ValueError};
pub use jtpl_macros::embed_templates;
pub use options::CacheOptions;
pub use tpl::{Engine, FileTemplateCache, Template, TemplateCache};
pub use value::{Value, to_value};
