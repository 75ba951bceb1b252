//! Template compilation and rendering.
//!
//! Templates are text with embedded `<? ... ?>` directives:
//!
//! ```text
//! <? if user.admin ?>Admin<? elsif user.name ?><?= user.name ?><? else ?>Guest<? endif ?>
//! <? for item order.items ?>- <?= item.sku ?>
//! <? endfor ?>
//! <? include "footer.tpl" ?>
//! ```

pub mod ast;
mod cache;
mod engine;
mod parser;
mod render;
mod render_context;
mod scanner;
mod template;

pub use ast::{Branch, Guard, Node};
pub use cache::{FileTemplateCache, TemplateCache};
pub use engine::Engine;
pub use render_context::Context;
pub use template::Template;
