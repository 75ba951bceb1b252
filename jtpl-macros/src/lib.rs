use proc_macro::TokenStream;

mod assets;

/// Embed every file matching a glob (relative to the crate root) into the binary.
///
/// Expands to a `&'static [(&'static str, &'static str)]` of absolute path and content,
/// ready for `jtpl::fs::MemoryFs::from_assets`.
///
/// ```rust,ignore
/// let fs = jtpl::fs::MemoryFs::from_assets(jtpl::embed_templates!("templates/**/*.tpl"));
/// ```
#[proc_macro]
pub fn embed_templates(input: TokenStream) -> TokenStream {
    assets::embed_templates_impl(input)
}
