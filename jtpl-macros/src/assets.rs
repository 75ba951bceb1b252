use glob::glob;
use proc_macro::TokenStream;
use quote::quote;
use std::env;
use std::path::PathBuf;
use syn::{LitStr, parse_macro_input};

pub fn embed_templates_impl(input: TokenStream) -> TokenStream {
    // 1. 解析输入的 glob 模式
    let pattern = parse_macro_input!(input as LitStr);
    let pattern_str = pattern.value();

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => dir,
        Err(_) => {
            return syn::Error::new(pattern.span(), "CARGO_MANIFEST_DIR is not set")
                .to_compile_error()
                .into();
        }
    };
    // 2. 相对 CARGO_MANIFEST_DIR 展开并查找文件
    let full_pattern = PathBuf::from(manifest_dir).join(&pattern_str);
    let full_pattern_str = full_pattern.to_string_lossy();

    let mut files: Vec<String> = match glob(&full_pattern_str) {
        Ok(paths) => paths
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .map(|path| path.to_string_lossy().to_string())
            .collect(),
        Err(e) => {
            return syn::Error::new(pattern.span(), format!("invalid glob pattern: {}", e))
                .to_compile_error()
                .into();
        }
    };
    files.sort();

    // 3. 生成 (路径, 内容) 列表；include_str! 使文件变化时触发重新编译
    let assets = files.iter().map(|f| {
        quote! {
            (#f, include_str!(#f))
        }
    });

    let output = quote! {
        {
            const ASSETS: &[(&str, &str)] = &[
                #(#assets),*
            ];
            ASSETS
        }
    };

    output.into()
}
