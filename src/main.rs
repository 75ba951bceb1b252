use anyhow::Context;
use clap::Parser;
use jtpl::{Engine, Value};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

/// 用 JSON 数据渲染模板文件，结果写到标准输出
#[derive(Debug, Parser)]
#[command(name = "jtpl", version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// 要渲染的模板文件
    template: PathBuf,

    /// JSON 数据文件，省略时使用空记录
    data: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut data = match &args.data {
        Some(data_path) => {
            let json = std::fs::read_to_string(data_path)
                .with_context(|| format!("failed to read data file {}", data_path.display()))?;
            Value::from_json(&json)
                .with_context(|| format!("failed to parse {}", data_path.display()))?
        }
        None => Value::record(),
    };

    let engine = Engine::new();
    let template = engine
        .load(&args.template)
        .with_context(|| format!("failed to load template {}", args.template.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    template.render_with(&engine, &mut data, &mut out)?;
    out.flush()?;
    Ok(())
}
