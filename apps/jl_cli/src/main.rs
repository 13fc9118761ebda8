// apps/jl_cli/src/main.rs

//! Jelly 命令行界面
//!
//! 为运动网格流体求解器生成 Gadget-2 格式初始条件文件。
//!
//! # 子命令
//!
//! - `generate`: 按配置生成并写出快照
//! - `validate`: 校验配置并试运行采样，不写文件
//! - `inspect`: 读回快照，打印粒子数与角色分布
//! - `defaults`: 打印默认配置

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Jelly 初始条件生成工具
#[derive(Parser)]
#[command(name = "jl_cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Initial-condition generator for moving-mesh hydrodynamics", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 生成初始条件
    Generate(commands::generate::GenerateArgs),
    /// 验证配置
    Validate(commands::validate::ValidateArgs),
    /// 检查快照
    Inspect(commands::inspect::InspectArgs),
    /// 打印默认配置
    Defaults,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Inspect(args) => commands::inspect::execute(args),
        Commands::Defaults => commands::defaults::execute(),
    }
}
