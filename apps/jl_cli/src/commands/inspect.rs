// apps/jl_cli/src/commands/inspect.rs

//! 快照检查命令
//!
//! 读回快照并打印头部摘要与角色分布。快照本身不记录浮点宽度与标量块顺序，
//! 需由参数或配置文件给出。

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use jl_config::{IcConfig, Precision, ScalarBlock};
use jl_io::GadgetReader;
use tracing::{info, warn};

/// 检查参数
#[derive(Args)]
pub struct InspectArgs {
    /// 快照文件路径
    #[arg(short, long)]
    pub snapshot: PathBuf,

    /// 生成该快照的配置文件（提供精度与标量块顺序）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 浮点精度 (f32, f64)
    #[arg(long)]
    pub precision: Option<Precision>,

    /// 标量块顺序，逗号分隔
    #[arg(long, value_delimiter = ',')]
    pub scalars: Option<Vec<ScalarBlock>>,
}

/// 执行检查命令
pub fn execute(args: InspectArgs) -> Result<()> {
    info!("=== Jelly 快照检查 ===");

    let base = match &args.config {
        Some(path) => IcConfig::from_file(path)
            .with_context(|| format!("无法加载配置文件: {}", path.display()))?,
        None => IcConfig::default(),
    };
    let precision = args.precision.unwrap_or(base.precision);
    let scalars = args.scalars.unwrap_or(base.scalar_blocks);

    let contents = GadgetReader::new(precision, scalars)
        .read(&args.snapshot)
        .with_context(|| format!("无法读取快照: {}", args.snapshot.display()))?;

    let header = &contents.header;
    println!("快照: {}", args.snapshot.display());
    println!("  粒子数: {}", contents.n_particles());
    println!("  BoxSize: {}", header.box_size);
    println!("  time = {}, redshift = {}", header.time, header.redshift);
    let blocks: Vec<&str> = contents.scalars.iter().map(|(b, _)| b.name()).collect();
    println!("  标量块: {} ({})", blocks.join(", "), precision);

    let (histogram, unknown) = contents.role_histogram();
    super::print_role_histogram(&histogram);
    if unknown > 0 {
        warn!("{} 个编号不在任何角色区间内", unknown);
    }

    Ok(())
}
