// apps/jl_cli/src/commands/generate.rs

//! 生成命令
//!
//! 加载配置，运行完整流水线并写出快照。

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use jl_config::IcConfig;
use jl_ics::IcGenerator;
use jl_io::SnapshotWriter;
use tracing::info;

/// 生成参数
#[derive(Args)]
pub struct GenerateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 输出文件路径（覆盖配置中的 output_path）
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// 执行生成命令
pub fn execute(args: GenerateArgs) -> Result<()> {
    info!("=== Jelly 初始条件生成 ===");
    let start = Instant::now();

    let mut config = IcConfig::from_file(&args.config)
        .with_context(|| format!("无法加载配置文件: {}", args.config.display()))?;
    if let Some(output) = args.output {
        config.output_path = output;
    }

    let generator = IcGenerator::new(&config).context("初始化生成器失败")?;
    let dataset = generator.generate().context("生成初始条件失败")?;

    SnapshotWriter::new(&config)
        .write(&dataset, &config.output_path)
        .with_context(|| format!("无法写出快照: {}", config.output_path.display()))?;

    println!("已写出 {} ({} 个单元)", config.output_path.display(), dataset.len());
    super::print_role_histogram(&dataset.role_histogram());
    info!("耗时 {:.3} 秒", start.elapsed().as_secs_f64());

    Ok(())
}
