// crates/jl_io/src/gadget/writer.rs

//! 快照写入器
//!
//! 记录顺序：头部 -> 位置 -> 速度 -> 编号 -> 标量块（按配置顺序）。
//! 浮点块宽度由 [`Precision`] 决定，二维时位置与速度的 z 分量为 0。
//!
//! 文件先写到同目录的 `<name>.tmp`，成功后重命名为目标路径；
//! 任一步失败都会删除临时文件。输出不含时间戳，相同输入得到相同字节。

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use jl_config::{IcConfig, Precision, ScalarBlock};
use jl_ics::TaggedDataset;
use tracing::{debug, info};

use super::header::{GadgetHeader, HEADER_SIZE};
use super::record::append_record;
use crate::error::{SnapshotError, SnapshotResult};

/// 快照写入器
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    header: GadgetHeader,
    precision: Precision,
    scalar_blocks: Vec<ScalarBlock>,
}

impl SnapshotWriter {
    /// 由配置创建
    pub fn new(config: &IcConfig) -> Self {
        Self {
            header: GadgetHeader::from_config(config),
            precision: config.precision,
            scalar_blocks: config.scalar_blocks.clone(),
        }
    }

    /// 编码为完整快照字节
    pub fn encode(&self, dataset: &TaggedDataset) -> SnapshotResult<Vec<u8>> {
        if dataset.is_empty() {
            return Err(SnapshotError::format("数据集为空, 拒绝写出快照"));
        }
        let cells = dataset.cells();
        let n = dataset.len();

        let mut header = self.header.clone();
        header.set_gas_count(n)?;

        let float = self.precision.size_bytes();
        let per_particle = 6 * float + 4 + self.scalar_blocks.len() * float;
        let mut out = Vec::with_capacity(HEADER_SIZE + n * per_particle + 8 * (4 + self.scalar_blocks.len()));

        append_record(&mut out, &header.to_bytes(), Some(HEADER_SIZE))?;

        let positions = cells.positions().iter().flat_map(|p| p.to_array());
        append_record(&mut out, &self.float_block(positions), None)?;

        let velocities = cells.velocities().iter().flat_map(|v| v.to_array());
        append_record(&mut out, &self.float_block(velocities), None)?;

        let ids = dataset.identifiers();
        append_record(&mut out, bytemuck::cast_slice(&ids), None)?;

        for block in &self.scalar_blocks {
            let values = match block {
                ScalarBlock::Density => cells.densities(),
                ScalarBlock::InternalEnergy => cells.specific_energies(),
            };
            append_record(&mut out, &self.float_block(values.iter().copied()), None)?;
            debug!("标量块 {}: {} 个值", block, values.len());
        }

        Ok(out)
    }

    /// 写出快照文件
    pub fn write(&self, dataset: &TaggedDataset, path: &Path) -> SnapshotResult<()> {
        let bytes = self.encode(dataset)?;
        let temp_path = temp_path(path)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SnapshotError::io(parent, e))?;
        }

        if let Err(e) = write_file(&temp_path, &bytes) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(SnapshotError::io(path, e));
        }

        info!(
            "快照已写出: {} ({} 个粒子, {} 字节, {})",
            path.display(),
            dataset.len(),
            bytes.len(),
            self.precision
        );
        Ok(())
    }

    fn float_block(&self, values: impl Iterator<Item = f64>) -> Vec<u8> {
        match self.precision {
            Precision::F32 => {
                let data: Vec<f32> = values.map(|v| v as f32).collect();
                bytemuck::cast_slice(&data).to_vec()
            }
            Precision::F64 => {
                let data: Vec<f64> = values.collect();
                bytemuck::cast_slice(&data).to_vec()
            }
        }
    }
}

/// 目标文件同目录下的临时路径
fn temp_path(path: &Path) -> SnapshotResult<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| SnapshotError::format(format!("输出路径 {} 缺少文件名", path.display())))?;
    let mut temp = name.to_os_string();
    temp.push(".tmp");
    Ok(path.with_file_name(temp))
}

fn write_file(path: &Path, bytes: &[u8]) -> SnapshotResult<()> {
    let file = File::create(path).map_err(|e| SnapshotError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes).map_err(|e| SnapshotError::io(path, e))?;
    writer.flush().map_err(|e| SnapshotError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jl_ics::IcGenerator;

    fn small_config() -> IcConfig {
        IcConfig {
            resolution: 0.25,
            domain_extents: vec![1.0, 1.0],
            ..IcConfig::default()
        }
    }

    #[test]
    fn test_block_sizes_f32() {
        let config = small_config();
        let dataset = IcGenerator::new(&config).unwrap().generate().unwrap();
        let bytes = SnapshotWriter::new(&config).encode(&dataset).unwrap();

        // 头部 + 位置 + 速度 + 编号 + 两个标量块
        let n = 16;
        let expected = (256 + 8) + 2 * (n * 12 + 8) + (n * 4 + 8) + 2 * (n * 4 + 8);
        assert_eq!(bytes.len(), expected);
    }

    #[test]
    fn test_block_sizes_f64_single_scalar() {
        let mut config = small_config();
        config.precision = Precision::F64;
        config.scalar_blocks = vec![ScalarBlock::InternalEnergy];
        let dataset = IcGenerator::new(&config).unwrap().generate().unwrap();
        let bytes = SnapshotWriter::new(&config).encode(&dataset).unwrap();

        let n = 16;
        let expected = (256 + 8) + 2 * (n * 24 + 8) + (n * 4 + 8) + (n * 8 + 8);
        assert_eq!(bytes.len(), expected);
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let temp = temp_path(Path::new("out/ics.dat")).unwrap();
        assert_eq!(temp, PathBuf::from("out/ics.dat.tmp"));
        assert!(temp_path(Path::new("/")).is_err());
    }
}
