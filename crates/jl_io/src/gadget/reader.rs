// crates/jl_io/src/gadget/reader.rs

//! 快照读取器
//!
//! 文件本身不记录浮点宽度与标量块顺序，读取时需给出与写入一致的设置。
//! 每条记录都会校验首尾标记与载荷长度，文件末尾不允许有多余字节。

use std::path::Path;

use glam::DVec3;
use jl_config::{IcConfig, Precision, ScalarBlock};
use jl_ics::BoundaryRole;
use tracing::debug;

use super::header::{GadgetHeader, HEADER_SIZE};
use super::record::split_record;
use crate::error::{SnapshotError, SnapshotResult};

/// 读出的快照内容
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotContents {
    /// 头部
    pub header: GadgetHeader,
    /// 位置
    pub positions: Vec<DVec3>,
    /// 速度
    pub velocities: Vec<DVec3>,
    /// 编号
    pub identifiers: Vec<i32>,
    /// 标量块，按文件中的顺序
    pub scalars: Vec<(ScalarBlock, Vec<f64>)>,
}

impl SnapshotContents {
    /// 粒子数
    pub fn n_particles(&self) -> usize {
        self.identifiers.len()
    }

    /// 指定标量块
    pub fn scalar(&self, block: ScalarBlock) -> Option<&[f64]> {
        self.scalars
            .iter()
            .find(|(b, _)| *b == block)
            .map(|(_, values)| values.as_slice())
    }

    /// 按编号区间统计各角色粒子数，无法识别的编号计入 `unknown`
    pub fn role_histogram(&self) -> (Vec<(BoundaryRole, usize)>, usize) {
        let mut counts = [0usize; BoundaryRole::ALL.len()];
        let mut unknown = 0;
        for &id in &self.identifiers {
            match BoundaryRole::from_identifier(id as i64) {
                Some(role) => counts[role as usize] += 1,
                None => unknown += 1,
            }
        }
        (BoundaryRole::ALL.into_iter().zip(counts).collect(), unknown)
    }
}

/// Gadget-2 快照读取器
#[derive(Debug, Clone)]
pub struct GadgetReader {
    precision: Precision,
    scalar_blocks: Vec<ScalarBlock>,
}

impl GadgetReader {
    /// 创建读取器
    pub fn new(precision: Precision, scalar_blocks: Vec<ScalarBlock>) -> Self {
        Self {
            precision,
            scalar_blocks,
        }
    }

    /// 使用与生成配置相同的设置
    pub fn from_config(config: &IcConfig) -> Self {
        Self::new(config.precision, config.scalar_blocks.clone())
    }

    /// 读取快照文件
    pub fn read(&self, path: &Path) -> SnapshotResult<SnapshotContents> {
        let bytes = std::fs::read(path).map_err(|e| SnapshotError::io(path, e))?;
        debug!("读取快照 {} ({} 字节)", path.display(), bytes.len());
        self.parse(&bytes)
    }

    /// 解析内存中的快照
    pub fn parse(&self, bytes: &[u8]) -> SnapshotResult<SnapshotContents> {
        let mut input = bytes;

        let raw = split_record(&mut input)?;
        if raw.len() != HEADER_SIZE {
            return Err(SnapshotError::format(format!(
                "头部记录长度 {} 字节, 应为 {HEADER_SIZE}",
                raw.len()
            )));
        }
        let header = GadgetHeader::from_bytes(raw)?;
        let n = header.n_particles();

        let positions = self.vector_block(split_record(&mut input)?, n, "pos")?;
        let velocities = self.vector_block(split_record(&mut input)?, n, "vel")?;

        let raw = split_record(&mut input)?;
        expect_len(raw, n * 4, "id")?;
        let identifiers: Vec<i32> = bytemuck::pod_collect_to_vec(raw);

        let mut scalars = Vec::with_capacity(self.scalar_blocks.len());
        for &block in &self.scalar_blocks {
            let values = self.scalar_block(split_record(&mut input)?, n, block.name())?;
            scalars.push((block, values));
        }

        if !input.is_empty() {
            return Err(SnapshotError::format(format!(
                "快照末尾有 {} 字节未识别数据",
                input.len()
            )));
        }

        Ok(SnapshotContents {
            header,
            positions,
            velocities,
            identifiers,
            scalars,
        })
    }

    fn floats(&self, raw: &[u8], count: usize, name: &str) -> SnapshotResult<Vec<f64>> {
        expect_len(raw, count * self.precision.size_bytes(), name)?;
        Ok(match self.precision {
            Precision::F32 => bytemuck::pod_collect_to_vec::<u8, f32>(raw)
                .into_iter()
                .map(f64::from)
                .collect(),
            Precision::F64 => bytemuck::pod_collect_to_vec::<u8, f64>(raw),
        })
    }

    fn vector_block(&self, raw: &[u8], n: usize, name: &str) -> SnapshotResult<Vec<DVec3>> {
        let flat = self.floats(raw, 3 * n, name)?;
        Ok(flat
            .chunks_exact(3)
            .map(|c| DVec3::new(c[0], c[1], c[2]))
            .collect())
    }

    fn scalar_block(&self, raw: &[u8], n: usize, name: &str) -> SnapshotResult<Vec<f64>> {
        self.floats(raw, n, name)
    }
}

fn expect_len(raw: &[u8], expected: usize, name: &str) -> SnapshotResult<()> {
    if raw.len() != expected {
        return Err(SnapshotError::format(format!(
            "块 {name} 长度 {} 字节, 应为 {expected}",
            raw.len()
        )));
    }
    Ok(())
}
