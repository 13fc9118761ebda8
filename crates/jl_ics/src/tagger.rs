// crates/jl_ics/src/tagger.rs

//! 边界角色标记
//!
//! 粒子编号同时携带边界角色：
//!
//! ```text
//! id = base_index + offset(role)
//! ```
//!
//! `base_index` 为组装顺序中的 1 起下标，角色偏移以 [`ROLE_SPACING`] 为间隔。
//! 求解器只依据编号所在的千万区间判断角色，因此单元数必须小于间隔。

use std::collections::HashMap;

use jl_foundation::{JlError, JlResult};

use crate::assembler::CellSet;
use crate::classifier::Region;

/// 角色编号间隔
pub const ROLE_SPACING: i64 = 10_000_000;

// ============================================================
// 边界角色
// ============================================================

/// 边界角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum BoundaryRole {
    /// 普通流体
    None = 0,
    /// 流体侧反射
    ReflectiveFluid = 1,
    /// 粘附
    Sticky = 2,
    /// 次级流体侧反射
    ReflectiveFluidSecondary = 3,
    /// 固体侧反射（出流）
    ReflectiveSolid = 4,
}

impl BoundaryRole {
    /// 全部角色，按偏移升序
    pub const ALL: [BoundaryRole; 5] = [
        Self::None,
        Self::ReflectiveFluid,
        Self::Sticky,
        Self::ReflectiveFluidSecondary,
        Self::ReflectiveSolid,
    ];

    /// 编号偏移
    #[inline]
    pub fn offset(self) -> i64 {
        self as i64 * ROLE_SPACING
    }

    /// 区域对应的角色
    pub fn from_region(region: Region) -> Self {
        match region {
            Region::Background => Self::None,
            Region::EdgeReflective | Region::CollarFluid => Self::ReflectiveFluid,
            Region::EdgeSticky => Self::Sticky,
            Region::CollarFluidSecondary => Self::ReflectiveFluidSecondary,
            Region::CollarOutflow | Region::ObstacleInterior => Self::ReflectiveSolid,
        }
    }

    /// 由编号还原角色
    pub fn from_identifier(id: i64) -> Option<Self> {
        if id <= 0 {
            return None;
        }
        Self::ALL.get((id / ROLE_SPACING) as usize).copied()
    }

    /// 名称
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ReflectiveFluid => "reflective_fluid",
            Self::Sticky => "sticky",
            Self::ReflectiveFluidSecondary => "reflective_fluid_secondary",
            Self::ReflectiveSolid => "reflective_solid",
        }
    }
}

impl std::fmt::Display for BoundaryRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================
// 标签与数据集
// ============================================================

/// 单元标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    /// 1 起下标
    pub base_index: u32,
    /// 边界角色
    pub role: BoundaryRole,
}

impl Tag {
    /// 编号
    #[inline]
    pub fn identifier(&self) -> i64 {
        self.base_index as i64 + self.role.offset()
    }
}

/// 已标记的数据集
#[derive(Debug, Clone)]
pub struct TaggedDataset {
    cells: CellSet,
    tags: Vec<Tag>,
}

impl TaggedDataset {
    /// 单元集合
    pub fn cells(&self) -> &CellSet {
        &self.cells
    }

    /// 标签
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// 单元数
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// 快照中写出的 32 位编号
    ///
    /// 标记时已保证编号小于 `5 * ROLE_SPACING`，不会溢出。
    pub fn identifiers(&self) -> Vec<i32> {
        self.tags.iter().map(|t| t.identifier() as i32).collect()
    }

    /// 各角色单元数，按偏移升序
    pub fn role_histogram(&self) -> Vec<(BoundaryRole, usize)> {
        let mut counts = [0usize; BoundaryRole::ALL.len()];
        for tag in &self.tags {
            counts[tag.role as usize] += 1;
        }
        BoundaryRole::ALL.into_iter().zip(counts).collect()
    }
}

// ============================================================
// 标记器
// ============================================================

/// 边界标记器
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryTagger;

impl BoundaryTagger {
    /// 按组装顺序为每个单元分配编号
    pub fn tag(&self, cells: CellSet) -> JlResult<TaggedDataset> {
        let n = cells.len();
        check_capacity(n)?;

        let tags: Vec<Tag> = cells
            .regions()
            .iter()
            .enumerate()
            .map(|(i, &region)| Tag {
                base_index: (i + 1) as u32,
                role: BoundaryRole::from_region(region),
            })
            .collect();

        check_unique(&tags)?;
        Ok(TaggedDataset { cells, tags })
    }
}

/// 编号两两不同，报告首个重复的两个位置
fn check_unique(tags: &[Tag]) -> JlResult<()> {
    let mut seen: HashMap<i64, usize> = HashMap::with_capacity(tags.len());
    for (i, tag) in tags.iter().enumerate() {
        if let Some(first) = seen.insert(tag.identifier(), i) {
            return Err(JlError::identifier_collision(tag.identifier(), first, i));
        }
    }
    Ok(())
}

/// 单元数必须小于角色间隔
fn check_capacity(n: usize) -> JlResult<()> {
    let capacity = (ROLE_SPACING - 1) as usize;
    if n > capacity {
        return Err(JlError::identifier_range_exhausted(n, capacity));
    }
    Ok(())
}
