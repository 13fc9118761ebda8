// crates/jl_ics/src/sampler.rs

//! 几何采样器
//!
//! 生成原始候选采样点：
//!
//! - [`Lattice`]: 覆盖计算域的规则格点（单元中心）
//! - [`PolarGrid`]: 以径向间距 d 排列的同心圆环网格
//! - [`RandomCloud`]: 计算域内由种子确定的均匀随机点
//! - [`Collar`]: 围绕圆形障碍物表面的同心环带
//!
//! 前三者是可互换的体采样方式，由 [`BulkSampler`] 统一调度；环带总是附加在体采样之后。
//!
//! 格点间距由目标分辨率取整得到，保证计算域被整除：
//! `Nx = round(Lx / d)`, `dx = Lx / Nx`。环带角分辨率
//! `Nphi = round(2πR / d)`，第 i 个点位于 `2π(i + 0.5) / Nphi`，
//! 第 k 个环的半径为 `R + k·0.5d`。
//!
//! # 使用示例
//!
//! ```rust
//! use jl_ics::sampler::Lattice;
//!
//! let lattice = Lattice::from_resolution(&[2.0, 1.5], 0.01).unwrap();
//! assert_eq!(lattice.counts(), [200, 150, 1]);
//! assert_eq!(lattice.n_points(), 30_000);
//! ```

use std::f64::consts::PI;

use glam::{DVec2, DVec3};
use jl_config::{IcConfig, SamplingConfig};
use jl_foundation::{JlError, JlResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 采样点来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOrigin {
    /// 规则格点
    Lattice {
        /// 第一轴序号
        column: usize,
        /// 第二轴序号
        row: usize,
        /// 第三轴序号（二维时为 0）
        layer: usize,
    },
    /// 极坐标网格
    Polar {
        /// 圆环序号（由内向外）
        annulus: usize,
        /// 环上角度序号
        index: usize,
    },
    /// 随机点
    Random {
        /// 生成序号
        index: usize,
    },
    /// 障碍物环带
    Collar {
        /// 环序号（按配置的偏移顺序）
        ring: usize,
        /// 环上角度序号
        index: usize,
    },
}

/// 候选采样点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// 位置（二维时 z = 0）
    pub position: DVec3,
    /// 来源
    pub origin: SampleOrigin,
}

// ============================================================
// 规则格点
// ============================================================

/// 规则格点采样器
///
/// 点按第一轴为最外层循环的顺序生成，二维时第三轴只有一层。
#[derive(Debug, Clone)]
pub struct Lattice {
    /// 计算域长度
    extents: DVec3,
    /// 各轴格点数
    counts: [usize; 3],
    /// 各轴间距（二维时 z 为 0）
    spacing: DVec3,
    /// 空间维数
    dims: usize,
}

impl Lattice {
    /// 由目标分辨率创建格点
    ///
    /// # 参数
    ///
    /// - `extents`: 各轴计算域长度（2 或 3 个值）
    /// - `resolution`: 目标单元尺寸 d
    pub fn from_resolution(extents: &[f64], resolution: f64) -> JlResult<Self> {
        JlError::check_positive("resolution", resolution)?;
        let dims = extents.len();
        jl_foundation::ensure!(
            dims == 2 || dims == 3,
            JlError::configuration(format!("计算域必须为二维或三维, 实际 {dims} 维"))
        );

        let mut counts = [1usize; 3];
        let mut lengths = [0.0f64; 3];
        let mut spacing = [0.0f64; 3];
        for (axis, &extent) in extents.iter().enumerate() {
            JlError::check_positive("domain_extents", extent)?;
            let n = (extent / resolution).round();
            jl_foundation::ensure!(
                n >= 1.0,
                JlError::configuration(format!(
                    "分辨率 {resolution} 粗于计算域第 {axis} 轴长度 {extent}, 格点数为 0"
                ))
            );
            counts[axis] = n as usize;
            lengths[axis] = extent;
            spacing[axis] = extent / n;
        }

        Ok(Self {
            extents: DVec3::from_array(lengths),
            counts,
            spacing: DVec3::from_array(spacing),
            dims,
        })
    }

    /// 空间维数
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// 各轴格点数
    pub fn counts(&self) -> [usize; 3] {
        self.counts
    }

    /// 各轴间距
    pub fn spacing(&self) -> DVec3 {
        self.spacing
    }

    /// 计算域长度
    pub fn extents(&self) -> DVec3 {
        self.extents
    }

    /// 格点总数
    pub fn n_points(&self) -> usize {
        self.counts.iter().product()
    }

    /// 格点 (i, j, k) 的单元中心
    #[inline]
    pub fn point(&self, i: usize, j: usize, k: usize) -> DVec3 {
        let centre = DVec3::new(i as f64 + 0.5, j as f64 + 0.5, k as f64 + 0.5);
        centre * self.spacing
    }

    /// 生成全部格点
    pub fn sample(&self) -> Vec<Sample> {
        let [nx, ny, nz] = self.counts;
        let mut samples = Vec::with_capacity(self.n_points());
        for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    samples.push(Sample {
                        position: self.point(i, j, k),
                        origin: SampleOrigin::Lattice { column: i, row: j, layer: k },
                    });
                }
            }
        }
        samples
    }
}

// ============================================================
// 极坐标网格
// ============================================================

/// 极坐标网格采样器
///
/// 第 n 个圆环半径 `a + n·d`，共 `floor((b - a) / d)` 个；环上
/// `floor(2πr / d)` 个点等角排列，首点位于角度 0。点数为 0 的环（如圆心处）跳过。
#[derive(Debug, Clone)]
pub struct PolarGrid {
    center: DVec2,
    radii: Vec<f64>,
    resolution: f64,
}

impl PolarGrid {
    /// 创建极坐标网格，所有圆环必须落在计算域内
    pub fn new(
        center: DVec2,
        inner_radius: f64,
        outer_radius: f64,
        resolution: f64,
        extents: DVec3,
    ) -> JlResult<Self> {
        JlError::check_positive("resolution", resolution)?;
        jl_foundation::ensure!(
            inner_radius >= 0.0 && outer_radius > inner_radius,
            JlError::configuration(format!(
                "极坐标网格半径区间 [{inner_radius}, {outer_radius}) 无效"
            ))
        );

        // 容差避免 (b - a) / d 恰为整数时被舍入误差少算一环
        let n_r = ((outer_radius - inner_radius) / resolution + 1e-9).floor() as usize;
        let radii: Vec<f64> = (0..n_r)
            .map(|n| inner_radius + n as f64 * resolution)
            .collect();

        let domain = extents.truncate();
        if let Some(&r_max) = radii.last() {
            if (center - r_max).cmplt(DVec2::ZERO).any() || (center + r_max).cmpgt(domain).any() {
                return Err(JlError::geometry(format!(
                    "极坐标网格 (圆心 {center}, 最外环半径 {r_max}) 越出计算域 [0, {domain}]"
                )));
            }
        }

        Ok(Self {
            center,
            radii,
            resolution,
        })
    }

    /// 各圆环半径
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    /// 第 `annulus` 个圆环上的点数
    pub fn n_phi(&self, annulus: usize) -> usize {
        (2.0 * PI * self.radii[annulus] / self.resolution).floor() as usize
    }

    /// 网格点总数
    pub fn n_points(&self) -> usize {
        (0..self.radii.len()).map(|a| self.n_phi(a)).sum()
    }

    /// 生成全部点，由内向外逐环排列
    pub fn sample(&self) -> Vec<Sample> {
        let mut samples = Vec::with_capacity(self.n_points());
        for (annulus, &r) in self.radii.iter().enumerate() {
            let n_phi = self.n_phi(annulus);
            for index in 0..n_phi {
                let (sin, cos) = (2.0 * PI * index as f64 / n_phi as f64).sin_cos();
                let p = self.center + r * DVec2::new(cos, sin);
                samples.push(Sample {
                    position: p.extend(0.0),
                    origin: SampleOrigin::Polar { annulus, index },
                });
            }
        }
        samples
    }
}

// ============================================================
// 随机点
// ============================================================

/// 均匀随机采样器，相同种子生成相同点列
#[derive(Debug, Clone)]
pub struct RandomCloud {
    count: usize,
    seed: u64,
    extents: DVec3,
    dims: usize,
}

impl RandomCloud {
    /// 在格点覆盖的计算域内生成 `count` 个点
    pub fn new(count: usize, seed: u64, lattice: &Lattice) -> Self {
        Self {
            count,
            seed,
            extents: lattice.extents(),
            dims: lattice.dims(),
        }
    }

    /// 点数
    pub fn n_points(&self) -> usize {
        self.count
    }

    /// 生成全部点，各分量位于 `[0, L)`
    pub fn sample(&self) -> Vec<Sample> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..self.count)
            .map(|index| {
                let x = rng.gen::<f64>() * self.extents.x;
                let y = rng.gen::<f64>() * self.extents.y;
                let z = if self.dims == 3 { rng.gen::<f64>() * self.extents.z } else { 0.0 };
                Sample {
                    position: DVec3::new(x, y, z),
                    origin: SampleOrigin::Random { index },
                }
            })
            .collect()
    }
}

// ============================================================
// 体采样调度
// ============================================================

/// 体采样方式
#[derive(Debug, Clone)]
pub enum BulkSampler {
    /// 规则格点
    Lattice(Lattice),
    /// 极坐标网格
    Polar(PolarGrid),
    /// 随机点
    Random(RandomCloud),
}

impl BulkSampler {
    /// 按配置选择采样方式，`lattice` 提供计算域与间距
    pub fn from_config(config: &IcConfig, lattice: &Lattice) -> JlResult<Self> {
        Ok(match &config.sampling {
            SamplingConfig::Lattice => Self::Lattice(lattice.clone()),
            SamplingConfig::Polar {
                center,
                inner_radius,
                outer_radius,
            } => Self::Polar(PolarGrid::new(
                *center,
                *inner_radius,
                *outer_radius,
                config.resolution,
                lattice.extents(),
            )?),
            SamplingConfig::MonteCarlo { count, seed } => {
                Self::Random(RandomCloud::new(*count, *seed, lattice))
            }
        })
    }

    /// 名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lattice(_) => "lattice",
            Self::Polar(_) => "polar",
            Self::Random(_) => "monte_carlo",
        }
    }

    /// 候选点总数
    pub fn n_points(&self) -> usize {
        match self {
            Self::Lattice(lattice) => lattice.n_points(),
            Self::Polar(grid) => grid.n_points(),
            Self::Random(cloud) => cloud.n_points(),
        }
    }

    /// 生成全部候选点
    pub fn sample(&self) -> Vec<Sample> {
        match self {
            Self::Lattice(lattice) => lattice.sample(),
            Self::Polar(grid) => grid.sample(),
            Self::Random(cloud) => cloud.sample(),
        }
    }
}

// ============================================================
// 障碍物环带
// ============================================================

/// 障碍物环带采样器
///
/// 每个径向偏移 k 对应一个半径 `R + k·0.5d` 的圆环，默认偏移
/// `{+1.5, +0.5, -0.5, -1.5}` 以亚网格分辨率夹住障碍物表面，
/// 替换体采样点在排除带内被剔除的部分。
#[derive(Debug, Clone)]
pub struct Collar {
    /// 圆心
    center: DVec2,
    /// 障碍物半径
    radius: f64,
    /// 目标分辨率
    resolution: f64,
    /// 径向偏移（以 d 为单位）
    offsets: Vec<f64>,
    /// 角向点数
    n_phi: usize,
}

impl Collar {
    /// 创建环带采样器
    pub fn new(center: DVec2, radius: f64, resolution: f64, offsets: Vec<f64>) -> Self {
        let n_phi = (2.0 * PI * radius / resolution).round().max(0.0) as usize;
        Self {
            center,
            radius,
            resolution,
            offsets,
            n_phi,
        }
    }

    /// 圆心
    pub fn center(&self) -> DVec2 {
        self.center
    }

    /// 障碍物半径
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// 角向点数
    pub fn n_phi(&self) -> usize {
        self.n_phi
    }

    /// 障碍物相对分辨率过小，无法生成环带
    pub fn is_degenerate(&self) -> bool {
        self.n_phi == 0
    }

    /// 环数
    pub fn n_rings(&self) -> usize {
        self.offsets.len()
    }

    /// 各环径向偏移
    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    /// 第 `ring` 个环的半径
    pub fn ring_radius(&self, ring: usize) -> f64 {
        self.radius + self.offsets[ring] * 0.5 * self.resolution
    }

    /// 最内环半径
    pub fn innermost_radius(&self) -> f64 {
        (0..self.n_rings())
            .map(|ring| self.ring_radius(ring))
            .fold(f64::INFINITY, f64::min)
    }

    /// 排除带半宽（距表面），至少为 2d，偏移更宽时覆盖最外环外半个单元
    pub fn half_width(&self) -> f64 {
        let widest = self.offsets.iter().fold(0.0f64, |acc, k| acc.max(k.abs()));
        (0.5 * widest + 0.5).max(2.0) * self.resolution
    }

    /// 环带点总数
    pub fn n_points(&self) -> usize {
        self.n_phi * self.n_rings()
    }

    /// 第 i 个点的角度
    #[inline]
    pub fn angle(&self, index: usize) -> f64 {
        2.0 * PI * (index as f64 + 0.5) / self.n_phi as f64
    }

    /// 生成全部环带点，逐环按偏移顺序排列
    pub fn sample(&self) -> Vec<Sample> {
        let mut samples = Vec::with_capacity(self.n_points());
        for ring in 0..self.n_rings() {
            let r = self.ring_radius(ring);
            for index in 0..self.n_phi {
                let (sin, cos) = self.angle(index).sin_cos();
                let p = self.center + r * DVec2::new(cos, sin);
                samples.push(Sample {
                    position: p.extend(0.0),
                    origin: SampleOrigin::Collar { ring, index },
                });
            }
        }
        samples
    }
}
