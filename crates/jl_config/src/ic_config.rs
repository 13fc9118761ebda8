// crates/jl_config/src/ic_config.rs

//! IcConfig - 初始条件生成配置
//!
//! 所有数值使用 f64 存储，JSON 序列化。几何一致性（排除带与计算域的关系、
//! 障碍物是否越界）依赖分辨率取整后的网格，由 `jl_ics` 在构建分类器时检查；
//! 这里只做与网格无关的参数校验。

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::precision::Precision;
use crate::scalar_block::ScalarBlock;

/// 初始条件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcConfig {
    /// 目标单元尺寸 d
    #[serde(default = "default_resolution")]
    pub resolution: f64,

    /// 计算域各轴长度（2 或 3 个值），原点固定在 0
    #[serde(default = "default_extents")]
    pub domain_extents: Vec<f64>,

    /// 体采样方式
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// 圆形障碍物（出流源）
    #[serde(default)]
    pub obstacle: Option<ObstacleConfig>,

    /// 流动区域预设
    #[serde(default)]
    pub regions: RegionPresets,

    /// 计算域边界层
    #[serde(default)]
    pub edge_layers: Option<EdgeLayerConfig>,

    /// 半格错位扰动
    #[serde(default)]
    pub jitter: Option<JitterConfig>,

    /// 标识符块之后的标量块顺序
    #[serde(default = "ScalarBlock::default_order")]
    pub scalar_blocks: Vec<ScalarBlock>,

    /// 浮点块精度
    #[serde(default)]
    pub precision: Precision,

    /// 快照头部参数
    #[serde(default)]
    pub header: HeaderConfig,

    /// 输出文件路径
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

fn default_resolution() -> f64 { 1.0 / 32.0 }
fn default_extents() -> Vec<f64> { vec![1.0, 1.0] }
fn default_output_path() -> PathBuf { PathBuf::from("ics.dat") }

impl Default for IcConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            domain_extents: default_extents(),
            sampling: SamplingConfig::default(),
            obstacle: None,
            regions: RegionPresets::default(),
            edge_layers: None,
            jitter: None,
            scalar_blocks: ScalarBlock::default_order(),
            precision: Precision::default(),
            header: HeaderConfig::default(),
            output_path: default_output_path(),
        }
    }
}

/// 体采样方式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SamplingConfig {
    /// 覆盖计算域的规则格点
    #[default]
    Lattice,
    /// 同心圆环网格，径向间距为 d，仅二维
    Polar {
        /// 圆心
        center: DVec2,
        /// 内半径（含）
        inner_radius: f64,
        /// 外半径
        outer_radius: f64,
    },
    /// 计算域内均匀随机点，由种子确定
    MonteCarlo {
        /// 点数
        count: usize,
        /// 随机种子
        #[serde(default)]
        seed: u64,
    },
}

/// 圆形障碍物
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleConfig {
    /// 圆心
    pub center: DVec2,
    /// 半径
    pub radius: f64,
    /// 环带径向偏移（以 d/2 为单位，环半径 R + k·0.5d），按给定顺序生成
    #[serde(default = "default_ring_offsets")]
    pub ring_offsets: Vec<f64>,
    /// 反转：圆外为固体，流体在圆内
    #[serde(default)]
    pub inverted: bool,
}

fn default_ring_offsets() -> Vec<f64> { vec![1.5, 0.5, -0.5, -1.5] }

impl ObstacleConfig {
    /// 使用默认环带偏移创建
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self {
            center,
            radius,
            ring_offsets: default_ring_offsets(),
            inverted: false,
        }
    }
}

/// 单个区域的物理状态
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowPreset {
    /// 速度 [vx, vy, vz]
    #[serde(default)]
    pub velocity: DVec3,
    /// 密度
    #[serde(default = "default_unit")]
    pub density: f64,
    /// 比内能
    #[serde(default = "default_unit")]
    pub specific_energy: f64,
}

fn default_unit() -> f64 { 1.0 }

impl Default for FlowPreset {
    fn default() -> Self {
        Self {
            velocity: DVec3::ZERO,
            density: 1.0,
            specific_energy: 1.0,
        }
    }
}

impl FlowPreset {
    /// 创建预设
    pub fn new(velocity: DVec3, density: f64, specific_energy: f64) -> Self {
        Self { velocity, density, specific_energy }
    }
}

/// 命名预设表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionPresets {
    /// 背景流体
    #[serde(default)]
    pub background: FlowPreset,
    /// 障碍物出流
    #[serde(default)]
    pub outflow: FlowPreset,
}

/// 坐标轴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// x 轴
    #[default]
    X,
    /// y 轴
    Y,
    /// z 轴
    Z,
}

impl Axis {
    /// 轴序号
    pub fn index(&self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// 计算域边界层：沿某一轴两端各两层单元
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeLayerConfig {
    /// 边界层法向
    #[serde(default)]
    pub axis: Axis,
}

/// 半格错位扰动：指定网格列带沿第二轴平移
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JitterConfig {
    /// 列带 `[start, end)`，为第一轴上的网格列序号
    pub column_bands: Vec<[usize; 2]>,
    /// 平移量（第二轴间距的倍数）
    #[serde(default = "default_shift")]
    pub shift: f64,
}

fn default_shift() -> f64 { 0.5 }

/// 快照头部参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderConfig {
    /// 盒子尺寸，缺省为计算域最大边长
    #[serde(default)]
    pub box_size: Option<f64>,
    /// 时间
    #[serde(default)]
    pub time: f64,
    /// 红移
    #[serde(default)]
    pub redshift: f64,
    /// Omega0
    #[serde(default = "default_omega0")]
    pub omega0: f64,
    /// OmegaLambda
    #[serde(default)]
    pub omega_lambda: f64,
    /// HubbleParam
    #[serde(default = "default_hubble")]
    pub hubble_param: f64,
    /// 以熵代替内能
    #[serde(default)]
    pub entropy_instead_u: bool,
}

fn default_omega0() -> f64 { 1.0 }
fn default_hubble() -> f64 { 70.0 }

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            box_size: None,
            time: 0.0,
            redshift: 0.0,
            omega0: default_omega0(),
            omega_lambda: 0.0,
            hubble_param: default_hubble(),
            entropy_instead_u: false,
        }
    }
}

impl IcConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json(&content)
    }

    /// 从 JSON 字符串解析并验证
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: IcConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }

    /// 空间维数
    pub fn dims(&self) -> usize {
        self.domain_extents.len()
    }

    /// 头部盒子尺寸
    pub fn box_size(&self) -> f64 {
        self.header
            .box_size
            .unwrap_or_else(|| self.domain_extents.iter().copied().fold(0.0, f64::max))
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(ConfigError::invalid("resolution", self.resolution, "分辨率必须为有限正数"));
        }

        let dims = self.dims();
        if dims != 2 && dims != 3 {
            return Err(ConfigError::invalid(
                "domain_extents",
                format!("{:?}", self.domain_extents),
                "计算域必须为二维或三维",
            ));
        }
        for (axis, &extent) in self.domain_extents.iter().enumerate() {
            if !(extent.is_finite() && extent > 0.0) {
                return Err(ConfigError::invalid(
                    &format!("domain_extents[{axis}]"),
                    extent,
                    "计算域长度必须为有限正数",
                ));
            }
        }

        self.validate_preset("regions.background", &self.regions.background)?;
        self.validate_preset("regions.outflow", &self.regions.outflow)?;

        self.validate_sampling()?;

        if let Some(obstacle) = &self.obstacle {
            if dims != 2 {
                return Err(ConfigError::invalid("obstacle", dims, "障碍物环带仅支持二维计算域"));
            }
            if !(obstacle.radius.is_finite() && obstacle.radius > 0.0) {
                return Err(ConfigError::invalid("obstacle.radius", obstacle.radius, "半径必须为有限正数"));
            }
            if !obstacle.center.is_finite() {
                return Err(ConfigError::invalid("obstacle.center", obstacle.center, "圆心坐标必须有限"));
            }
            if obstacle.ring_offsets.is_empty() {
                return Err(ConfigError::Missing("obstacle.ring_offsets".into()));
            }
            for (i, &k) in obstacle.ring_offsets.iter().enumerate() {
                if !k.is_finite() || k == 0.0 {
                    return Err(ConfigError::invalid(
                        &format!("obstacle.ring_offsets[{i}]"),
                        k,
                        "环带偏移必须为非零有限值",
                    ));
                }
                if obstacle.ring_offsets[..i].contains(&k) {
                    return Err(ConfigError::invalid(
                        &format!("obstacle.ring_offsets[{i}]"),
                        k,
                        "环带偏移重复",
                    ));
                }
            }
        }

        if let Some(edges) = &self.edge_layers {
            if edges.axis.index() >= dims {
                return Err(ConfigError::invalid("edge_layers.axis", format!("{:?}", edges.axis), "超出计算域维数"));
            }
        }

        if let Some(jitter) = &self.jitter {
            if !(jitter.shift.is_finite() && jitter.shift > 0.0 && jitter.shift < 1.0) {
                return Err(ConfigError::invalid("jitter.shift", jitter.shift, "平移量必须在 (0, 1) 范围内"));
            }
            for band in &jitter.column_bands {
                if band[0] >= band[1] {
                    return Err(ConfigError::invalid(
                        "jitter.column_bands",
                        format!("{band:?}"),
                        "列带必须满足 start < end",
                    ));
                }
            }
        }

        if let Some(box_size) = self.header.box_size {
            if !(box_size.is_finite() && box_size > 0.0) {
                return Err(ConfigError::invalid("header.box_size", box_size, "盒子尺寸必须为有限正数"));
            }
        }

        Ok(())
    }

    fn validate_sampling(&self) -> Result<(), ConfigError> {
        match &self.sampling {
            SamplingConfig::Lattice => {}
            SamplingConfig::Polar { center, inner_radius, outer_radius } => {
                if self.dims() != 2 {
                    return Err(ConfigError::invalid("sampling", self.dims(), "极坐标网格仅支持二维计算域"));
                }
                if !center.is_finite() {
                    return Err(ConfigError::invalid("sampling.center", center, "圆心坐标必须有限"));
                }
                if !(inner_radius.is_finite() && *inner_radius >= 0.0) {
                    return Err(ConfigError::invalid("sampling.inner_radius", inner_radius, "内半径必须为有限非负数"));
                }
                if !(outer_radius.is_finite() && outer_radius > inner_radius) {
                    return Err(ConfigError::invalid("sampling.outer_radius", outer_radius, "外半径必须大于内半径"));
                }
            }
            SamplingConfig::MonteCarlo { count, .. } => {
                if *count == 0 {
                    return Err(ConfigError::invalid("sampling.count", count, "随机点数必须为正"));
                }
            }
        }
        if self.jitter.is_some() && self.sampling != SamplingConfig::Lattice {
            return Err(ConfigError::invalid("jitter", "column_bands", "列带扰动只适用于规则格点采样"));
        }
        Ok(())
    }

    fn validate_preset(&self, key: &str, preset: &FlowPreset) -> Result<(), ConfigError> {
        if !preset.velocity.is_finite() {
            return Err(ConfigError::invalid(&format!("{key}.velocity"), preset.velocity, "速度必须有限"));
        }
        if !(preset.density.is_finite() && preset.density > 0.0) {
            return Err(ConfigError::invalid(&format!("{key}.density"), preset.density, "密度必须为正"));
        }
        if !(preset.specific_energy.is_finite() && preset.specific_energy > 0.0) {
            return Err(ConfigError::invalid(
                &format!("{key}.specific_energy"),
                preset.specific_energy,
                "比内能必须为正",
            ));
        }
        Ok(())
    }
}
