// crates/jl_ics/src/assigner.rs

//! 状态赋值
//!
//! 区域到物理状态的查表：所有单元以背景预设初始化，只有障碍物内部和
//! 出流环带改用出流预设。

use glam::DVec3;
use jl_config::{FlowPreset, RegionPresets};

use crate::classifier::Region;

/// 单元物理状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowState {
    /// 速度
    pub velocity: DVec3,
    /// 密度
    pub density: f64,
    /// 比内能
    pub specific_energy: f64,
}

impl From<FlowPreset> for FlowState {
    fn from(preset: FlowPreset) -> Self {
        Self {
            velocity: preset.velocity,
            density: preset.density,
            specific_energy: preset.specific_energy,
        }
    }
}

/// 状态赋值器
#[derive(Debug, Clone, Copy)]
pub struct StateAssigner {
    background: FlowState,
    outflow: FlowState,
}

impl StateAssigner {
    /// 由命名预设创建
    pub fn new(presets: &RegionPresets) -> Self {
        Self {
            background: presets.background.into(),
            outflow: presets.outflow.into(),
        }
    }

    /// 区域对应的状态
    #[inline]
    pub fn state_for(&self, region: Region) -> FlowState {
        if region.is_outflow() {
            self.outflow
        } else {
            self.background
        }
    }
}
