// crates/jl_ics/src/classifier.rs

//! 区域分类器
//!
//! 为每个采样点给出区域标签与保留决定。区域互斥，重叠时按优先级取最高者：
//!
//! ```text
//! 障碍物内部 > 障碍物过渡环带 > 计算域边界层 > 背景
//! ```
//!
//! 规则：
//!
//! - 体采样点距圆心落在 `[R - w, R + w]`（w 为排除带半宽，默认 2d）时剔除，由环带替换
//! - 体采样点距圆心小于 `R - w` 为障碍物内部
//! - 环带点按径向偏移分桶：流体侧最近一环为反射环，更远的环为次级反射环，
//!   固体侧的环为出流区
//! - 反转障碍物的固体在圆外：`R + w` 以外为障碍物内部，流体侧变为 k < 0 一侧
//! - 边界层只取决于指定轴上的坐标：距端面一个间距内为反射层，第二个间距内为粘附层
//!
//! 体采样点不论来自格点、极坐标网格还是随机点，都只按位置分类。
//! 环带点在分类上总是优先于边界层。

use glam::{DVec2, DVec3};
use jl_config::IcConfig;
use jl_foundation::{JlError, JlResult};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::sampler::{Collar, Lattice, Sample, SampleOrigin};

// ============================================================
// 区域
// ============================================================

/// 流动区域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// 背景流体
    Background,
    /// 边界层第一层（流体侧反射）
    EdgeReflective,
    /// 边界层第二层（粘附）
    EdgeSticky,
    /// 流体侧最近的环（反射）
    CollarFluid,
    /// 流体侧更远的环（次级反射环）
    CollarFluidSecondary,
    /// 固体侧的环（出流）
    CollarOutflow,
    /// 障碍物内部的体采样点
    ObstacleInterior,
}

impl Region {
    /// 区域优先级，数值越大越优先
    pub fn priority(&self) -> u8 {
        match self {
            Self::Background => 0,
            Self::EdgeReflective | Self::EdgeSticky => 1,
            Self::CollarFluid | Self::CollarFluidSecondary | Self::CollarOutflow => 2,
            Self::ObstacleInterior => 3,
        }
    }

    /// 是否属于障碍物
    pub fn is_obstacle(&self) -> bool {
        self.priority() >= 2
    }

    /// 是否使用出流预设
    pub fn is_outflow(&self) -> bool {
        matches!(self, Self::CollarOutflow | Self::ObstacleInterior)
    }
}

/// 已分类的采样点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedSample {
    /// 采样点
    pub sample: Sample,
    /// 区域
    pub region: Region,
}

// ============================================================
// 障碍物区与边界层
// ============================================================

/// 障碍物排除带与环带分桶
#[derive(Debug, Clone)]
struct ObstacleZone {
    center: DVec2,
    band_inner: f64,
    band_outer: f64,
    inverted: bool,
    ring_regions: Vec<Region>,
}

impl ObstacleZone {
    fn from_collar(collar: &Collar, inverted: bool) -> Self {
        // 反转时固体在圆外，流体侧偏移为负
        let side = if inverted { -1.0 } else { 1.0 };
        let fluid_offsets = collar.offsets().iter().map(|&k| side * k);
        let nearest_fluid = fluid_offsets
            .clone()
            .filter(|&k| k > 0.0)
            .fold(f64::INFINITY, f64::min);
        let ring_regions = fluid_offsets
            .map(|k| {
                if k < 0.0 {
                    Region::CollarOutflow
                } else if k == nearest_fluid {
                    Region::CollarFluid
                } else {
                    Region::CollarFluidSecondary
                }
            })
            .collect();

        let w = collar.half_width();
        Self {
            center: collar.center(),
            band_inner: collar.radius() - w,
            band_outer: collar.radius() + w,
            inverted,
            ring_regions,
        }
    }

    #[inline]
    fn distance(&self, position: DVec3) -> f64 {
        position.truncate().distance(self.center)
    }

    /// 距离是否落在固体一侧（排除带以外）
    #[inline]
    fn is_solid(&self, r: f64) -> bool {
        if self.inverted {
            r > self.band_outer
        } else {
            r < self.band_inner
        }
    }
}

/// 计算域边界层
#[derive(Debug, Clone, Copy)]
struct EdgeLayers {
    axis: usize,
    extent: f64,
    width: f64,
}

impl EdgeLayers {
    fn classify(&self, position: DVec3) -> Option<Region> {
        let c = position[self.axis];
        let dist = c.min(self.extent - c);
        if dist < self.width {
            Some(Region::EdgeReflective)
        } else if dist < 2.0 * self.width {
            Some(Region::EdgeSticky)
        } else {
            None
        }
    }
}

// ============================================================
// 分类器
// ============================================================

/// 区域分类器
#[derive(Debug, Clone)]
pub struct Classifier {
    obstacle: Option<ObstacleZone>,
    edges: Option<EdgeLayers>,
}

impl Classifier {
    /// 创建分类器并检查几何一致性
    ///
    /// `collar` 为 `None` 或退化（`Nphi = 0`）时不剔除任何格点。
    pub fn new(config: &IcConfig, lattice: &Lattice, collar: Option<&Collar>) -> JlResult<Self> {
        let extents = lattice.extents();

        let obstacle = match collar {
            Some(collar) => {
                check_obstacle_geometry(collar, extents)?;
                if collar.is_degenerate() {
                    warn!(
                        "障碍物半径 {} 相对分辨率 {} 过小 (Nphi = 0), 不生成环带也不剔除格点",
                        collar.radius(),
                        config.resolution
                    );
                    None
                } else {
                    let inverted = config.obstacle.as_ref().map_or(false, |o| o.inverted);
                    Some(ObstacleZone::from_collar(collar, inverted))
                }
            }
            None => None,
        };

        let edges = config.edge_layers.as_ref().map(|edge| {
            let axis = edge.axis.index();
            EdgeLayers {
                axis,
                extent: extents[axis],
                width: lattice.spacing()[axis],
            }
        });

        if let Some(zone) = &obstacle {
            debug!(
                "排除带: [{:.6}, {:.6}], 反转: {}, 环带分桶: {:?}",
                zone.band_inner, zone.band_outer, zone.inverted, zone.ring_regions
            );
        }

        Ok(Self { obstacle, edges })
    }

    /// 是否配置了有效的环带替换
    pub fn has_collar(&self) -> bool {
        self.obstacle.is_some()
    }

    /// 点是否位于障碍物排除带内
    pub fn in_exclusion_band(&self, position: DVec3) -> bool {
        self.obstacle.as_ref().map_or(false, |zone| {
            let r = zone.distance(position);
            r >= zone.band_inner && r <= zone.band_outer
        })
    }

    /// 按位置分类体采样点，返回 `None` 表示剔除
    pub fn classify_point(&self, position: DVec3) -> Option<Region> {
        if let Some(zone) = &self.obstacle {
            let r = zone.distance(position);
            if zone.is_solid(r) {
                return Some(Region::ObstacleInterior);
            }
            if r >= zone.band_inner && r <= zone.band_outer {
                return None;
            }
        }
        if let Some(edges) = &self.edges {
            if let Some(region) = edges.classify(position) {
                return Some(region);
            }
        }
        Some(Region::Background)
    }

    /// 第 `ring` 个环的区域
    pub fn ring_region(&self, ring: usize) -> Option<Region> {
        self.obstacle
            .as_ref()
            .and_then(|zone| zone.ring_regions.get(ring).copied())
    }

    /// 分类单个采样点
    pub fn classify(&self, sample: &Sample) -> Option<Region> {
        match sample.origin {
            SampleOrigin::Collar { ring, .. } => self.ring_region(ring),
            _ => self.classify_point(sample.position),
        }
    }

    /// 并行分类，保持输入顺序
    pub fn classify_all(&self, samples: Vec<Sample>) -> Vec<ClassifiedSample> {
        samples
            .into_par_iter()
            .filter_map(|sample| {
                self.classify(&sample)
                    .map(|region| ClassifiedSample { sample, region })
            })
            .collect()
    }
}

/// 检查障碍物与计算域的几何关系
fn check_obstacle_geometry(collar: &Collar, extents: DVec3) -> JlResult<()> {
    let center = collar.center();
    let domain = extents.truncate();

    if center.cmplt(DVec2::ZERO).any() || center.cmpge(domain).any() {
        return Err(JlError::geometry(format!(
            "障碍物圆心 {center} 位于计算域 [0, {domain}) 之外"
        )));
    }
    if collar.is_degenerate() {
        return Ok(());
    }

    let min_extent = domain.min_element();
    let radius = collar.radius();
    if 2.0 * radius >= min_extent {
        return Err(JlError::configuration(format!(
            "障碍物直径 {} 不小于计算域最短边 {min_extent}",
            2.0 * radius
        )));
    }

    let outer = radius + collar.half_width();
    if 2.0 * outer > min_extent {
        return Err(JlError::geometry(format!(
            "排除带直径 {} 宽于计算域最短边 {min_extent}",
            2.0 * outer
        )));
    }
    if (center - outer).cmplt(DVec2::ZERO).any() || (center + outer).cmpgt(domain).any() {
        return Err(JlError::geometry(format!(
            "障碍物排除带 (圆心 {center}, 外半径 {outer}) 越出计算域 [0, {domain}]"
        )));
    }

    let innermost = collar.innermost_radius();
    if innermost <= 0.0 {
        return Err(JlError::configuration(format!(
            "障碍物半径 {radius} 相对分辨率过小, 最内环半径 {innermost} 非正"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jl_config::{Axis, EdgeLayerConfig, ObstacleConfig};

    fn obstacle_config() -> IcConfig {
        IcConfig {
            resolution: 0.01,
            domain_extents: vec![2.0, 1.5],
            obstacle: Some(ObstacleConfig::new(DVec2::new(1.0, 0.75), 0.05)),
            ..IcConfig::default()
        }
    }

    fn build(config: &IcConfig) -> JlResult<(Lattice, Option<Collar>, Classifier)> {
        let lattice = Lattice::from_resolution(&config.domain_extents, config.resolution)?;
        let collar = config.obstacle.as_ref().map(|o| {
            Collar::new(o.center, o.radius, config.resolution, o.ring_offsets.clone())
        });
        let classifier = Classifier::new(config, &lattice, collar.as_ref())?;
        Ok((lattice, collar, classifier))
    }

    #[test]
    fn test_region_priority_order() {
        assert!(Region::ObstacleInterior.priority() > Region::CollarOutflow.priority());
        assert!(Region::CollarFluid.priority() > Region::EdgeReflective.priority());
        assert!(Region::EdgeSticky.priority() > Region::Background.priority());
        assert!(Region::ObstacleInterior.is_outflow());
        assert!(!Region::CollarFluid.is_outflow());
    }

    #[test]
    fn test_exclusion_band_drops_lattice_points() {
        let config = obstacle_config();
        let (lattice, _, classifier) = build(&config).unwrap();
        let center = DVec2::new(1.0, 0.75);

        let classified = classifier.classify_all(lattice.sample());
        assert!(classified.len() < lattice.n_points());
        for c in &classified {
            let r = c.sample.position.truncate().distance(center);
            assert!(!(0.03..=0.07).contains(&r), "lattice point survived at r = {r}");
        }
    }

    #[test]
    fn test_interior_points() {
        let config = obstacle_config();
        let (_, _, classifier) = build(&config).unwrap();

        let inside = DVec3::new(1.005, 0.755, 0.0);
        assert_eq!(classifier.classify_point(inside), Some(Region::ObstacleInterior));
        let band = DVec3::new(1.05, 0.75, 0.0);
        assert_eq!(classifier.classify_point(band), None);
        let far = DVec3::new(0.2, 0.2, 0.0);
        assert_eq!(classifier.classify_point(far), Some(Region::Background));
    }

    #[test]
    fn test_ring_buckets() {
        let config = obstacle_config();
        let (_, _, classifier) = build(&config).unwrap();

        assert_eq!(classifier.ring_region(0), Some(Region::CollarFluidSecondary));
        assert_eq!(classifier.ring_region(1), Some(Region::CollarFluid));
        assert_eq!(classifier.ring_region(2), Some(Region::CollarOutflow));
        assert_eq!(classifier.ring_region(3), Some(Region::CollarOutflow));
        assert_eq!(classifier.ring_region(4), None);
    }

    #[test]
    fn test_edge_layers_along_x() {
        let config = IcConfig {
            resolution: 0.1,
            domain_extents: vec![1.0, 1.0],
            edge_layers: Some(EdgeLayerConfig { axis: Axis::X }),
            ..IcConfig::default()
        };
        let (_, _, classifier) = build(&config).unwrap();

        let at = |x: f64| classifier.classify_point(DVec3::new(x, 0.55, 0.0));
        assert_eq!(at(0.05), Some(Region::EdgeReflective));
        assert_eq!(at(0.15), Some(Region::EdgeSticky));
        assert_eq!(at(0.25), Some(Region::Background));
        assert_eq!(at(0.85), Some(Region::EdgeSticky));
        assert_eq!(at(0.95), Some(Region::EdgeReflective));
        // y 方向不影响
        assert_eq!(
            classifier.classify_point(DVec3::new(0.55, 0.05, 0.0)),
            Some(Region::Background)
        );
    }

    #[test]
    fn test_obstacle_wins_over_edge_layer() {
        let config = IcConfig {
            resolution: 0.1,
            domain_extents: vec![4.0, 4.0],
            obstacle: Some(ObstacleConfig::new(DVec2::new(0.66, 2.0), 0.45)),
            edge_layers: Some(EdgeLayerConfig { axis: Axis::X }),
            ..IcConfig::default()
        };
        let (_, collar, classifier) = build(&config).unwrap();
        let collar = collar.unwrap();

        // 环带点即使落在边界层内也保持障碍物分类
        let classified = classifier.classify_all(collar.sample());
        assert_eq!(classified.len(), collar.n_points());
        assert!(classified.iter().all(|c| c.region.is_obstacle()));
        let near_edge = classified
            .iter()
            .find(|c| c.sample.position.x < 0.2)
            .expect("collar reaches the edge layer");
        assert!(near_edge.region.is_obstacle());

        // 排除带以外的格点仍按边界层分类
        let outside_band = DVec3::new(0.05, 2.95, 0.0);
        assert_eq!(classifier.classify_point(outside_band), Some(Region::EdgeReflective));
    }

    #[test]
    fn test_degenerate_obstacle_excludes_nothing() {
        let config = IcConfig {
            resolution: 0.1,
            domain_extents: vec![1.0, 1.0],
            obstacle: Some(ObstacleConfig::new(DVec2::new(0.5, 0.5), 0.001)),
            ..IcConfig::default()
        };
        let (lattice, _, classifier) = build(&config).unwrap();
        assert!(!classifier.has_collar());
        assert_eq!(classifier.classify_all(lattice.sample()).len(), lattice.n_points());
    }

    #[test]
    fn test_obstacle_outside_domain() {
        let mut config = obstacle_config();
        config.obstacle = Some(ObstacleConfig::new(DVec2::new(2.5, 0.75), 0.05));
        assert!(matches!(build(&config), Err(JlError::Geometry { .. })));
    }

    #[test]
    fn test_band_crossing_domain_edge() {
        let mut config = obstacle_config();
        config.obstacle = Some(ObstacleConfig::new(DVec2::new(0.04, 0.75), 0.05));
        assert!(matches!(build(&config), Err(JlError::Geometry { .. })));
    }

    #[test]
    fn test_oversized_obstacle() {
        let mut config = obstacle_config();
        config.obstacle = Some(ObstacleConfig::new(DVec2::new(1.0, 0.75), 0.8));
        assert!(matches!(build(&config), Err(JlError::Configuration { .. })));
    }

    #[test]
    fn test_band_wider_than_domain() {
        let mut config = obstacle_config();
        config.domain_extents = vec![2.0, 0.1];
        config.obstacle = Some(ObstacleConfig::new(DVec2::new(1.0, 0.05), 0.035));
        assert!(matches!(build(&config), Err(JlError::Geometry { .. })));
    }

    #[test]
    fn test_inner_ring_with_non_positive_radius() {
        // R = 0.005, 最内环 R - 0.75d 为负
        let mut config = obstacle_config();
        config.obstacle = Some(ObstacleConfig::new(DVec2::new(1.0, 0.75), 0.005));
        assert!(matches!(build(&config), Err(JlError::Configuration { .. })));
    }

    #[test]
    fn test_inverted_obstacle_solid_outside() {
        let mut config = obstacle_config();
        let mut obstacle = ObstacleConfig::new(DVec2::new(1.0, 0.75), 0.5);
        obstacle.inverted = true;
        config.obstacle = Some(obstacle);
        let (_, _, classifier) = build(&config).unwrap();

        assert_eq!(
            classifier.classify_point(DVec3::new(1.005, 0.755, 0.0)),
            Some(Region::Background)
        );
        assert_eq!(classifier.classify_point(DVec3::new(1.5, 0.75, 0.0)), None);
        assert_eq!(
            classifier.classify_point(DVec3::new(1.0, 0.1, 0.0)),
            Some(Region::ObstacleInterior)
        );
        assert!(classifier.in_exclusion_band(DVec3::new(1.0, 0.25, 0.0)));
    }

    #[test]
    fn test_inverted_ring_buckets() {
        let mut config = obstacle_config();
        let mut obstacle = ObstacleConfig::new(DVec2::new(1.0, 0.75), 0.5);
        obstacle.inverted = true;
        config.obstacle = Some(obstacle);
        let (_, _, classifier) = build(&config).unwrap();

        assert_eq!(classifier.ring_region(0), Some(Region::CollarOutflow));
        assert_eq!(classifier.ring_region(1), Some(Region::CollarOutflow));
        assert_eq!(classifier.ring_region(2), Some(Region::CollarFluid));
        assert_eq!(classifier.ring_region(3), Some(Region::CollarFluidSecondary));
    }

    #[test]
    fn test_random_points_classified_by_position() {
        let config = obstacle_config();
        let (_, _, classifier) = build(&config).unwrap();
        let sample = |x: f64, y: f64, index: usize| Sample {
            position: DVec3::new(x, y, 0.0),
            origin: SampleOrigin::Random { index },
        };

        assert_eq!(classifier.classify(&sample(1.0, 0.75, 0)), Some(Region::ObstacleInterior));
        assert_eq!(classifier.classify(&sample(1.05, 0.75, 1)), None);
        assert_eq!(classifier.classify(&sample(0.3, 0.3, 2)), Some(Region::Background));
    }
}
