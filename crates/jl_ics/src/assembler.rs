// crates/jl_ics/src/assembler.rs

//! 数据集组装
//!
//! 把保留的体采样点与环带点按“体采样在前、环带在后”的顺序合并为一个单元集合。
//! 位置、速度、密度、比内能、区域各属性数组按下标对齐（SoA 布局）。
//!
//! 可选的半格错位只改变网格生成质量，不涉及物理：指定列带内的格点沿第二轴
//! 平移并回卷到计算域内，平移后会重新分类，落入排除带的点保持原位。

use std::collections::HashSet;
use std::ops::Range;

use glam::DVec3;
use jl_config::JitterConfig;
use jl_foundation::{JlError, JlResult};
use tracing::debug;

use crate::assigner::StateAssigner;
use crate::classifier::{ClassifiedSample, Classifier, Region};
use crate::sampler::{Lattice, SampleOrigin};

// ============================================================
// 单元集合
// ============================================================

/// 单元集合（SoA 布局，各数组下标对齐）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellSet {
    positions: Vec<DVec3>,
    velocities: Vec<DVec3>,
    densities: Vec<f64>,
    energies: Vec<f64>,
    regions: Vec<Region>,
}

impl CellSet {
    fn with_capacity(n: usize) -> Self {
        Self {
            positions: Vec::with_capacity(n),
            velocities: Vec::with_capacity(n),
            densities: Vec::with_capacity(n),
            energies: Vec::with_capacity(n),
            regions: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, position: DVec3, region: Region, assigner: &StateAssigner) {
        let state = assigner.state_for(region);
        self.positions.push(position);
        self.velocities.push(state.velocity);
        self.densities.push(state.density);
        self.energies.push(state.specific_energy);
        self.regions.push(region);
    }

    /// 单元数
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// 位置
    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    /// 速度
    pub fn velocities(&self) -> &[DVec3] {
        &self.velocities
    }

    /// 密度
    pub fn densities(&self) -> &[f64] {
        &self.densities
    }

    /// 比内能
    pub fn specific_energies(&self) -> &[f64] {
        &self.energies
    }

    /// 区域
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// 检查位置唯一性
    pub fn check_unique_positions(&self) -> JlResult<()> {
        let mut seen = HashSet::with_capacity(self.len());
        for (i, p) in self.positions.iter().enumerate() {
            let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
            if !seen.insert(key) {
                return Err(JlError::geometry(format!("单元 {i} 位置 {p} 重复")));
            }
        }
        Ok(())
    }
}

// ============================================================
// 半格错位
// ============================================================

/// 列带半格错位
#[derive(Debug, Clone)]
pub struct Jitter {
    bands: Vec<Range<usize>>,
    shift: f64,
    extent: f64,
}

impl Jitter {
    /// 由配置与格点创建
    pub fn new(config: &JitterConfig, lattice: &Lattice) -> Self {
        Self {
            bands: config.column_bands.iter().map(|b| b[0]..b[1]).collect(),
            shift: config.shift * lattice.spacing().y,
            extent: lattice.extents().y,
        }
    }

    /// 采样点是否位于指定列带
    pub fn applies_to(&self, origin: &SampleOrigin) -> bool {
        match origin {
            SampleOrigin::Lattice { column, .. } => self.bands.iter().any(|b| b.contains(column)),
            _ => false,
        }
    }

    /// 平移后的位置，回卷到 `[0, Ly)`
    pub fn shifted(&self, position: DVec3) -> DVec3 {
        DVec3::new(position.x, (position.y + self.shift).rem_euclid(self.extent), position.z)
    }
}

// ============================================================
// 组装器
// ============================================================

/// 数据集组装器
#[derive(Debug, Clone)]
pub struct Assembler<'a> {
    classifier: &'a Classifier,
    assigner: StateAssigner,
    jitter: Option<Jitter>,
}

impl<'a> Assembler<'a> {
    /// 创建组装器
    pub fn new(classifier: &'a Classifier, assigner: StateAssigner, jitter: Option<Jitter>) -> Self {
        Self {
            classifier,
            assigner,
            jitter,
        }
    }

    /// 合并体采样点与环带点
    pub fn assemble(
        &self,
        bulk: Vec<ClassifiedSample>,
        collar: Vec<ClassifiedSample>,
    ) -> JlResult<CellSet> {
        let mut cells = CellSet::with_capacity(bulk.len() + collar.len());
        let mut jittered = 0usize;

        for c in &bulk {
            let (position, region) = self.perturb(c);
            if position != c.sample.position {
                jittered += 1;
            }
            cells.push(position, region, &self.assigner);
        }
        for c in &collar {
            cells.push(c.sample.position, c.region, &self.assigner);
        }

        if cells.is_empty() {
            return Err(JlError::configuration("生成的数据集为空"));
        }
        cells.check_unique_positions()?;

        debug!(
            "组装完成: 体采样 {}, 环带 {}, 错位 {}",
            bulk.len(),
            collar.len(),
            jittered
        );
        Ok(cells)
    }

    fn perturb(&self, c: &ClassifiedSample) -> (DVec3, Region) {
        let Some(jitter) = &self.jitter else {
            return (c.sample.position, c.region);
        };
        if !jitter.applies_to(&c.sample.origin) {
            return (c.sample.position, c.region);
        }
        let moved = jitter.shifted(c.sample.position);
        match self.classifier.classify_point(moved) {
            Some(region) => (moved, region),
            None => (c.sample.position, c.region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use jl_config::{IcConfig, ObstacleConfig};

    use crate::sampler::Collar;

    struct Fixture {
        config: IcConfig,
        lattice: Lattice,
        collar: Option<Collar>,
        classifier: Classifier,
    }

    fn fixture(config: IcConfig) -> Fixture {
        let lattice = Lattice::from_resolution(&config.domain_extents, config.resolution).unwrap();
        let collar = config
            .obstacle
            .as_ref()
            .map(|o| Collar::new(o.center, o.radius, config.resolution, o.ring_offsets.clone()));
        let classifier = Classifier::new(&config, &lattice, collar.as_ref()).unwrap();
        Fixture { config, lattice, collar, classifier }
    }

    #[test]
    fn test_bulk_then_collar_order() {
        let f = fixture(IcConfig {
            resolution: 0.05,
            domain_extents: vec![2.0, 2.0],
            obstacle: Some(ObstacleConfig::new(DVec2::new(1.0, 1.0), 0.3)),
            ..IcConfig::default()
        });
        let collar = f.collar.as_ref().unwrap();
        let bulk = f.classifier.classify_all(f.lattice.sample());
        let ring = f.classifier.classify_all(collar.sample());
        let n_bulk = bulk.len();

        let assembler = Assembler::new(&f.classifier, StateAssigner::new(&f.config.regions), None);
        let cells = assembler.assemble(bulk, ring).unwrap();

        assert_eq!(cells.len(), n_bulk + collar.n_points());
        assert_eq!(cells.velocities().len(), cells.len());
        assert_eq!(cells.densities().len(), cells.len());
        assert_eq!(cells.specific_energies().len(), cells.len());
        assert_eq!(cells.regions().len(), cells.len());
        assert!(cells.regions()[..n_bulk].iter().all(|r| !r.is_obstacle() || *r == Region::ObstacleInterior));
        assert!(cells.regions()[n_bulk..].iter().all(|r| r.is_obstacle()));
    }

    #[test]
    fn test_jitter_shifts_designated_columns() {
        let f = fixture(IcConfig {
            resolution: 0.25,
            domain_extents: vec![1.0, 1.0],
            jitter: Some(JitterConfig { column_bands: vec![[0, 1]], shift: 0.5 }),
            ..IcConfig::default()
        });
        let jitter = Jitter::new(f.config.jitter.as_ref().unwrap(), &f.lattice);
        let bulk = f.classifier.classify_all(f.lattice.sample());

        let assembler =
            Assembler::new(&f.classifier, StateAssigner::new(&f.config.regions), Some(jitter));
        let cells = assembler.assemble(bulk, Vec::new()).unwrap();

        // 第 0 列 y: 0.125 -> 0.25, ..., 0.875 -> 1.0 回卷为 0.0
        let first_column: Vec<f64> = cells.positions()[..4].iter().map(|p| p.y).collect();
        assert_eq!(first_column, vec![0.25, 0.5, 0.75, 0.0]);
        assert!(cells.positions()[..4].iter().all(|p| (p.x - 0.125).abs() < 1e-12));
        // 其余列保持不变
        assert!((cells.positions()[4].y - 0.125).abs() < 1e-12);
        cells.check_unique_positions().unwrap();
    }

    #[test]
    fn test_jitter_never_enters_exclusion_band() {
        let f = fixture(IcConfig {
            resolution: 0.05,
            domain_extents: vec![2.0, 2.0],
            obstacle: Some(ObstacleConfig::new(DVec2::new(1.0, 1.0), 0.3)),
            jitter: Some(JitterConfig { column_bands: vec![[0, 40]], shift: 0.5 }),
            ..IcConfig::default()
        });
        let jitter = Jitter::new(f.config.jitter.as_ref().unwrap(), &f.lattice);
        let bulk = f.classifier.classify_all(f.lattice.sample());

        let assembler =
            Assembler::new(&f.classifier, StateAssigner::new(&f.config.regions), Some(jitter));
        let cells = assembler.assemble(bulk, Vec::new()).unwrap();

        assert!(cells
            .positions()
            .iter()
            .all(|p| !f.classifier.in_exclusion_band(*p)));
    }

    #[test]
    fn test_duplicate_positions_rejected() {
        let f = fixture(IcConfig::default());
        let bulk = f.classifier.classify_all(f.lattice.sample());
        let duplicated = vec![bulk[0]];

        let assembler = Assembler::new(&f.classifier, StateAssigner::new(&f.config.regions), None);
        assert!(matches!(
            assembler.assemble(bulk, duplicated),
            Err(JlError::Geometry { .. })
        ));
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let f = fixture(IcConfig::default());
        let assembler = Assembler::new(&f.classifier, StateAssigner::new(&f.config.regions), None);
        assert!(matches!(
            assembler.assemble(Vec::new(), Vec::new()),
            Err(JlError::Configuration { .. })
        ));
    }
}
