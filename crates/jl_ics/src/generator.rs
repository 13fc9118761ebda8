// crates/jl_ics/src/generator.rs

//! 初始条件生成器
//!
//! 串联各阶段：采样 -> 分类 -> 组装（赋值、错位、一致性检查）-> 标记。
//! 每个阶段返回新的集合，不在阶段之间原地修改数据。

use jl_config::IcConfig;
use jl_foundation::JlResult;
use tracing::{debug, info};

use crate::assembler::{Assembler, Jitter};
use crate::assigner::StateAssigner;
use crate::classifier::Classifier;
use crate::sampler::{BulkSampler, Collar, Lattice};
use crate::tagger::{BoundaryTagger, TaggedDataset};

/// 初始条件生成器
#[derive(Debug, Clone)]
pub struct IcGenerator {
    lattice: Lattice,
    bulk: BulkSampler,
    collar: Option<Collar>,
    classifier: Classifier,
    assigner: StateAssigner,
    jitter: Option<Jitter>,
}

impl IcGenerator {
    /// 校验配置并准备各阶段
    pub fn new(config: &IcConfig) -> JlResult<Self> {
        config.validate()?;

        let lattice = Lattice::from_resolution(&config.domain_extents, config.resolution)?;
        let bulk = BulkSampler::from_config(config, &lattice)?;
        let collar = config.obstacle.as_ref().map(|obstacle| {
            Collar::new(
                obstacle.center,
                obstacle.radius,
                config.resolution,
                obstacle.ring_offsets.clone(),
            )
        });
        let classifier = Classifier::new(config, &lattice, collar.as_ref())?;
        let assigner = StateAssigner::new(&config.regions);
        let jitter = config.jitter.as_ref().map(|j| Jitter::new(j, &lattice));

        debug!(
            "体采样 {} ({} 点), 格点 {:?}, 间距 {}, 环带 {}",
            bulk.name(),
            bulk.n_points(),
            lattice.counts(),
            lattice.spacing(),
            collar
                .as_ref()
                .map_or(0, |c| if classifier.has_collar() { c.n_points() } else { 0 })
        );

        Ok(Self {
            lattice,
            bulk,
            collar,
            classifier,
            assigner,
            jitter,
        })
    }

    /// 背景格点（体采样不是格点时只提供计算域与间距）
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// 体采样方式
    pub fn bulk(&self) -> &BulkSampler {
        &self.bulk
    }

    /// 障碍物环带（退化时仍返回，但不参与生成）
    pub fn collar(&self) -> Option<&Collar> {
        self.collar.as_ref()
    }

    /// 运行完整流水线
    pub fn generate(&self) -> JlResult<TaggedDataset> {
        let bulk = self.classifier.classify_all(self.bulk.sample());
        let dropped = self.bulk.n_points() - bulk.len();

        let ring = match &self.collar {
            Some(collar) if self.classifier.has_collar() => {
                self.classifier.classify_all(collar.sample())
            }
            _ => Vec::new(),
        };

        info!(
            "采样: {} {} (剔除 {}), 环带 {}",
            self.bulk.name(),
            bulk.len(),
            dropped,
            ring.len()
        );

        let assembler = Assembler::new(&self.classifier, self.assigner, self.jitter.clone());
        let cells = assembler.assemble(bulk, ring)?;
        let dataset = BoundaryTagger.tag(cells)?;

        for (role, count) in dataset.role_histogram() {
            if count > 0 {
                debug!("角色 {}: {}", role, count);
            }
        }
        info!("生成完成: {} 个单元", dataset.len());

        Ok(dataset)
    }
}
