// crates/jl_ics/src/lib.rs

//! Jelly Initial Conditions
//!
//! 运动网格流体求解器的初始条件生成核心。
//!
//! # 流水线
//!
//! ```text
//! BulkSampler / Collar   体采样（格点、极坐标网格或随机点）与障碍物同心环带
//!        |
//!   Classifier       区域分类，剔除排除带内的体采样点（rayon 并行，保持顺序）
//!        |
//!   Assembler        合并体采样点与环带，赋物理状态，可选列带错位，检查位置唯一
//!        |
//!  BoundaryTagger    编号 = 1 起下标 + 角色偏移
//! ```
//!
//! [`IcGenerator`] 串联以上阶段，输出 [`TaggedDataset`]，由 `jl_io` 写成快照。
//!
//! # 示例
//!
//! ```
//! use jl_config::IcConfig;
//! use jl_ics::IcGenerator;
//!
//! let config = IcConfig::default();
//! let dataset = IcGenerator::new(&config)?.generate()?;
//! assert_eq!(dataset.len(), 32 * 32);
//! # Ok::<(), jl_foundation::JlError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assembler;
pub mod assigner;
pub mod classifier;
pub mod generator;
pub mod sampler;
pub mod tagger;

pub use assembler::{Assembler, CellSet, Jitter};
pub use assigner::{FlowState, StateAssigner};
pub use classifier::{ClassifiedSample, Classifier, Region};
pub use generator::IcGenerator;
pub use sampler::{BulkSampler, Collar, Lattice, PolarGrid, RandomCloud, Sample, SampleOrigin};
pub use tagger::{BoundaryRole, BoundaryTagger, Tag, TaggedDataset, ROLE_SPACING};
