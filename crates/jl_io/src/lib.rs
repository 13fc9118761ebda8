// crates/jl_io/src/lib.rs

//! Jelly IO Layer
//!
//! 初始条件快照的读写。
//!
//! # 模块
//!
//! - [`gadget`]: Gadget-2 format-1 记录、头部、写入器与读取器
//! - [`error`]: IO 层错误类型，可转换为 `JlError`
//!
//! # 示例
//!
//! ```no_run
//! use jl_config::IcConfig;
//! use jl_ics::IcGenerator;
//! use jl_io::SnapshotWriter;
//!
//! let config = IcConfig::from_file("ic.json")?;
//! let dataset = IcGenerator::new(&config)?.generate()?;
//! SnapshotWriter::new(&config).write(&dataset, &config.output_path)?;
//! # Ok::<(), jl_foundation::JlError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod gadget;

pub use error::{SnapshotError, SnapshotResult};
pub use gadget::{GadgetHeader, GadgetReader, SnapshotContents, SnapshotWriter};
