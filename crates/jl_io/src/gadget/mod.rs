// crates/jl_io/src/gadget/mod.rs

//! Gadget-2 format-1 快照
//!
//! 每个数据块都是一条 Fortran-77 无格式记录，字节序为本机字节序。
//! 所有粒子均为类型 0（气体单元），其余五个类型槽位为零。

pub mod header;
pub mod reader;
pub mod record;
pub mod writer;

pub use header::{GadgetHeader, HEADER_SIZE, N_TYPES};
pub use reader::{GadgetReader, SnapshotContents};
pub use record::{append_record, make_record, split_record};
pub use writer::SnapshotWriter;
