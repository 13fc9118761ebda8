// crates/jl_io/src/gadget/record.rs

//! Fortran-77 无格式记录
//!
//! ```text
//! +-------------+------------------+-------------+
//! | len (i32)   | payload [+ 零填充] | len (i32)   |
//! +-------------+------------------+-------------+
//! ```
//!
//! 长度标记为本机字节序，不含标记本身。

use crate::error::{SnapshotError, SnapshotResult};

/// 长度标记字节数
pub const MARKER_SIZE: usize = 4;

fn marker(len: usize) -> SnapshotResult<[u8; MARKER_SIZE]> {
    let len = i32::try_from(len)
        .map_err(|_| SnapshotError::format(format!("记录长度 {len} 超出 i32 范围")))?;
    Ok(len.to_ne_bytes())
}

/// 把载荷包装为一条记录，追加到 `out`
///
/// `pad` 给定时载荷以零填充到该长度，填充长度小于载荷时报错。
pub fn append_record(out: &mut Vec<u8>, payload: &[u8], pad: Option<usize>) -> SnapshotResult<()> {
    let body_len = match pad {
        Some(pad) if pad < payload.len() => {
            return Err(SnapshotError::format(format!(
                "填充长度 {pad} 小于载荷长度 {}",
                payload.len()
            )));
        }
        Some(pad) => pad,
        None => payload.len(),
    };
    let m = marker(body_len)?;

    out.reserve(body_len + 2 * MARKER_SIZE);
    out.extend_from_slice(&m);
    out.extend_from_slice(payload);
    out.resize(out.len() + body_len - payload.len(), 0);
    out.extend_from_slice(&m);
    Ok(())
}

/// 生成一条独立记录
pub fn make_record(payload: &[u8], pad: Option<usize>) -> SnapshotResult<Vec<u8>> {
    let mut out = Vec::new();
    append_record(&mut out, payload, pad)?;
    Ok(out)
}

fn read_marker(input: &[u8], at: usize) -> SnapshotResult<i32> {
    let bytes = input
        .get(at..at + MARKER_SIZE)
        .ok_or_else(|| SnapshotError::format(format!("偏移 {at} 处记录标记被截断")))?;
    let mut m = [0u8; MARKER_SIZE];
    m.copy_from_slice(bytes);
    Ok(i32::from_ne_bytes(m))
}

/// 从 `input` 头部切出一条记录的载荷，并推进 `input`
pub fn split_record<'a>(input: &mut &'a [u8]) -> SnapshotResult<&'a [u8]> {
    let leading = read_marker(input, 0)?;
    let len = usize::try_from(leading)
        .map_err(|_| SnapshotError::format(format!("记录长度 {leading} 为负")))?;
    let end = MARKER_SIZE + len;
    let payload = input
        .get(MARKER_SIZE..end)
        .ok_or_else(|| SnapshotError::format(format!("记录载荷被截断: 需要 {len} 字节")))?;
    let trailing = read_marker(input, end)?;
    if leading != trailing {
        return Err(SnapshotError::RecordMismatch { leading, trailing });
    }
    *input = &input[end + MARKER_SIZE..];
    Ok(payload)
}
