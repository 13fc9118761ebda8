// crates/jl_io/src/gadget/header.rs

//! Gadget-2 快照头部
//!
//! 256 字节定长头部，字段按下表偏移排列，其余字节为零：
//!
//! ```text
//! 偏移  类型      字段
//!    0  i32[6]   npart
//!   24  f64[6]   massarr
//!   72  f64      time
//!   80  f64      redshift
//!   88  i32      flag_sfr
//!   92  i32      flag_feedback
//!   96  u32[6]   npartTotal (低 32 位)
//!  120  i32      flag_cooling
//!  124  i32      num_files
//!  128  f64      BoxSize
//!  136  f64      Omega0
//!  144  f64      OmegaLambda
//!  152  f64      HubbleParam
//!  160  i32      flag_stellarage
//!  164  i32      flag_metals
//!  168  u32[6]   npartTotalHighWord
//!  192  i32      flag_entropy_instead_u
//! ```

use jl_config::IcConfig;

use crate::error::{SnapshotError, SnapshotResult};

/// 头部字节数
pub const HEADER_SIZE: usize = 256;

/// 粒子类型数
pub const N_TYPES: usize = 6;

/// 气体（单元）粒子类型
pub const GAS_TYPE: usize = 0;

/// Gadget-2 头部
#[derive(Debug, Clone, PartialEq)]
pub struct GadgetHeader {
    /// 各类型粒子数
    pub npart: [i32; N_TYPES],
    /// 各类型统一质量（0 表示逐粒子给出）
    pub massarr: [f64; N_TYPES],
    /// 时间
    pub time: f64,
    /// 红移
    pub redshift: f64,
    /// 恒星形成标志
    pub flag_sfr: i32,
    /// 反馈标志
    pub flag_feedback: i32,
    /// 全部文件各类型粒子数（低 32 位）
    pub npart_total: [u32; N_TYPES],
    /// 冷却标志
    pub flag_cooling: i32,
    /// 文件数
    pub num_files: i32,
    /// 盒子尺寸
    pub box_size: f64,
    /// 物质密度参数
    pub omega0: f64,
    /// 暗能量密度参数
    pub omega_lambda: f64,
    /// 哈勃参数
    pub hubble_param: f64,
    /// 恒星年龄标志
    pub flag_stellarage: i32,
    /// 金属丰度标志
    pub flag_metals: i32,
    /// 全部文件各类型粒子数（高 32 位）
    pub npart_total_high_word: [u32; N_TYPES],
    /// 以熵代替内能的标志
    pub flag_entropy_instead_u: i32,
}

impl GadgetHeader {
    /// 由配置填写宇宙学参数与标志，粒子数为零
    pub fn from_config(config: &IcConfig) -> Self {
        let header = &config.header;
        Self {
            npart: [0; N_TYPES],
            massarr: [0.0; N_TYPES],
            time: header.time,
            redshift: header.redshift,
            flag_sfr: 0,
            flag_feedback: 0,
            npart_total: [0; N_TYPES],
            flag_cooling: 0,
            num_files: 1,
            box_size: config.box_size(),
            omega0: header.omega0,
            omega_lambda: header.omega_lambda,
            hubble_param: header.hubble_param,
            flag_stellarage: 0,
            flag_metals: 0,
            npart_total_high_word: [0; N_TYPES],
            flag_entropy_instead_u: header.entropy_instead_u as i32,
        }
    }

    /// 设置气体粒子数，其余类型清零
    pub fn set_gas_count(&mut self, n: usize) -> SnapshotResult<()> {
        let count = i32::try_from(n)
            .map_err(|_| SnapshotError::format(format!("粒子数 {n} 超出 i32 范围")))?;
        let total = n as u64;

        self.npart = [0; N_TYPES];
        self.npart_total = [0; N_TYPES];
        self.npart_total_high_word = [0; N_TYPES];
        self.npart[GAS_TYPE] = count;
        self.npart_total[GAS_TYPE] = total as u32;
        self.npart_total_high_word[GAS_TYPE] = (total >> 32) as u32;
        Ok(())
    }

    /// 本文件内的粒子总数
    pub fn n_particles(&self) -> usize {
        self.npart.iter().map(|&n| n.max(0) as usize).sum()
    }

    /// 全部文件的粒子总数（合并高低位）
    pub fn n_total(&self) -> u64 {
        self.npart_total
            .iter()
            .zip(&self.npart_total_high_word)
            .map(|(&lo, &hi)| ((hi as u64) << 32) | lo as u64)
            .sum()
    }

    /// 编码为 256 字节
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        let mut w = FieldWriter { buf: &mut buf, at: 0 };

        self.npart.iter().for_each(|&v| w.put(&v.to_ne_bytes()));
        self.massarr.iter().for_each(|&v| w.put(&v.to_ne_bytes()));
        w.put(&self.time.to_ne_bytes());
        w.put(&self.redshift.to_ne_bytes());
        w.put(&self.flag_sfr.to_ne_bytes());
        w.put(&self.flag_feedback.to_ne_bytes());
        self.npart_total.iter().for_each(|&v| w.put(&v.to_ne_bytes()));
        w.put(&self.flag_cooling.to_ne_bytes());
        w.put(&self.num_files.to_ne_bytes());
        w.put(&self.box_size.to_ne_bytes());
        w.put(&self.omega0.to_ne_bytes());
        w.put(&self.omega_lambda.to_ne_bytes());
        w.put(&self.hubble_param.to_ne_bytes());
        w.put(&self.flag_stellarage.to_ne_bytes());
        w.put(&self.flag_metals.to_ne_bytes());
        self.npart_total_high_word
            .iter()
            .for_each(|&v| w.put(&v.to_ne_bytes()));
        w.put(&self.flag_entropy_instead_u.to_ne_bytes());

        buf
    }

    /// 从 256 字节解码
    pub fn from_bytes(bytes: &[u8]) -> SnapshotResult<Self> {
        if bytes.len() != HEADER_SIZE {
            return Err(SnapshotError::format(format!(
                "头部长度 {} 字节, 应为 {HEADER_SIZE}",
                bytes.len()
            )));
        }
        let mut r = FieldReader { buf: bytes, at: 0 };

        let npart = [(); N_TYPES].map(|_| i32::from_ne_bytes(r.take()));
        let massarr = [(); N_TYPES].map(|_| f64::from_ne_bytes(r.take()));
        let time = f64::from_ne_bytes(r.take());
        let redshift = f64::from_ne_bytes(r.take());
        let flag_sfr = i32::from_ne_bytes(r.take());
        let flag_feedback = i32::from_ne_bytes(r.take());
        let npart_total = [(); N_TYPES].map(|_| u32::from_ne_bytes(r.take()));
        let flag_cooling = i32::from_ne_bytes(r.take());
        let num_files = i32::from_ne_bytes(r.take());
        let box_size = f64::from_ne_bytes(r.take());
        let omega0 = f64::from_ne_bytes(r.take());
        let omega_lambda = f64::from_ne_bytes(r.take());
        let hubble_param = f64::from_ne_bytes(r.take());
        let flag_stellarage = i32::from_ne_bytes(r.take());
        let flag_metals = i32::from_ne_bytes(r.take());
        let npart_total_high_word = [(); N_TYPES].map(|_| u32::from_ne_bytes(r.take()));
        let flag_entropy_instead_u = i32::from_ne_bytes(r.take());

        Ok(Self {
            npart,
            massarr,
            time,
            redshift,
            flag_sfr,
            flag_feedback,
            npart_total,
            flag_cooling,
            num_files,
            box_size,
            omega0,
            omega_lambda,
            hubble_param,
            flag_stellarage,
            flag_metals,
            npart_total_high_word,
            flag_entropy_instead_u,
        })
    }
}

/// 顺序写入定长缓冲区
struct FieldWriter<'a> {
    buf: &'a mut [u8; HEADER_SIZE],
    at: usize,
}

impl FieldWriter<'_> {
    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.at..self.at + bytes.len()].copy_from_slice(bytes);
        self.at += bytes.len();
    }
}

/// 顺序读取定长缓冲区，调用方保证长度足够
struct FieldReader<'a> {
    buf: &'a [u8],
    at: usize,
}

impl FieldReader<'_> {
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.at..self.at + N]);
        self.at += N;
        out
    }
}
