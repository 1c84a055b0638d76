//! # 错误类型模块
//!
//! 隐写核心返回的所有错误。命令行层在此之上使用 `anyhow` 附加上下文。

use std::io;
use thiserror::Error;

/// 位图结构本身不可用时的错误。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    #[error("buffer is {len} bytes, smaller than the 54-byte bitmap header")]
    TooSmall { len: usize },

    #[error("missing 'BM' signature")]
    BadSignature,

    #[error("unsupported DIB header size {size} (at least 40 is required)")]
    UnsupportedHeader { size: u32 },

    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("pixel array offset {offset} overlaps the {header_size}-byte headers")]
    PixelArrayOverlapsHeader { offset: u32, header_size: u64 },

    #[error("pixel array needs {required} bytes but the buffer only has {available}")]
    TruncatedPixelArray { required: usize, available: usize },
}

/// 嵌入与提取过程中可能出现的所有错误。
#[derive(Error, Debug)]
pub enum StegoError {
    #[error("invalid bitmap: {0}")]
    Format(#[from] FormatError),

    #[error("unsupported bit depth {bits_per_pixel}, only 24-bit bitmaps are supported")]
    UnsupportedFormat { bits_per_pixel: u16 },

    #[error("payload needs {required_bits} bits but the image can only hold {capacity_bits}")]
    Capacity {
        required_bits: u64,
        capacity_bits: u64,
    },

    #[error("payload of {len} bytes does not fit the 32-bit length prefix")]
    PayloadTooLarge { len: usize },

    /// 长度前缀声明的数据超出了图像容量：图像已损坏，或嵌入与提取使用了不同的模式。
    #[error(
        "hidden data claims {required_bits} bits but the image only holds {capacity_bits}; \
         the image is corrupted or was written with a different mode"
    )]
    TruncatedData {
        required_bits: u64,
        capacity_bits: u64,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, StegoError>;
