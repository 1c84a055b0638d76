//! # 位图头部解析模块
//!
//! 从原始字节缓冲区中校验并提取 BMP 的结构字段。
//! 所有多字节字段均为小端序。

use crate::constants::{
    BITS_PER_PIXEL_OFFSET, BMP_HEADER_SIZE, BMP_SIGNATURE, BYTES_PER_PIXEL, COLOR_PLANES_OFFSET,
    DIB_HEADER_SIZE_OFFSET, FILE_HEADER_SIZE, FILE_SIZE_OFFSET, HEIGHT_OFFSET, MIN_DIB_HEADER_SIZE,
    PIXEL_ARRAY_OFFSET_OFFSET, SUPPORTED_BITS_PER_PIXEL, WIDTH_OFFSET,
};
use crate::error::{FormatError, Result, StegoError};
use crate::traversal::row_stride;
use log::debug;

fn u16_le(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn i32_le(bytes: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// BITMAPFILEHEADER 与 BITMAPINFOHEADER 中隐写需要的字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    pub file_size: u32,
    pub pixel_array_offset: u32,
    pub dib_header_size: u32,
    pub width: i32,
    /// 为负数时像素行自上而下存储。
    pub height: i32,
    pub color_planes: u16,
    pub bits_per_pixel: u16,
}

impl BmpHeader {
    /// 解析缓冲区开头的头部。该函数只读取缓冲区，不做任何修改。
    ///
    /// # Errors
    ///
    /// * 缓冲区不足 54 字节时返回 [`FormatError::TooSmall`]。
    /// * 前两个字节不是 `BM` 时返回 [`FormatError::BadSignature`]。
    /// * DIB 头大小小于 40 时返回 [`FormatError::UnsupportedHeader`]。
    pub fn parse(bytes: &[u8]) -> std::result::Result<Self, FormatError> {
        if bytes.len() < BMP_HEADER_SIZE {
            return Err(FormatError::TooSmall { len: bytes.len() });
        }

        if bytes[..2] != BMP_SIGNATURE {
            return Err(FormatError::BadSignature);
        }

        let dib_header_size = u32_le(bytes, DIB_HEADER_SIZE_OFFSET);
        if dib_header_size < MIN_DIB_HEADER_SIZE {
            return Err(FormatError::UnsupportedHeader {
                size: dib_header_size,
            });
        }

        Ok(Self {
            file_size: u32_le(bytes, FILE_SIZE_OFFSET),
            pixel_array_offset: u32_le(bytes, PIXEL_ARRAY_OFFSET_OFFSET),
            dib_header_size,
            width: i32_le(bytes, WIDTH_OFFSET),
            height: i32_le(bytes, HEIGHT_OFFSET),
            color_planes: u16_le(bytes, COLOR_PLANES_OFFSET),
            bits_per_pixel: u16_le(bytes, BITS_PER_PIXEL_OFFSET),
        })
    }

    pub fn is_top_down(&self) -> bool {
        self.height < 0
    }

    /// 像素行数 (高度的绝对值)。
    pub fn rows(&self) -> usize {
        self.height.unsigned_abs() as usize
    }

    /// 每行的像素数。宽度为负数时返回 `None`。
    pub fn columns(&self) -> Option<usize> {
        usize::try_from(self.width).ok()
    }

    /// 当前位深度下的行跨距。
    pub fn stride(&self) -> Option<usize> {
        let bytes_per_pixel = usize::from(self.bits_per_pixel).div_ceil(8);
        self.columns()
            .map(|columns| row_stride(columns, bytes_per_pixel))
    }
}

/// 完整的位图文件内容及其已校验的头部。
///
/// 只能通过 [`BitmapImage::from_bytes`] 构造，因此每个实例都满足：
/// 位深度为 24，像素数组位于头部之后，且缓冲区包含完整的 (含行填充的) 像素数组。
#[derive(Debug, Clone)]
pub struct BitmapImage {
    bytes: Vec<u8>,
    header: BmpHeader,
}

impl BitmapImage {
    /// 取得缓冲区的所有权并校验它。
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let header = Self::validate(&bytes)?;
        Ok(Self { bytes, header })
    }

    /// 校验缓冲区是否为可隐写的 24 位位图，并返回其头部。
    ///
    /// # Errors
    ///
    /// * 头部无效时返回 [`StegoError::Format`]。
    /// * 位深度不是 24 时返回 [`StegoError::UnsupportedFormat`]。
    /// * 像素数组与文件头或 DIB 头重叠时返回 [`FormatError::PixelArrayOverlapsHeader`]。
    /// * 尺寸非法或像素数组超出缓冲区时返回 [`StegoError::Format`]。
    pub fn validate(bytes: &[u8]) -> Result<BmpHeader> {
        let header = BmpHeader::parse(bytes)?;
        debug!(
            "bitmap header: {}x{} px, {} bpp, {} plane(s), pixel array at {}, DIB header {} bytes, file size {}",
            header.width,
            header.height,
            header.bits_per_pixel,
            header.color_planes,
            header.pixel_array_offset,
            header.dib_header_size,
            header.file_size
        );

        if header.bits_per_pixel != SUPPORTED_BITS_PER_PIXEL {
            return Err(StegoError::UnsupportedFormat {
                bits_per_pixel: header.bits_per_pixel,
            });
        }

        // 像素数组必须位于两个头部之后，否则写入会破坏签名和头部字段
        let header_size = FILE_HEADER_SIZE as u64 + u64::from(header.dib_header_size);
        if u64::from(header.pixel_array_offset) < header_size {
            return Err(FormatError::PixelArrayOverlapsHeader {
                offset: header.pixel_array_offset,
                header_size,
            }
            .into());
        }

        let invalid_dimensions = FormatError::InvalidDimensions {
            width: header.width,
            height: header.height,
        };
        let columns = header.columns().ok_or(invalid_dimensions)?;
        let required = columns
            .checked_mul(BYTES_PER_PIXEL)
            .map(|_| row_stride(columns, BYTES_PER_PIXEL))
            .and_then(|stride| stride.checked_mul(header.rows()))
            .and_then(|pixels| pixels.checked_add(header.pixel_array_offset as usize))
            .ok_or(invalid_dimensions)?;

        if required > bytes.len() {
            return Err(FormatError::TruncatedPixelArray {
                required,
                available: bytes.len(),
            }
            .into());
        }

        Ok(header)
    }

    pub fn header(&self) -> &BmpHeader {
        &self.header
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
