//! # 像素遍历模块
//!
//! 生成隐写所访问的字节偏移序列。嵌入与提取必须得到完全相同的序列，
//! 否则恢复出的数据会静默损坏。
//!
//! 行的访问顺序按存储方向决定：自下而上存储 (高度为正，BMP 默认) 时
//! 从第 `|height| - 1` 行倒序访问到第 0 行；自上而下存储 (高度为负) 时
//! 从第 0 行顺序访问。行内总是从左到右。

use crate::bmp::BmpHeader;
use crate::codec::{Channel, Mode};
use crate::constants::{BYTES_PER_PIXEL, ROW_ALIGNMENT};

/// 计算含填充的行字节数，向上取整到 4 的倍数。
///
/// `bytes_per_pixel` 必须显式给出，`width_pixels` 始终以像素为单位。
pub const fn row_stride(width_pixels: usize, bytes_per_pixel: usize) -> usize {
    (width_pixels * bytes_per_pixel).div_ceil(ROW_ALIGNMENT) * ROW_ALIGNMENT
}

/// 可寻址单元的粒度。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing {
    /// 每个像素一个单元，即该像素中指定通道的字节 (0 = B, 1 = G, 2 = R)。
    Pixel { channel: usize },
    /// 每个通道一个单元，按 B, G, R 顺序。
    Channel,
}

impl From<Channel> for Addressing {
    fn from(channel: Channel) -> Self {
        match channel.index() {
            Some(channel) => Addressing::Pixel { channel },
            None => Addressing::Channel,
        }
    }
}

/// 已校验位图上的确定性遍历。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelTraversal {
    pixel_array_offset: usize,
    columns: usize,
    rows: usize,
    stride: usize,
    top_down: bool,
    addressing: Addressing,
}

impl PixelTraversal {
    /// 为 24 位位图创建遍历。
    ///
    /// 头部必须已通过 [`crate::bmp::BitmapImage::validate`] 校验；发布构建中负宽度按 0 列处理。
    pub fn new(header: &BmpHeader, addressing: Addressing) -> Self {
        debug_assert!(
            header.columns().is_some(),
            "traversal over an unvalidated header with width {}",
            header.width
        );
        let columns = header.columns().unwrap_or(0);
        Self {
            pixel_array_offset: header.pixel_array_offset as usize,
            columns,
            rows: header.rows(),
            stride: row_stride(columns, BYTES_PER_PIXEL),
            top_down: header.is_top_down(),
            addressing,
        }
    }

    pub fn for_mode(header: &BmpHeader, mode: Mode) -> Self {
        Self::new(header, mode.channel.into())
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    fn units_per_pixel(&self) -> usize {
        match self.addressing {
            Addressing::Pixel { .. } => 1,
            Addressing::Channel => BYTES_PER_PIXEL,
        }
    }

    /// 序列长度：像素模式为 `width * |height|`，通道模式为其 3 倍。
    pub fn len(&self) -> usize {
        self.columns * self.rows * self.units_per_pixel()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 第 `visit` 个被访问的行在像素数组中的行号。
    fn row_at(&self, visit: usize) -> usize {
        if self.top_down {
            visit
        } else {
            self.rows - 1 - visit
        }
    }

    /// 按访问顺序产生每个单元在文件缓冲区中的绝对字节偏移。
    pub fn addresses(&self) -> impl Iterator<Item = usize> + '_ {
        let units_per_row = self.columns * self.units_per_pixel();
        (0..self.rows).flat_map(move |visit| {
            let row_start = self.pixel_array_offset + self.row_at(visit) * self.stride;
            (0..units_per_row).map(move |unit| match self.addressing {
                Addressing::Pixel { channel } => row_start + unit * BYTES_PER_PIXEL + channel,
                // 通道字节在行内连续存放
                Addressing::Channel => row_start + unit,
            })
        })
    }
}
