//! # 位编解码模块
//!
//! 负责字节与"位组"之间的转换，以及把位组写入 / 读出单个像素字节的最低位。
//! 一个位组是写入一个可寻址单元 (一个通道字节) 的 1 位或 2 位数据。
//!
//! 字节总是按最高位优先的顺序展开，编码端与解码端以相同顺序重组。

/// 每个可寻址单元携带的负载位数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDensity {
    /// `unit' = (unit & 0xFE) | bit`
    #[default]
    One,
    /// `unit' = (unit & 0xFC) | two_bits`
    Two,
}

impl BitDensity {
    pub const fn bits_per_unit(self) -> u32 {
        match self {
            BitDensity::One => 1,
            BitDensity::Two => 2,
        }
    }

    /// 单元中承载负载的低位掩码。
    pub const fn mask(self) -> u8 {
        match self {
            BitDensity::One => 0b01,
            BitDensity::Two => 0b11,
        }
    }
}

/// 负载写入的颜色通道。
///
/// 24 位 BMP 的像素在文件中按 B, G, R 的顺序存储。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    /// 按 B, G, R 顺序轮流写入每个像素的三个通道。
    #[default]
    All,
    Blue,
    Green,
    Red,
}

impl Channel {
    /// 通道在像素内的字节偏移。`All` 没有单一偏移。
    pub const fn index(self) -> Option<usize> {
        match self {
            Channel::All => None,
            Channel::Blue => Some(0),
            Channel::Green => Some(1),
            Channel::Red => Some(2),
        }
    }
}

/// 一次嵌入或提取所使用的完整模式。
///
/// 文件本身不记录模式，提取时必须传入与嵌入时相同的值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mode {
    pub density: BitDensity,
    pub channel: Channel,
}

impl Mode {
    pub const fn new(density: BitDensity, channel: Channel) -> Self {
        Self { density, channel }
    }
}

/// 按给定位密度进行位组展开、重组和 LSB 替换。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitCodec {
    density: BitDensity,
}

impl BitCodec {
    pub const fn new(density: BitDensity) -> Self {
        Self { density }
    }

    pub const fn density(&self) -> BitDensity {
        self.density
    }

    /// 一个字节展开后占用的单元数。
    pub const fn units_per_byte(&self) -> usize {
        (8 / self.density.bits_per_unit()) as usize
    }

    /// 编码 `byte_count` 个字节所需的单元数。
    pub const fn units_for(&self, byte_count: usize) -> usize {
        byte_count * self.units_per_byte()
    }

    /// `units` 个可寻址单元能容纳的位数。
    pub const fn capacity_bits(&self, units: usize) -> u64 {
        units as u64 * self.density.bits_per_unit() as u64
    }

    /// 把字节序列展开为位组序列，每个字节内最高位优先。
    pub fn expand<'a>(&self, bytes: &'a [u8]) -> impl Iterator<Item = u8> + 'a {
        let width = self.density.bits_per_unit();
        let mask = self.density.mask();
        bytes.iter().flat_map(move |&byte| {
            (0..8 / width)
                .rev()
                .map(move |group| (byte >> (group * width)) & mask)
        })
    }

    /// 把位组序列重组为最多 `byte_count` 个字节，是 [`BitCodec::expand`] 的逆操作。
    ///
    /// 位组不足时最后一个不完整的字节会被丢弃。
    pub fn pack(&self, groups: impl IntoIterator<Item = u8>, byte_count: usize) -> Vec<u8> {
        let width = self.density.bits_per_unit();
        let units_per_byte = self.units_per_byte();
        let mut bytes = Vec::with_capacity(byte_count);
        let mut current = 0u8;
        let mut filled = 0;

        for group in groups.into_iter().take(byte_count * units_per_byte) {
            current = (current << width) | (group & self.density.mask());
            filled += 1;
            if filled == units_per_byte {
                bytes.push(current);
                current = 0;
                filled = 0;
            }
        }

        bytes
    }

    /// 把位组写入单元的低位，其余高位保持不变。
    pub const fn inject(&self, unit: u8, group: u8) -> u8 {
        let mask = self.density.mask();
        (unit & !mask) | (group & mask)
    }

    /// 读取单元低位中的位组。
    pub const fn sample(&self, unit: u8) -> u8 {
        unit & self.density.mask()
    }
}
