/// BMP 文件头 (14 字节) 与 BITMAPINFOHEADER (40 字节) 合计的最小头部大小 (字节)。
pub const BMP_HEADER_SIZE: usize = 54;

/// BITMAPFILEHEADER 的大小 (字节)。DIB 头紧随其后。
pub const FILE_HEADER_SIZE: usize = 14;

/// 可接受的最小 DIB 头大小。小于该值的是 Windows 3.0 之前的 OS/2 旧格式头。
pub const MIN_DIB_HEADER_SIZE: u32 = 40;

/// 文件签名 `BM`。
pub const BMP_SIGNATURE: [u8; 2] = *b"BM";

/// 唯一支持的位深度：未压缩的 24 位 BGR。
pub const SUPPORTED_BITS_PER_PIXEL: u16 = 24;

/// 24 位图像中每个像素占用的字节数 (B, G, R)。
pub const BYTES_PER_PIXEL: usize = 3;

/// 像素行按该字节数对齐。
pub const ROW_ALIGNMENT: usize = 4;

/// 负载前面的长度前缀字节数 (小端序 `u32`)。
pub const LENGTH_PREFIX_BYTES: usize = 4;

// 头部字段偏移 (全部为小端序)。
pub const FILE_SIZE_OFFSET: usize = 2;
pub const PIXEL_ARRAY_OFFSET_OFFSET: usize = 10;
pub const DIB_HEADER_SIZE_OFFSET: usize = 14;
pub const WIDTH_OFFSET: usize = 18;
pub const HEIGHT_OFFSET: usize = 22;
pub const COLOR_PLANES_OFFSET: usize = 26;
pub const BITS_PER_PIXEL_OFFSET: usize = 28;
