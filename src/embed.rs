//! # 嵌入模块
//!
//! 把带长度前缀的负载写入 24 位位图像素字节的最低位。

use crate::bmp::{BitmapImage, BmpHeader};
use crate::codec::{BitCodec, Mode};
use crate::constants::LENGTH_PREFIX_BYTES;
use crate::error::{Result, StegoError};
use crate::traversal::PixelTraversal;
use log::{debug, info};

/// 在给定模式下，已校验位图能容纳的位数 (包含长度前缀)。
pub fn capacity_bits(header: &BmpHeader, mode: Mode) -> u64 {
    let traversal = PixelTraversal::for_mode(header, mode);
    BitCodec::new(mode.density).capacity_bits(traversal.len())
}

/// 构造 `小端序 u32 长度 || 负载` 形式的帧。
fn frame(payload: &[u8]) -> Result<Vec<u8>> {
    let len = u32::try_from(payload.len())
        .map_err(|_| StegoError::PayloadTooLarge { len: payload.len() })?;

    let mut framed = Vec::with_capacity(LENGTH_PREFIX_BYTES + payload.len());
    framed.extend_from_slice(&len.to_le_bytes());
    framed.extend_from_slice(payload);
    Ok(framed)
}

/// 把 `payload` 隐藏到 `cover` 的副本中并返回修改后的缓冲区。
///
/// `cover` 本身不会被修改。容量检查在任何写入之前完成，
/// 因此失败时不会产生半写入的输出。
///
/// # Errors
///
/// * 位图结构无效或位深度不是 24 时返回格式错误。
/// * 负载超过 `u32::MAX` 字节时返回 [`StegoError::PayloadTooLarge`]。
/// * 负载加长度前缀超出图像容量时返回 [`StegoError::Capacity`]。
pub fn embed(cover: &[u8], payload: &[u8], mode: Mode) -> Result<Vec<u8>> {
    let mut image = BitmapImage::from_bytes(cover.to_vec())?;
    let header = *image.header();
    let framed = frame(payload)?;

    let codec = BitCodec::new(mode.density);
    let traversal = PixelTraversal::for_mode(&header, mode);
    let required_bits = framed.len() as u64 * 8;
    let capacity_bits = codec.capacity_bits(traversal.len());
    debug!(
        "embedding {} payload bytes with {:?}: {} of {} bits, stride {}",
        payload.len(),
        mode,
        required_bits,
        capacity_bits,
        traversal.stride()
    );

    if required_bits > capacity_bits {
        return Err(StegoError::Capacity {
            required_bits,
            capacity_bits,
        });
    }

    let pixels = image.as_bytes_mut();
    for (address, group) in traversal.addresses().zip(codec.expand(&framed)) {
        pixels[address] = codec.inject(pixels[address], group);
    }

    info!(
        "embedded {} bytes ({} bits) into a {}x{} bitmap",
        payload.len(),
        required_bits,
        header.width,
        header.height
    );
    Ok(image.into_bytes())
}
