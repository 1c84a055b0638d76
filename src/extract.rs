//! # 提取模块
//!
//! 按与嵌入完全相同的遍历顺序读取长度前缀和负载。

use crate::bmp::BitmapImage;
use crate::codec::{BitCodec, Mode};
use crate::constants::LENGTH_PREFIX_BYTES;
use crate::error::{Result, StegoError};
use crate::traversal::PixelTraversal;
use log::{debug, info, warn};

/// 从 `stego` 中恢复隐藏的原始字节。
///
/// `mode` 必须与嵌入时使用的模式一致；文件中没有记录模式的标记。
/// 返回的字节不做任何替换。
///
/// # Errors
///
/// * 位图结构无效或位深度不是 24 时返回格式错误。
/// * 图像容量装不下长度前缀，或装不下前缀声明的负载时返回 [`StegoError::TruncatedData`]。
pub fn extract(stego: &[u8], mode: Mode) -> Result<Vec<u8>> {
    let header = BitmapImage::validate(stego)?;

    let codec = BitCodec::new(mode.density);
    let traversal = PixelTraversal::for_mode(&header, mode);
    let capacity_bits = codec.capacity_bits(traversal.len());
    let prefix_bits = (LENGTH_PREFIX_BYTES * 8) as u64;

    if prefix_bits > capacity_bits {
        return Err(StegoError::TruncatedData {
            required_bits: prefix_bits,
            capacity_bits,
        });
    }

    let mut units = traversal
        .addresses()
        .map(|address| codec.sample(stego[address]));

    let prefix = codec.pack(units.by_ref(), LENGTH_PREFIX_BYTES);
    let declared_len = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
    let required_bits = prefix_bits + u64::from(declared_len) * 8;
    debug!(
        "length prefix declares {} bytes, {} of {} bits with {:?}",
        declared_len, required_bits, capacity_bits, mode
    );

    if required_bits > capacity_bits {
        return Err(StegoError::TruncatedData {
            required_bits,
            capacity_bits,
        });
    }

    let payload = codec.pack(units, declared_len as usize);
    info!("extracted {} bytes", payload.len());
    Ok(payload)
}

/// 以文本形式提取负载。
///
/// 无效的 UTF-8 序列被替换为 `U+FFFD`，而不是让整个操作失败。
pub fn extract_text(stego: &[u8], mode: Mode) -> Result<String> {
    let payload = extract(stego, mode)?;
    let text = String::from_utf8_lossy(&payload);
    if let std::borrow::Cow::Owned(_) = text {
        warn!("hidden payload is not valid UTF-8, invalid sequences were replaced");
    }
    Ok(text.into_owned())
}
