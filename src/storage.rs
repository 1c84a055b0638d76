//! # 文件读写模块
//!
//! 整个缓冲区一次性读入或写出。写出时先写入同目录下的临时文件，
//! 再原子地替换目标路径。

use crate::error::Result;
use log::debug;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// 读取完整的文件内容。I/O 错误原样向上传播。
pub fn load(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path)?;
    debug!("loaded {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// 原子地把 `bytes` 写入 `path`，已存在的文件会被替换。
pub fn store(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    debug!("stored {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
