//! # bmp_lsb 库
//!
//! 本库包含 BMP LSB 隐写工具的核心逻辑：头部解析、像素遍历、
//! 位编解码，以及在其之上的嵌入与提取操作。
//!
//! ```no_run
//! use bmp_lsb::{embed, extract, Mode};
//!
//! # fn main() -> bmp_lsb::Result<()> {
//! let cover = bmp_lsb::storage::load("cover.bmp".as_ref())?;
//! let hidden = embed(&cover, b"Hi", Mode::default())?;
//! assert_eq!(extract(&hidden, Mode::default())?, b"Hi");
//! # Ok(())
//! # }
//! ```

// 声明库包含的所有模块。

pub mod bmp;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod embed;
pub mod error;
pub mod extract;
pub mod handler;
pub mod storage;
pub mod traversal;

pub use bmp::{BitmapImage, BmpHeader};
pub use codec::{BitDensity, Channel, Mode};
pub use embed::embed;
pub use error::{FormatError, Result, StegoError};
pub use extract::{extract, extract_text};
