//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `inspect` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::bmp::{BitmapImage, BmpHeader};
use crate::cli::{HideArgs, InspectArgs, RecoverArgs};
use crate::codec::{BitDensity, Channel, Mode};
use crate::constants::LENGTH_PREFIX_BYTES;
use crate::embed::{capacity_bits, embed};
use crate::extract::{extract, extract_text};
use crate::storage::{load, store};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// 确认输入文件带有 `.bmp` 扩展名 (不区分大小写)。
fn ensure_bmp_extension(path: &Path) -> Result<()> {
    let is_bmp = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"));
    anyhow::ensure!(
        is_bmp,
        "Input file must have a .bmp extension: {}",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 除非指定了 `--force`，否则拒绝覆盖已存在的文件。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 在 `image` 所在目录下生成 `<prefix><名称>` 形式的路径。
fn sibling_path(image: &Path, file_name: String) -> PathBuf {
    image.with_file_name(file_name)
}

fn default_hidden_path(image: &Path) -> PathBuf {
    let name = image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image.bmp".to_string());
    sibling_path(image, format!("doctored_{name}"))
}

fn default_recovered_path(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    sibling_path(image, format!("recovered_{stem}.txt"))
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和负载、调用核心嵌入函数，最后将结果写入目标图像文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输入文件不是 `.bmp`，或目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像或负载文件。
/// * 图像不是受支持的 24 位 BMP，或没有足够的空间来隐藏负载。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    ensure_bmp_extension(&args.image)?;
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_hidden_path(&args.image));
    ensure_writable(&dest, args.force)?;

    let picture = load(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let payload = match (&args.text, &args.message) {
        (Some(path), _) => load(path).with_context(|| {
            format!(
                "Unable to read text file: {}",
                path.to_string_lossy().red().bold()
            )
        })?,
        (None, Some(message)) => message.clone().into_bytes(),
        (None, None) => anyhow::bail!("Nothing to hide. \nProvide either --text or --message."),
    };

    let header = BitmapImage::validate(&picture).with_context(|| {
        format!(
            "'{}' is not a supported bitmap.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let mode = Mode::from(args.mode);
    let hidden = embed(&picture, &payload, mode).with_context(|| {
        format!(
            "Failed to hide {} bytes in '{}'.",
            payload.len().to_string().red().bold(),
            args.image.to_string_lossy().red().bold()
        )
    })?;

    store(&dest, &hidden).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The data has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    println!(
        "Bits written: {}, capacity: {}",
        ((LENGTH_PREFIX_BYTES + payload.len()) * 8)
            .to_string()
            .green()
            .bold(),
        capacity_bits(&header, mode).to_string().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用核心提取函数，
/// 最后将恢复的数据写入目标文件或打印到标准输出。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输入文件不是 `.bmp`，或目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像文件。
/// * 图像中没有可用的隐藏数据，或模式与隐藏时不一致。
/// * 无法写入到目标文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    ensure_bmp_extension(&args.image)?;

    let picture = load(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    let mode = Mode::from(args.mode);
    let failure = || {
        format!(
            "Failed to recover hidden data from '{}'. \nThe image may not contain a hidden message, is corrupted, or was written with a different mode.",
            args.image.to_string_lossy().red().bold()
        )
    };

    if args.stdout {
        let text = extract_text(&picture, mode).with_context(failure)?;
        println!("{text}");
        return Ok(());
    }

    let dest = args
        .text
        .clone()
        .unwrap_or_else(|| default_recovered_path(&args.image));
    ensure_writable(&dest, args.force)?;

    let payload = extract(&picture, mode).with_context(failure)?;

    store(&dest, &payload).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The data has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 各模式下能隐藏的最大负载字节数 (扣除长度前缀)。
fn payload_capacity(header: &BmpHeader, mode: Mode) -> u64 {
    (capacity_bits(header, mode) / 8).saturating_sub(LENGTH_PREFIX_BYTES as u64)
}

/// 处理 'Inspect' 命令的执行逻辑。
///
/// 打印头部字段、行跨距以及每种模式下的负载容量。
///
/// # Errors
///
/// 无法读取图像文件，或图像不是受支持的 24 位 BMP 时返回错误。
pub fn handle_inspect(args: InspectArgs) -> Result<()> {
    let picture = load(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let header = BitmapImage::validate(&picture).with_context(|| {
        format!(
            "'{}' is not a supported bitmap.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    println!("{}", args.image.to_string_lossy().green().bold());
    println!("  file size:          {}", header.file_size);
    println!("  pixel array offset: {}", header.pixel_array_offset);
    println!("  DIB header size:    {}", header.dib_header_size);
    println!("  width x height:     {} x {}", header.width, header.height);
    println!(
        "  storage:            {}",
        if header.is_top_down() {
            "top-down"
        } else {
            "bottom-up"
        }
    );
    println!("  color planes:       {}", header.color_planes);
    println!("  bits per pixel:     {}", header.bits_per_pixel);
    if let Some(stride) = header.stride() {
        println!("  row stride:         {stride}");
    }

    println!("  payload capacity (bytes):");
    for density in [BitDensity::One, BitDensity::Two] {
        for channel in [Channel::All, Channel::Blue, Channel::Green, Channel::Red] {
            let mode = Mode::new(density, channel);
            println!(
                "    {:<5} bit(s), {:<5} {}",
                density.bits_per_unit(),
                format!("{channel:?}").to_lowercase(),
                payload_capacity(&header, mode).to_string().green().bold()
            );
        }
    }

    Ok(())
}
