//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{ArgAction, Args, Parser, ValueEnum};
use std::path::PathBuf;

use crate::codec::{BitDensity, Channel, Mode};

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在未压缩的 24 位 BMP 图像中隐藏或恢复任意数据。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在未压缩的 24 位 BMP 图像中隐藏或恢复任意数据。"
)]
pub struct Cli {
    /// 提高日志详细程度 (-v 为 info，-vv 为 debug)。
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 inspect (查看)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在 24 位 BMP 图像中隐藏文件内容或一段消息。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的数据。
    Recover(RecoverArgs),

    /// 显示 BMP 头部信息以及各模式下的容量。
    Inspect(InspectArgs),
}

/// 每个通道字节使用的最低位数。
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitsArg {
    #[default]
    One,
    Two,
}

/// 承载数据的颜色通道。
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelArg {
    /// 按 B, G, R 顺序使用全部三个通道。
    #[default]
    All,
    Blue,
    Green,
    Red,
}

/// 嵌入与提取共用的模式参数。恢复时必须与隐藏时一致。
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct ModeArgs {
    /// 每个通道字节使用的最低位数。
    #[arg(short, long, value_enum, default_value_t = BitsArg::One)]
    pub bits: BitsArg,

    /// 承载数据的颜色通道。
    #[arg(short, long, value_enum, default_value_t = ChannelArg::All)]
    pub channel: ChannelArg,
}

impl From<ModeArgs> for Mode {
    fn from(args: ModeArgs) -> Self {
        let density = match args.bits {
            BitsArg::One => BitDensity::One,
            BitsArg::Two => BitDensity::Two,
        };
        let channel = match args.channel {
            ChannelArg::All => Channel::All,
            ChannelArg::Blue => Channel::Blue,
            ChannelArg::Green => Channel::Green,
            ChannelArg::Red => Channel::Red,
        };
        Mode::new(density, channel)
    }
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入 BMP 图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文件路径。
    #[arg(short, long, conflicts_with = "message", required_unless_present = "message")]
    pub text: Option<PathBuf>,

    /// 直接在命令行中给出的消息 (按 UTF-8 编码)。
    #[arg(short, long)]
    pub message: Option<String>,

    /// 隐写完成后保存结果图像的路径，默认为输入图像旁的 `doctored_<文件名>`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub mode: ModeArgs,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 保存恢复数据的路径，默认为输入图像旁的 `recovered_<文件名>.txt`。
    #[arg(short, long, conflicts_with = "stdout")]
    pub text: Option<PathBuf>,

    /// 以文本形式打印到标准输出，无效的 UTF-8 会被替换。
    #[arg(long)]
    pub stdout: bool,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub mode: ModeArgs,
}

/// 'inspect' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// 要查看的 BMP 图像路径。
    #[arg(short, long)]
    pub image: PathBuf,
}
