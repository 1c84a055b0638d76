use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

use bmp_lsb::{
    cli::{Cli, Commands},
    handler::{handle_hide, handle_inspect, handle_recover},
};

/// 初始化日志系统。
///
/// 默认只输出警告，`-v` 提高到 info，`-vv` 提高到 debug。
/// 设置了 `RUST_LOG` 时以环境变量为准。
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    let mut builder = Builder::new();
    builder
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(level)
        .parse_env(Env::default());
    builder.init();
}

/// 程序的主入口点
///
/// 负责解析命令行参数，并根据指定的子命令（`hide`、`recover` 或 `inspect`）
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();
    init_logger(cli.verbose);

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Hide(args) => handle_hide(args),
        Commands::Recover(args) => handle_recover(args),
        Commands::Inspect(args) => handle_inspect(args),
    }
}
