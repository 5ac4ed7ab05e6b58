use clap::Parser;

use stego_flow::{
    cli::{Cli, Commands},
    handler::{handle_capacity, handle_demo, handle_hide, handle_recover},
};

/// 程序的主入口点
///
/// 负责解析命令行参数，并根据指定的子命令
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Hide(args) => handle_hide(args),
        Commands::Recover(args) => handle_recover(args),
        Commands::Capacity(args) => handle_capacity(args).map(drop),
        Commands::Demo(args) => handle_demo(args).map(drop),
    }
}
