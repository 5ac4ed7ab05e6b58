//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::constants::{
    DEFAULT_BITS_PER_CHANNEL, DEMO_OUTPUT_DIR, MAX_BITS_PER_CHANNEL, MIN_BITS_PER_CHANNEL,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// 一款基于多位 LSB 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 的 RGB 通道中隐藏或恢复数据。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于多位 LSB 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 的 RGB 通道中隐藏或恢复数据。\n每个通道使用的低位数可通过 --bits 在 1 到 8 之间调整。"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 在无损格式图像 (如 PNG, BMP) 中隐藏文本文件或消息。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的数据。
    Recover(RecoverArgs),

    /// 查询图像在给定位深下能隐藏的最大字节数。
    Capacity(CapacityArgs),

    /// 生成笑脸载体，隐藏 "Hello world"，保存后重新读取并校验。
    Demo(DemoArgs),
}

/// 解析 `--bits`，超出 [1, 8] 的值在参数解析阶段即被拒绝。
fn bits_parser() -> clap::builder::RangedI64ValueParser<u8> {
    clap::value_parser!(u8).range(i64::from(MIN_BITS_PER_CHANNEL)..=i64::from(MAX_BITS_PER_CHANNEL))
}

/// 'hide' 命令所需的参数。
#[derive(Args, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的内容所在的文件路径。
    #[arg(short, long, required_unless_present = "message", conflicts_with = "message")]
    pub text: Option<PathBuf>,

    /// 直接在命令行中给出要隐藏的消息。
    #[arg(short, long)]
    pub message: Option<String>,

    /// 结果图像的输出路径，默认为输入图像旁的 `doctored_<文件名>`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 每个颜色通道使用的低位数 (1-8)。
    #[arg(short, long, default_value_t = DEFAULT_BITS_PER_CHANNEL, value_parser = bits_parser())]
    pub bits: u8,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Args, Debug)]
pub struct RecoverArgs {
    /// 已隐藏数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复内容的输出路径，默认为输入图像旁的 `recovered_<文件名>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 隐藏时使用的每通道低位数 (1-8)，必须与隐藏时一致。
    #[arg(short, long, default_value_t = DEFAULT_BITS_PER_CHANNEL, value_parser = bits_parser())]
    pub bits: u8,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// 要查询的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 每个颜色通道使用的低位数 (1-8)。
    #[arg(short, long, default_value_t = DEFAULT_BITS_PER_CHANNEL, value_parser = bits_parser())]
    pub bits: u8,
}

/// 'demo' 命令所需的参数。
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// 演示图像的输出目录，不存在时自动创建。
    #[arg(short, long, default_value = DEMO_OUTPUT_DIR)]
    pub output: PathBuf,

    /// 每个颜色通道使用的低位数 (1-8)。
    #[arg(short, long, default_value_t = DEFAULT_BITS_PER_CHANNEL, value_parser = bits_parser())]
    pub bits: u8,
}
