//! # 命令处理逻辑模块
//!
//! 包含处理各子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::carrier::smiley_256;
use crate::cli::{CapacityArgs, DemoArgs, HideArgs, RecoverArgs};
use crate::constants::{
    DEMO_IMAGE_NAME, DEMO_MESSAGE, HIDDEN_IMAGE_PREFIX, RECOVERED_TEXT_EXTENSION,
    RECOVERED_TEXT_PREFIX,
};
use crate::grid::PixelGrid;
use crate::steganography::Steganography;
use anyhow::{Context, Result};
use colored::Colorize;
use image::{ImageResult, RgbImage, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

/// 读入的载体图像。带 alpha 的输入保持 RGBA，其余按 RGB 处理，
/// 保存时沿用相同的颜色类型。通道统一转换为 8 位。
enum Carrier {
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

impl Carrier {
    fn grid(&mut self) -> &mut dyn PixelGrid {
        match self {
            Carrier::Rgb(img) => img,
            Carrier::Rgba(img) => img,
        }
    }

    fn save(&self, path: &Path) -> ImageResult<()> {
        match self {
            Carrier::Rgb(img) => img.save(path),
            Carrier::Rgba(img) => img.save(path),
        }
    }
}

/// 读取图像并转换为 8 位像素网格。
fn load_image(path: &Path) -> Result<Carrier> {
    let img = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    Ok(if img.color().has_alpha() {
        Carrier::Rgba(img.to_rgba8())
    } else {
        Carrier::Rgb(img.to_rgb8())
    })
}

/// 确认可以写入 `path`：文件已存在且未指定 `--force` 时返回错误。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 在 `image` 所在目录下，以 `prefix + name` 构造新路径。
fn sibling_path(image: &Path, name: String) -> PathBuf {
    image
        .parent()
        .map_or_else(|| PathBuf::from(&name), |dir| dir.join(&name))
}

/// `hide` 的默认输出路径：`<目录>/doctored_<文件名>`。
pub fn default_hidden_path(image: &Path) -> PathBuf {
    let name = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    sibling_path(image, format!("{HIDDEN_IMAGE_PREFIX}{name}"))
}

/// `recover` 的默认输出路径：`<目录>/recovered_<文件名主干>.txt`。
pub fn default_recovered_path(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    sibling_path(
        image,
        format!("{RECOVERED_TEXT_PREFIX}{stem}.{RECOVERED_TEXT_EXTENSION}"),
    )
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和载荷、检查隐写空间是否足够、调用隐写核心写入载荷，
/// 最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径和位深的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件。
/// * 目标文件已存在且未指定 `--force`。
/// * 图像文件没有足够的空间来隐藏载荷。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_hidden_path(&args.image));
    ensure_writable(&dest, args.force)?;

    let mut picture = load_image(&args.image)?;

    let payload = match (&args.text, args.message) {
        (Some(path), _) => fs::read(path).with_context(|| {
            format!(
                "Unable to read text file: {}",
                path.to_string_lossy().red().bold()
            )
        })?,
        (None, Some(message)) => message.into_bytes(),
        (None, None) => anyhow::bail!("Nothing to hide: provide --text or --message."),
    };

    let mut codec = Steganography::new(picture.grid(), args.bits)?;
    let available = codec.capacity_bytes();

    anyhow::ensure!(
        payload.len() <= available,
        "Not enough space in the image to hide the text. \nRequired: {}, Available: {}",
        payload.len().to_string().red().bold(),
        available.to_string().green().bold()
    );

    codec.encode(&payload).with_context(|| {
        "Failed to hide the message in the image. \nThe payload may exceed the 32-bit length field."
    })?;

    picture.save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用隐写核心读出载荷，
/// 最后将恢复的内容写入目标文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 目标文件已存在且未指定 `--force`。
/// * 图像过小，或头部声明的长度不合法 (未隐藏数据或位深不一致)。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let dest = args
        .text
        .clone()
        .unwrap_or_else(|| default_recovered_path(&args.image));
    ensure_writable(&dest, args.force)?;

    let mut picture = load_image(&args.image)?;
    let codec = Steganography::new(picture.grid(), args.bits)?;

    let text = codec.decode().with_context(|| {
        format!(
            "Failed to recover the hidden message from '{}'. \nThe image may not contain a hidden message, or was hidden with a different --bits value.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    fs::write(&dest, text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令：打印并返回图像在给定位深下的载荷容量 (字节)。
pub fn handle_capacity(args: CapacityArgs) -> Result<usize> {
    let mut picture = load_image(&args.image)?;
    let capacity = Steganography::new(picture.grid(), args.bits)?.capacity_bytes();

    println!(
        "{} can hold {} bytes at {} bit(s) per channel.",
        args.image.to_string_lossy().green().bold(),
        capacity.to_string().green().bold(),
        args.bits
    );
    Ok(capacity)
}

/// 处理 'Demo' 命令：生成笑脸载体并隐藏固定消息，保存为 PNG 后重新读取校验。
///
/// 返回恢复出的消息。
pub fn handle_demo(args: DemoArgs) -> Result<String> {
    fs::create_dir_all(&args.output).with_context(|| {
        format!(
            "Unable to create output directory: {}",
            args.output.to_string_lossy().red().bold()
        )
    })?;
    let path = args.output.join(DEMO_IMAGE_NAME);

    let mut carrier = smiley_256();
    Steganography::new(&mut carrier, args.bits)?
        .encode(DEMO_MESSAGE.as_bytes())
        .context("Failed to encode the demo message")?;
    carrier.save(&path).with_context(|| {
        format!(
            "Unable to write demo image: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    let mut loaded = load_image(&path)?;
    let bytes = Steganography::new(loaded.grid(), args.bits)?.decode()?;
    let extracted = String::from_utf8(bytes).context("Recovered demo message is not valid UTF-8")?;

    anyhow::ensure!(
        extracted == DEMO_MESSAGE,
        "Demo round trip mismatch. \nExpected: {}, Extracted: {}",
        DEMO_MESSAGE.green().bold(),
        extracted.red().bold()
    );

    println!(
        "Extracted: {} (bits per channel = {}), saved: {}",
        extracted.green().bold(),
        args.bits,
        path.to_string_lossy().green().bold()
    );
    Ok(extracted)
}
