//! # 像素网格模块
//!
//! 定义编解码器所依赖的最小图像能力：宽、高以及按坐标读写 RGB 颜色。
//! 具体的图像格式只需实现 [`PixelGrid`]，编解码器不依赖任何格式相关代码。

use crate::constants::{DEFAULT_BITS_PER_CHANNEL, MAX_BITS_PER_CHANNEL, MIN_BITS_PER_CHANNEL};
use crate::error::{CodecError, Result};
use image::{ImageBuffer, Rgb, RgbImage, Rgba, RgbaImage};

/// 一个像素的三个 8 位颜色通道。通道顺序 (r, g, b) 即隐写时的写入顺序。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// 按 r, g, b 顺序返回通道值。
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// 按 r, g, b 顺序返回通道的可变引用。
    pub fn channels_mut(&mut self) -> [&mut u8; 3] {
        [&mut self.r, &mut self.g, &mut self.b]
    }
}

/// 可被隐写的二维像素网格。
///
/// 坐标范围为 `[0, width) × [0, height)`，越界检查由实现方负责；
/// 编解码器只会访问范围内的坐标。
pub trait PixelGrid {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn get_pixel(&self, x: u32, y: u32) -> Color;
    fn set_pixel(&mut self, x: u32, y: u32, color: Color);
}

impl PixelGrid for RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn get_pixel(&self, x: u32, y: u32) -> Color {
        let Rgb([r, g, b]) = *ImageBuffer::get_pixel(self, x, y);
        Color::new(r, g, b)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.put_pixel(x, y, Rgb(color.channels()));
    }
}

/// alpha 通道不参与隐写，写回时保持原值。
impl PixelGrid for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn get_pixel(&self, x: u32, y: u32) -> Color {
        let Rgba([r, g, b, _]) = *ImageBuffer::get_pixel(self, x, y);
        Color::new(r, g, b)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let pixel = self.get_pixel_mut(x, y);
        let Rgba([_, _, _, a]) = *pixel;
        *pixel = Rgba([color.r, color.g, color.b, a]);
    }
}

/// 每个通道参与隐写的低位数，取值范围 [1, 8]。
///
/// 只能通过 [`BitDepth::new`] 构造，非法值会被直接拒绝而不是截断。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitDepth(u8);

impl BitDepth {
    /// 校验并构造位深。
    ///
    /// # Errors
    ///
    /// `bits` 不在 [1, 8] 范围内时返回 [`CodecError::InvalidParameter`]。
    pub fn new(bits: u8) -> Result<Self> {
        if (MIN_BITS_PER_CHANNEL..=MAX_BITS_PER_CHANNEL).contains(&bits) {
            Ok(Self(bits))
        } else {
            Err(CodecError::InvalidParameter { bits })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// 覆盖通道低位所用的掩码，例如位深 2 对应 `0b0000_0011`。
    pub fn mask(self) -> u8 {
        u8::MAX >> (MAX_BITS_PER_CHANNEL - self.0)
    }

    /// 只替换 `channel` 的低位，高位保持不变。
    pub fn embed(self, channel: u8, value: u8) -> u8 {
        let mask = self.mask();
        (channel & !mask) | (value & mask)
    }

    /// 读取 `channel` 的低位。
    pub fn extract(self, channel: u8) -> u8 {
        channel & self.mask()
    }
}

impl Default for BitDepth {
    fn default() -> Self {
        Self(DEFAULT_BITS_PER_CHANNEL)
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = CodecError;

    fn try_from(bits: u8) -> Result<Self> {
        Self::new(bits)
    }
}

impl From<BitDepth> for u8 {
    fn from(depth: BitDepth) -> Self {
        depth.0
    }
}
