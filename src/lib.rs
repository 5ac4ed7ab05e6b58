//! # stego_flow 库
//!
//! 本库包含多位 LSB 隐写工具的核心逻辑：在像素网格 RGB 通道的低位中
//! 隐藏和恢复任意字节载荷，以及基于 `image` 的命令行前端。

// 声明库包含的所有模块。

pub mod carrier;
pub mod cli;
pub mod constants;
pub mod error;
pub mod grid;
pub mod handler;
pub mod steganography;

pub use error::CodecError;
pub use grid::{BitDepth, Color, PixelGrid};
pub use steganography::{Steganography, capacity_bits, capacity_bytes};
