//! # 错误类型模块
//!
//! 隐写编解码器可能产生的全部错误。编解码器本身从不打印或重试，
//! 所有错误都原样交给直接调用方处理。

use thiserror::Error;

/// 编解码操作的 `Result` 别名。
pub type Result<T> = std::result::Result<T, CodecError>;

/// 隐写编解码过程中可能出现的错误。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// 位深不在 [1, 8] 范围内。构造失败，调用方不应继续。
    #[error("bits per channel must be in the range [1, 8], got {bits}")]
    InvalidParameter { bits: u8 },

    /// 载荷超出图像容量，或超出 32 位长度字段能表示的范围。
    /// 此时图像未被修改，调用方可以换参数或换图像重试。
    #[error("payload of {required} bytes exceeds the available capacity of {available} bytes")]
    CapacityExceeded { required: usize, available: usize },

    /// 图像总容量不足 32 bits，连长度头部都放不下。
    #[error("image too small for the length header: only {capacity_bits} bits available")]
    CorruptOrTooSmall { capacity_bits: u64 },

    /// 头部声明的长度超出图像实际能容纳的位数。
    /// 图像从未被编码，或解码位深与编码时不一致，都会表现为此错误。
    #[error("invalid payload length: header declares {declared} bytes but the image holds {available_bits} bits")]
    InvalidPayload { declared: u32, available_bits: u64 },
}
