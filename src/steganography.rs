//! # 隐写核心模块
//!
//! 在像素网格各颜色通道的低位中写入/读出字节载荷。
//!
//! 比特流布局:
//!
//! * bits `[0, 32)`: 大端序 `u32` 载荷长度 (字节)。
//! * bits `[32, 32 + 8 * len)`: 载荷字节，每字节高位在前。
//!
//! 像素按行优先遍历 (y 外层、x 内层，均递增)，每个像素依次处理 r, g, b 通道，
//! 每个通道承载 `bits_per_channel` 位。

use crate::constants::{BITS_PER_BYTE, CHANNELS_PER_PIXEL, LENGTH_HEADER_BITS};
use crate::error::{CodecError, Result};
use crate::grid::{BitDepth, PixelGrid};

/// 计算网格在给定位深下的总通道位数: `width × height × 3 × bits`。
///
/// 超出 `u64` 范围时饱和为 `u64::MAX`。
pub fn capacity_bits<G: PixelGrid + ?Sized>(grid: &G, depth: BitDepth) -> u64 {
    u64::from(grid.width())
        .saturating_mul(u64::from(grid.height()))
        .saturating_mul(CHANNELS_PER_PIXEL)
        .saturating_mul(u64::from(depth.get()))
}

/// 计算网格扣除 32 位长度头部后还能容纳的载荷字节数。
///
/// 总位数不超过 32 时返回 0。纯函数，不修改网格。
pub fn capacity_bytes<G: PixelGrid + ?Sized>(grid: &G, depth: BitDepth) -> usize {
    let bits = capacity_bits(grid, depth);
    if bits <= LENGTH_HEADER_BITS {
        return 0;
    }
    usize::try_from((bits - LENGTH_HEADER_BITS) / BITS_PER_BYTE).unwrap_or(usize::MAX)
}

/// 把 `value` 的 `count` 个低位按高位在前的顺序展开为比特序列。
fn bits_msb_first(value: u32, count: u32) -> impl Iterator<Item = bool> {
    (0..count).rev().map(move |i| (value >> i) & 1 == 1)
}

/// 构造完整帧的比特流: 长度头部 + 载荷。
fn frame_bits(payload: &[u8], len: u32) -> impl Iterator<Item = bool> + '_ {
    bits_msb_first(len, 32).chain(
        payload
            .iter()
            .flat_map(|&byte| bits_msb_first(u32::from(byte), 8)),
    )
}

/// 从比特流中取出下一个通道要写入的值。
///
/// 比特流剩余不足 `count` 位时，右侧用 0 补齐。
fn next_chunk(bits: &mut impl Iterator<Item = bool>, count: u8) -> u8 {
    (0..count).fold(0u8, |acc, _| (acc << 1) | u8::from(bits.next().unwrap_or(false)))
}

/// 按行优先、r→g→b 的顺序读出网格所有通道低位组成的比特流。
fn grid_bits<G: PixelGrid + ?Sized>(grid: &G, depth: BitDepth) -> impl Iterator<Item = bool> + '_ {
    let (width, height) = (grid.width(), grid.height());
    (0..height)
        .flat_map(move |y| (0..width).map(move |x| (x, y)))
        .flat_map(move |(x, y)| grid.get_pixel(x, y).channels())
        .flat_map(move |channel| {
            bits_msb_first(u32::from(depth.extract(channel)), u32::from(depth.get()))
        })
}

/// 把接下来的 `count` 位按高位在前组装成整数。调用方保证比特流足够长。
fn read_bits(bits: &mut impl Iterator<Item = bool>, count: u32) -> u32 {
    bits.take(count as usize)
        .fold(0u32, |acc, bit| (acc << 1) | u32::from(bit))
}

/// 绑定到一个像素网格和固定位深的 LSB 编解码器。
///
/// 编解码器只借用网格，不拥有它；每次 `encode` / `decode` 都是一次独立的
/// 完整遍历，调用之间不保留任何状态。
#[derive(Debug)]
pub struct Steganography<'a, G: PixelGrid + ?Sized> {
    grid: &'a mut G,
    depth: BitDepth,
}

impl<'a, G: PixelGrid + ?Sized> Steganography<'a, G> {
    /// 创建编解码器。
    ///
    /// # Errors
    ///
    /// `bits_per_channel` 不在 [1, 8] 范围内时返回 [`CodecError::InvalidParameter`]。
    pub fn new(grid: &'a mut G, bits_per_channel: u8) -> Result<Self> {
        let depth = BitDepth::new(bits_per_channel)?;
        Ok(Self::with_depth(grid, depth))
    }

    /// 使用已校验的位深创建编解码器。
    pub fn with_depth(grid: &'a mut G, depth: BitDepth) -> Self {
        Self { grid, depth }
    }

    /// 使用默认位深 (1) 创建编解码器。
    pub fn with_default_depth(grid: &'a mut G) -> Self {
        Self::with_depth(grid, BitDepth::default())
    }

    pub fn bits_per_channel(&self) -> u8 {
        self.depth.get()
    }

    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    /// 当前网格和位深下的载荷容量 (字节)。
    pub fn capacity_bytes(&self) -> usize {
        capacity_bytes(&*self.grid, self.depth)
    }

    /// 把 `payload` 写入网格通道的低位。
    ///
    /// 容量检查在任何修改之前完成：要么整帧写入成功，要么网格保持原样。
    /// 比特流写完后立即停止，后续像素和通道不会被触碰。
    ///
    /// 总容量不足 32 bits 的网格上，空载荷仍会成功写入被截断的长度头部，
    /// 但之后的 [`decode`](Self::decode) 会返回 [`CodecError::CorruptOrTooSmall`]。
    ///
    /// # Errors
    ///
    /// 载荷超过容量或超过 `u32::MAX` 字节时返回 [`CodecError::CapacityExceeded`]，
    /// 此时网格未被修改。
    pub fn encode(&mut self, payload: &[u8]) -> Result<()> {
        let available = self.capacity_bytes();
        let len = u32::try_from(payload.len())
            .ok()
            .filter(|_| payload.len() <= available)
            .ok_or(CodecError::CapacityExceeded {
                required: payload.len(),
                available,
            })?;

        let bits_per_channel = self.depth.get();
        let mut bits = frame_bits(payload, len).peekable();

        'walk: for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                if bits.peek().is_none() {
                    break 'walk;
                }

                let mut color = self.grid.get_pixel(x, y);
                for channel in color.channels_mut() {
                    if bits.peek().is_none() {
                        break;
                    }
                    let chunk = next_chunk(&mut bits, bits_per_channel);
                    *channel = self.depth.embed(*channel, chunk);
                }
                self.grid.set_pixel(x, y, color);
            }
        }

        Ok(())
    }

    /// 从网格通道的低位中读出载荷。
    ///
    /// 唯一的合法性检查是头部声明的长度不能超过网格容量；
    /// 没有校验和或魔数，因此无法可靠识别未编码的图像或位深不匹配。
    ///
    /// # Errors
    ///
    /// * 总容量不足 32 bits 时返回 [`CodecError::CorruptOrTooSmall`]。
    /// * 声明长度超出容量时返回 [`CodecError::InvalidPayload`]。
    pub fn decode(&self) -> Result<Vec<u8>> {
        let grid: &G = &*self.grid;
        let total_bits = capacity_bits(grid, self.depth);
        if total_bits < LENGTH_HEADER_BITS {
            return Err(CodecError::CorruptOrTooSmall {
                capacity_bits: total_bits,
            });
        }

        let mut bits = grid_bits(grid, self.depth);
        let declared = read_bits(&mut bits, 32);

        let needed_bits = LENGTH_HEADER_BITS + u64::from(declared) * BITS_PER_BYTE;
        if needed_bits > total_bits {
            return Err(CodecError::InvalidPayload {
                declared,
                available_bits: total_bits,
            });
        }

        Ok((0..declared).map(|_| read_bits(&mut bits, 8) as u8).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Color;
    use image::{Rgb, RgbImage};

    const MESSAGE: &[u8] = b"Hello world";

    /// 生成一个像素值各不相同的测试网格
    fn patterned(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let seed = x.wrapping_mul(31).wrapping_add(y.wrapping_mul(17));
            Rgb([seed as u8, (seed >> 1) as u8 ^ 0x5A, (seed * 7) as u8])
        })
    }

    fn depth(bits: u8) -> BitDepth {
        BitDepth::new(bits).unwrap()
    }

    #[test]
    fn capacity_matches_known_values() {
        assert_eq!(capacity_bytes(&RgbImage::new(1, 1), depth(1)), 0);
        assert_eq!(capacity_bytes(&RgbImage::new(2, 2), depth(1)), 0);
        assert_eq!(capacity_bytes(&RgbImage::new(2, 2), depth(8)), 8);
        assert_eq!(capacity_bytes(&RgbImage::new(256, 256), depth(1)), 24572);
        assert_eq!(capacity_bits(&RgbImage::new(256, 256), depth(4)), 786_432);
    }

    #[test]
    fn capacity_rounds_down_to_whole_bytes() {
        // 1×1, 8 位: 24 bits，连头部都放不下
        assert_eq!(capacity_bytes(&RgbImage::new(1, 1), depth(8)), 0);
        // 2×1, 8 位: 48 bits - 32 = 16 bits
        assert_eq!(capacity_bytes(&RgbImage::new(2, 1), depth(8)), 2);
        // 5×1, 3 位: 45 bits - 32 = 13 bits，只够 1 字节
        assert_eq!(capacity_bytes(&RgbImage::new(5, 1), depth(3)), 1);
        assert_eq!(capacity_bits(&RgbImage::new(1, 4), depth(1)), 12);
    }

    /// 只报告尺寸的虚拟网格
    struct Virtual(u32, u32);

    impl PixelGrid for Virtual {
        fn width(&self) -> u32 {
            self.0
        }

        fn height(&self) -> u32 {
            self.1
        }

        fn get_pixel(&self, _x: u32, _y: u32) -> Color {
            Color::default()
        }

        fn set_pixel(&mut self, _x: u32, _y: u32, _color: Color) {}
    }

    #[test]
    fn capacity_saturates_for_huge_grids() {
        let grid = Virtual(u32::MAX, u32::MAX);
        assert_eq!(capacity_bits(&grid, depth(8)), u64::MAX);
        assert_eq!(
            capacity_bytes(&grid, depth(8)),
            usize::try_from((u64::MAX - 32) / 8).unwrap_or(usize::MAX)
        );

        // 未溢出时仍是精确值
        let grid = Virtual(u32::MAX, 1);
        assert_eq!(capacity_bits(&grid, depth(1)), u64::from(u32::MAX) * 3);
    }

    #[test]
    fn empty_payload_on_header_less_grid_cannot_be_decoded() {
        let mut grid = RgbImage::from_pixel(1, 1, Rgb([0xFF, 0xFF, 0xFF]));
        let mut codec = Steganography::new(&mut grid, 1).unwrap();
        assert_eq!(codec.capacity_bytes(), 0);

        codec.encode(b"").unwrap();
        assert_eq!(
            codec.decode(),
            Err(CodecError::CorruptOrTooSmall { capacity_bits: 3 })
        );
        // 被截断的头部 (全 0) 已写入三个通道
        assert_eq!(*grid.get_pixel(0, 0), Rgb([0xFE, 0xFE, 0xFE]));
    }

    #[test]
    fn codec_reports_its_depth() {
        let mut grid = patterned(2, 2);
        let codec = Steganography::with_depth(&mut grid, depth(5));
        assert_eq!(codec.depth(), depth(5));
        assert_eq!(u8::from(codec.depth()), 5);
    }

    #[test]
    fn construction_validates_bit_depth() {
        let mut grid = patterned(4, 4);
        assert_eq!(
            Steganography::new(&mut grid, 0).unwrap_err(),
            CodecError::InvalidParameter { bits: 0 }
        );
        assert_eq!(
            Steganography::new(&mut grid, 9).unwrap_err(),
            CodecError::InvalidParameter { bits: 9 }
        );
        assert_eq!(Steganography::new(&mut grid, 1).unwrap().bits_per_channel(), 1);
        assert_eq!(Steganography::new(&mut grid, 8).unwrap().bits_per_channel(), 8);
        assert_eq!(Steganography::with_default_depth(&mut grid).bits_per_channel(), 1);
    }

    #[test]
    fn hello_world_round_trips_at_several_depths() {
        let mut encoded = Vec::new();
        for bits in [1, 2, 4] {
            let mut grid = patterned(256, 256);
            let mut codec = Steganography::new(&mut grid, bits).unwrap();
            codec.encode(MESSAGE).unwrap();
            assert_eq!(codec.decode().unwrap(), MESSAGE);
            encoded.push(grid);
        }
        assert_ne!(encoded[0], encoded[1]);
        assert_ne!(encoded[1], encoded[2]);
    }

    #[test]
    fn every_depth_round_trips_a_full_payload() {
        for bits in 1..=8 {
            let mut grid = patterned(9, 7);
            let mut codec = Steganography::new(&mut grid, bits).unwrap();
            let cap = codec.capacity_bytes();
            let payload: Vec<u8> = (0..cap).map(|i| (i * 37 + 11) as u8).collect();

            codec.encode(&payload).unwrap();
            assert_eq!(codec.decode().unwrap(), payload, "bits per channel = {bits}");

            codec.encode(b"").unwrap();
            assert!(codec.decode().unwrap().is_empty());
        }
    }

    #[test]
    fn oversized_payload_leaves_grid_untouched() {
        for bits in 1..=8 {
            let original = patterned(5, 5);
            let mut grid = original.clone();
            let mut codec = Steganography::new(&mut grid, bits).unwrap();
            let cap = codec.capacity_bytes();
            let payload = vec![0xAB; cap + 1];

            assert_eq!(
                codec.encode(&payload),
                Err(CodecError::CapacityExceeded {
                    required: cap + 1,
                    available: cap
                })
            );
            assert_eq!(grid, original);
        }
    }

    #[test]
    fn encode_only_touches_low_bits_of_the_frame() {
        let original = patterned(16, 16);
        let mut grid = original.clone();
        Steganography::new(&mut grid, 2)
            .unwrap()
            .encode(MESSAGE)
            .unwrap();

        // (32 + 88) bits / 2 = 60 个通道 = 20 个像素
        let touched_pixels = 20;
        for (i, (before, after)) in original.pixels().zip(grid.pixels()).enumerate() {
            for (b, a) in before.0.iter().zip(after.0.iter()) {
                assert_eq!(b & 0xFC, a & 0xFC, "high bits changed at pixel {i}");
                if i >= touched_pixels {
                    assert_eq!(b, a, "pixel {i} after the frame was modified");
                }
            }
        }
    }

    #[test]
    fn header_is_big_endian_length_msb_first() {
        let mut grid = RgbImage::new(20, 1);
        Steganography::new(&mut grid, 1)
            .unwrap()
            .encode(&[0x80])
            .unwrap();

        let lsbs: Vec<u8> = grid.pixels().flat_map(|p| p.0).map(|c| c & 1).collect();
        // 长度 1: 31 个 0 后跟一个 1
        assert!(lsbs[..31].iter().all(|&b| b == 0));
        assert_eq!(lsbs[31], 1);
        // 载荷 0x80: 1 后跟 7 个 0
        assert_eq!(&lsbs[32..40], &[1, 0, 0, 0, 0, 0, 0, 0]);
        assert!(lsbs[40..].iter().all(|&b| b == 0));
    }

    #[test]
    fn trailing_partial_chunk_is_zero_padded() {
        // 位深 3: 32 + 8 = 40 bits，第 14 个通道只剩 1 位有效
        let mut grid = RgbImage::from_pixel(5, 1, Rgb([0xFF, 0xFF, 0xFF]));
        let mut codec = Steganography::new(&mut grid, 3).unwrap();
        codec.encode(&[0xFF]).unwrap();
        assert_eq!(codec.decode().unwrap(), vec![0xFF]);

        let channels: Vec<u8> = grid.pixels().flat_map(|p| p.0).collect();
        // 第 14 个通道 (索引 13) 写入 1 和两个补齐的 0
        assert_eq!(channels[13] & 0x07, 0b100);
        // 之后的通道保持原样
        assert_eq!(channels[14], 0xFF);
    }

    #[test]
    fn decode_rejects_grids_without_room_for_a_header() {
        let mut grid = RgbImage::new(2, 2);
        let codec = Steganography::new(&mut grid, 2).unwrap();
        assert_eq!(
            codec.decode(),
            Err(CodecError::CorruptOrTooSmall { capacity_bits: 24 })
        );
    }

    #[test]
    fn decode_rejects_lengths_beyond_capacity() {
        let mut grid = RgbImage::from_pixel(4, 4, Rgb([0xFF, 0xFF, 0xFF]));
        let codec = Steganography::new(&mut grid, 1).unwrap();
        assert_eq!(
            codec.decode(),
            Err(CodecError::InvalidPayload {
                declared: u32::MAX,
                available_bits: 48
            })
        );
    }

    #[test]
    fn mismatched_depth_is_not_reliably_detected() {
        let mut grid = patterned(64, 64);
        Steganography::new(&mut grid, 1)
            .unwrap()
            .encode(MESSAGE)
            .unwrap();

        let result = Steganography::new(&mut grid, 2).unwrap().decode();
        assert_ne!(result.as_deref().ok(), Some(MESSAGE));
    }

    #[test]
    fn works_through_a_trait_object() {
        let mut grid = patterned(32, 32);
        let dyn_grid: &mut dyn PixelGrid = &mut grid;
        let mut codec = Steganography::new(dyn_grid, 3).unwrap();
        codec.encode(MESSAGE).unwrap();
        assert_eq!(codec.decode().unwrap(), MESSAGE);
        assert_ne!(PixelGrid::get_pixel(&grid, 0, 0), Color::default());
    }
}
