/// 每个通道允许使用的最少低位数。
pub const MIN_BITS_PER_CHANNEL: u8 = 1;

/// 每个通道允许使用的最多低位数 (即整个字节)。
pub const MAX_BITS_PER_CHANNEL: u8 = 8;

/// 调用方未指定位深时使用的默认值。
pub const DEFAULT_BITS_PER_CHANNEL: u8 = 1;

/// 每个像素参与隐写的颜色通道数 (R, G, B)，alpha 通道不参与。
pub const CHANNELS_PER_PIXEL: u64 = 3;

/// 长度头部占用的位数。
/// 载荷长度以大端序 `u32` 写在比特流最前面，共 32 bits。
pub const LENGTH_HEADER_BITS: u64 = 32;

/// 载荷中每个字节占用的位数。
pub const BITS_PER_BYTE: u64 = 8;

/// `hide` 未指定输出路径时，结果图像文件名的前缀。
pub const HIDDEN_IMAGE_PREFIX: &str = "doctored_";

/// `recover` 未指定输出路径时，恢复文本文件名的前缀。
pub const RECOVERED_TEXT_PREFIX: &str = "recovered_";

/// `recover` 默认输出文件的扩展名。
pub const RECOVERED_TEXT_EXTENSION: &str = "txt";

/// `demo` 子命令隐藏的固定消息。
pub const DEMO_MESSAGE: &str = "Hello world";

/// `demo` 子命令的默认输出目录。
pub const DEMO_OUTPUT_DIR: &str = "output/images";

/// `demo` 子命令写出的图像文件名。
pub const DEMO_IMAGE_NAME: &str = "stego_message.png";

/// 演示载体图像的边长 (像素)。
pub const DEMO_CARRIER_SIZE: u32 = 256;
