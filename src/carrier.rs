//! # 演示载体模块
//!
//! 生成一张笑脸图像，作为 `demo` 子命令和测试使用的隐写载体。

use crate::constants::DEMO_CARRIER_SIZE;
use image::{Rgb, RgbImage};

const FACE: Rgb<u8> = Rgb([250, 210, 40]);
const FEATURE: Rgb<u8> = Rgb([40, 30, 20]);

/// 生成边长为 `size` 的笑脸图像：渐变背景、黄色脸、两只眼睛和一道微笑。
pub fn smiley(size: u32) -> RgbImage {
    let s = size as f32;
    let center = s / 2.0;
    let face_radius = s * 0.42;
    let eye_radius = s * 0.05;
    let eyes = [(s * 0.35, s * 0.38), (s * 0.65, s * 0.38)];
    let (smile_inner, smile_outer) = (s * 0.22, s * 0.27);

    RgbImage::from_fn(size, size, |x, y| {
        let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
        let dist = |cx: f32, cy: f32| ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();

        if dist(center, center) > face_radius {
            let shade = (255.0 * py / s) as u8;
            return Rgb([shade / 2 + 64, 160, 255 - shade / 3]);
        }

        let on_eye = eyes.iter().any(|&(ex, ey)| dist(ex, ey) <= eye_radius);
        let d = dist(center, center);
        let on_smile = py > center + s * 0.05 && (smile_inner..=smile_outer).contains(&d);

        if on_eye || on_smile { FEATURE } else { FACE }
    })
}

/// `demo` 使用的 256×256 笑脸载体。
pub fn smiley_256() -> RgbImage {
    smiley(DEMO_CARRIER_SIZE)
}
