// 该文件是 Fangtu （房图） 项目的一部分。
// src/output/enhance.rs - 对比度与锐度后处理
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use image::RgbImage;
use imageproc::{filter::filter, kernel::Kernel};

const RGB_CHANNELS: usize = 3;

// 3x3 平滑核，中心权重 5，总和 13
const SMOOTH_WEIGHT: f32 = 1.0 / 13.0;
const SMOOTH_KERNEL: [f32; 9] = [
  SMOOTH_WEIGHT,
  SMOOTH_WEIGHT,
  SMOOTH_WEIGHT,
  SMOOTH_WEIGHT,
  5.0 * SMOOTH_WEIGHT,
  SMOOTH_WEIGHT,
  SMOOTH_WEIGHT,
  SMOOTH_WEIGHT,
  SMOOTH_WEIGHT,
];

/// 在退化图像与原图之间线性插值：`degenerate + factor * (image - degenerate)`
fn blend(degenerate: f32, value: f32, factor: f32) -> u8 {
  (degenerate + factor * (value - degenerate))
    .round()
    .clamp(0.0, 255.0) as u8
}

/// 单个像素的灰度，16 位定点系数并四舍五入
fn luma(pixel: &[u8]) -> u64 {
  (pixel[0] as u64 * 19595 + pixel[1] as u64 * 38470 + pixel[2] as u64 * 7471 + 0x8000) >> 16
}

/// 整幅图的平均灰度，取整
fn mean_luma(image: &RgbImage) -> f32 {
  let count = image.width() as u64 * image.height() as u64;
  if count == 0 {
    return 0.0;
  }
  let sum = image
    .as_raw()
    .chunks_exact(RGB_CHANNELS)
    .map(luma)
    .sum::<u64>();
  (sum as f64 / count as f64).round() as f32
}

/// 以整幅图的平均灰度为中心拉伸对比度
pub fn contrast(image: &RgbImage, factor: f32) -> RgbImage {
  let mean = mean_luma(image);
  let mut output = image.clone();
  for value in output.iter_mut() {
    *value = blend(mean, *value as f32, factor);
  }
  output
}

/// 以平滑结果为基准放大细节，最外一圈像素保持不变
pub fn sharpness(image: &RgbImage, factor: f32) -> RgbImage {
  let (width, height) = image.dimensions();
  let mut output = image.clone();
  if width < 3 || height < 3 {
    return output;
  }

  let smooth: RgbImage = filter(image, Kernel::new(&SMOOTH_KERNEL, 3, 3), |v: f32| {
    v.round().clamp(0.0, 255.0) as u8
  });

  for y in 1..height - 1 {
    for x in 1..width - 1 {
      let degenerate = smooth.get_pixel(x, y);
      let pixel = output.get_pixel_mut(x, y);
      for (value, &base) in pixel.0.iter_mut().zip(degenerate.0.iter()) {
        *value = blend(base as f32, *value as f32, factor);
      }
    }
  }
  output
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::Rgb;

  #[test]
  fn uniform_image_is_unchanged() {
    let image = RgbImage::from_pixel(8, 8, Rgb([120, 120, 120]));
    assert_eq!(contrast(&image, 1.2), image);
    assert_eq!(sharpness(&image, 1.5), image);
  }

  #[test]
  fn contrast_spreads_around_mean() {
    let mut image = RgbImage::from_pixel(2, 1, Rgb([100, 100, 100]));
    image.put_pixel(1, 0, Rgb([200, 200, 200]));
    let out = contrast(&image, 1.2);
    assert_eq!(out.get_pixel(0, 0), &Rgb([90, 90, 90]));
    assert_eq!(out.get_pixel(1, 0), &Rgb([210, 210, 210]));
  }

  #[test]
  fn contrast_saturates_white() {
    let mut image = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));
    image.put_pixel(0, 0, Rgb([0, 0, 0]));
    let out = contrast(&image, 1.2);
    assert_eq!(out.get_pixel(3, 3), &Rgb([255, 255, 255]));
    assert_eq!(out.get_pixel(0, 0), &Rgb([0, 0, 0]));
  }

  #[test]
  fn luma_rounds_to_nearest() {
    assert_eq!(luma(&[3, 3, 0]), 3);
    assert_eq!(luma(&[255, 255, 255]), 255);
    let out = contrast(&RgbImage::from_pixel(2, 2, Rgb([3, 3, 0])), 2.0);
    assert_eq!(out.get_pixel(0, 0), &Rgb([3, 3, 0]));
  }

  #[test]
  fn sharpness_matches_smooth_kernel() {
    let mut image = RgbImage::from_pixel(5, 5, Rgb([100, 100, 100]));
    image.put_pixel(2, 2, Rgb([150, 150, 150]));
    let out = sharpness(&image, 1.5);
    // 平滑值 1550/13 -> 119，119 + 1.5 * 31 = 165.5
    assert_eq!(out.get_pixel(2, 2), &Rgb([166, 166, 166]));
    // 平滑值 1350/13 -> 104，104 - 1.5 * 4 = 98
    assert_eq!(out.get_pixel(1, 1), &Rgb([98, 98, 98]));
    assert_eq!(out.get_pixel(0, 0), &Rgb([100, 100, 100]));
  }

  #[test]
  fn sharpness_boosts_isolated_pixel_and_keeps_border() {
    let mut image = RgbImage::from_pixel(5, 5, Rgb([100, 100, 100]));
    image.put_pixel(2, 2, Rgb([150, 150, 150]));
    image.put_pixel(4, 0, Rgb([10, 10, 10]));
    let out = sharpness(&image, 1.5);
    assert!(out.get_pixel(2, 2)[0] > 150);
    assert!(out.get_pixel(1, 1)[0] < 100);
    assert_eq!(out.get_pixel(4, 0), &Rgb([10, 10, 10]));
  }
}
