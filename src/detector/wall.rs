// 该文件是 Fangtu （房图） 项目的一部分。
// src/detector/wall.rs - 墙体提取
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

use image::{RgbImage, imageops::grayscale};
use imageproc::{distance_transform::Norm, edges::canny, morphology::dilate};
use tracing::debug;

use crate::{
  detector::{DetectError, Detector, ensure_not_empty},
  raster::Mask,
};

const CANNY_LOW_THRESHOLD: f32 = 50.0;
const CANNY_HIGH_THRESHOLD: f32 = 150.0;
// L∞ 半径 1 即 3x3 结构元素
const DILATION_RADIUS: u8 = 1;

/// Canny 边缘加一次膨胀得到的墙体掩码
#[derive(Debug, Clone)]
pub struct WallExtractor {
  low_threshold: f32,
  high_threshold: f32,
  dilation_radius: u8,
}

impl Default for WallExtractor {
  fn default() -> Self {
    Self {
      low_threshold: CANNY_LOW_THRESHOLD,
      high_threshold: CANNY_HIGH_THRESHOLD,
      dilation_radius: DILATION_RADIUS,
    }
  }
}

impl WallExtractor {
  pub fn new(low_threshold: f32, high_threshold: f32) -> Self {
    Self {
      low_threshold,
      high_threshold,
      ..Default::default()
    }
  }
}

impl Detector for WallExtractor {
  type Output = Mask;
  type Error = DetectError;

  fn detect(&self, image: &RgbImage) -> Result<Self::Output, Self::Error> {
    ensure_not_empty(image)?;

    let gray = grayscale(image);
    let edges = canny(&gray, self.low_threshold, self.high_threshold);
    let thick = dilate(&edges, Norm::LInf, self.dilation_radius);
    let mask = Mask::from_gray(&thick);

    debug!("墙体像素: {}", mask.count());
    Ok(mask)
  }
}

pub fn extract_walls(image: &RgbImage) -> Result<Mask, DetectError> {
  WallExtractor::default().detect(image)
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::Rgb;
  use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};

  #[test]
  fn blank_page_has_no_walls() {
    let image = RgbImage::from_pixel(40, 30, Rgb([255, 255, 255]));
    let walls = extract_walls(&image).unwrap();
    assert_eq!(walls.dimensions(), (40, 30));
    assert_eq!(walls.count(), 0);
  }

  #[test]
  fn walls_follow_block_edges() {
    let mut image = RgbImage::from_pixel(60, 60, Rgb([255, 255, 255]));
    draw_filled_rect_mut(&mut image, Rect::at(20, 20).of_size(20, 20), Rgb([0, 0, 0]));

    let walls = extract_walls(&image).unwrap();

    assert_eq!(walls.dimensions(), (60, 60));
    assert!(walls.count() > 0);
    // 远离边缘处没有墙体
    assert!(!walls.get(5, 5));
    assert!(!walls.get(30, 30));
    // 左边缘附近有墙体
    assert!((17..=22).any(|x| walls.get(x, 30)));
  }

  #[test]
  fn empty_image_is_rejected() {
    assert!(extract_walls(&RgbImage::new(10, 0)).is_err());
  }
}
