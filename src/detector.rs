// 该文件是 Fangtu （房图） 项目的一部分。
// src/detector.rs - 检测器
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
use thiserror::Error;

pub trait Detector {
  type Output;
  type Error;

  fn detect(&self, image: &RgbImage) -> Result<Self::Output, Self::Error>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectError {
  #[error("空图像: {width}x{height}")]
  EmptyImage { width: u32, height: u32 },
}

pub(crate) fn ensure_not_empty(image: &RgbImage) -> Result<(), DetectError> {
  let (width, height) = image.dimensions();
  if width == 0 || height == 0 {
    return Err(DetectError::EmptyImage { width, height });
  }
  Ok(())
}

mod region;
pub use self::region::{
  RegionDetector, classify, contour_area, contour_pixel_count, detect_regions,
};

mod wall;
pub use self::wall::{WallExtractor, extract_walls};
