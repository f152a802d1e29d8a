// 该文件是 Fangtu （房图） 项目的一部分。
// src/detector/region.rs - 房间区域检测
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

use image::{GrayImage, Luma, RgbImage, imageops::grayscale};
use imageproc::{
  contours::{BorderType, find_contours},
  point::Point,
};
use tracing::debug;

use crate::{
  detector::{DetectError, Detector, ensure_not_empty},
  room::{BoundingBox, Region, RoomCategory},
};

// 亮度高于该值视为背景
const BACKGROUND_THRESHOLD: u8 = 200;
// 小于图像面积 1% 的轮廓视为噪声
const MIN_AREA_RATIO: f64 = 0.01;

const LIVING_ROOM_AREA_RATIO: f64 = 0.20;
const HALLWAY_ASPECT_RATIO: f64 = 1.5;
const BATHROOM_ASPECT_RATIO: f64 = 0.7;
const BEDROOM_AREA_RATIO: f64 = 0.10;
const KITCHEN_AREA_RATIO: f64 = 0.05;

/// 按面积占比与宽高比判断房间类别，规则按顺序匹配，先命中者生效
pub fn classify(area_ratio: f64, aspect_ratio: f64) -> RoomCategory {
  if area_ratio >= LIVING_ROOM_AREA_RATIO {
    RoomCategory::LivingRoom
  } else if aspect_ratio >= HALLWAY_ASPECT_RATIO {
    RoomCategory::Hallway
  } else if aspect_ratio < BATHROOM_ASPECT_RATIO {
    RoomCategory::Bathroom
  } else if area_ratio >= BEDROOM_AREA_RATIO {
    RoomCategory::Bedroom
  } else if area_ratio >= KITCHEN_AREA_RATIO {
    RoomCategory::Kitchen
  } else {
    RoomCategory::Dining
  }
}

/// 轮廓多边形面积（鞋带公式）
pub fn contour_area(points: &[Point<i32>]) -> f64 {
  if points.len() < 3 {
    return 0.0;
  }
  let twice = points
    .iter()
    .zip(points.iter().cycle().skip(1))
    .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
    .sum::<i64>();
  twice.abs() as f64 / 2.0
}

/// 轮廓覆盖的像素数：Pick 定理 `A + B/2 + 1`，B 为轮廓上的像素
pub fn contour_pixel_count(points: &[Point<i32>]) -> f64 {
  if points.len() < 2 {
    return points.len() as f64;
  }
  contour_area(points) + points.len() as f64 / 2.0 + 1.0
}

/// 基于全局阈值与外轮廓的房间检测器
#[derive(Debug, Clone)]
pub struct RegionDetector {
  threshold: u8,
  min_area_ratio: f64,
}

impl Default for RegionDetector {
  fn default() -> Self {
    Self {
      threshold: BACKGROUND_THRESHOLD,
      min_area_ratio: MIN_AREA_RATIO,
    }
  }
}

impl RegionDetector {
  pub fn new(threshold: u8, min_area_ratio: f64) -> Self {
    Self {
      threshold,
      min_area_ratio,
    }
  }

  /// 前景（暗像素）为 255，背景为 0
  fn binarize(&self, gray: &GrayImage) -> GrayImage {
    let mut binary = GrayImage::new(gray.width(), gray.height());
    for (dst, src) in binary.pixels_mut().zip(gray.pixels()) {
      *dst = if src[0] > self.threshold {
        Luma([0])
      } else {
        Luma([255])
      };
    }
    binary
  }
}

impl Detector for RegionDetector {
  type Output = Vec<Region>;
  type Error = DetectError;

  fn detect(&self, image: &RgbImage) -> Result<Self::Output, Self::Error> {
    ensure_not_empty(image)?;

    let gray = grayscale(image);
    let binary = self.binarize(&gray);
    let total_area = image.width() as f64 * image.height() as f64;
    let min_area = total_area * self.min_area_ratio;

    let mut regions = Vec::new();
    for contour in find_contours::<i32>(&binary) {
      // 只保留最外层轮廓
      if contour.border_type != BorderType::Outer || contour.parent.is_some() {
        continue;
      }

      if contour_pixel_count(&contour.points) < min_area {
        continue;
      }
      let area = contour_area(&contour.points);

      let Some(bbox) = BoundingBox::enclosing(&contour.points) else {
        continue;
      };
      let aspect_ratio = bbox.width() as f64 / bbox.height().max(1) as f64;
      let area_ratio = area / total_area;
      let category = classify(area_ratio, aspect_ratio);

      debug!(
        "区域 {}: 面积占比 {:.3}, 宽高比 {:.2}, 包围盒 {:?}",
        category, area_ratio, aspect_ratio, bbox
      );

      regions.push(Region {
        category,
        bbox,
        boundary: contour.points,
        area,
      });
    }

    Ok(regions)
  }
}

pub fn detect_regions(image: &RgbImage) -> Result<Vec<Region>, DetectError> {
  RegionDetector::default().detect(image)
}
