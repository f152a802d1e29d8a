// 该文件是 Fangtu （房图） 项目的一部分。
// src/raster.rs - 行优先的掩码缓冲区
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

use image::{GrayImage, Luma, RgbImage};
use imageproc::{drawing::draw_polygon_mut, point::Point};
use thiserror::Error;

use crate::room::BoundingBox;

const RGB_CHANNELS: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
  #[error("尺寸不匹配: 期望 {expected:?}, 实际 {actual:?}")]
  ShapeMismatch {
    expected: (u32, u32),
    actual: (u32, u32),
  },
}

/// 与图像对齐的布尔掩码，按行优先连续存储
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
  width: u32,
  height: u32,
  data: Box<[bool]>,
}

impl Mask {
  pub fn new(width: u32, height: u32) -> Self {
    Self {
      width,
      height,
      data: vec![false; width as usize * height as usize].into_boxed_slice(),
    }
  }

  /// 非零像素视为 true
  pub fn from_gray(image: &GrayImage) -> Self {
    let data = image.as_raw().iter().map(|&v| v > 0).collect::<Vec<_>>();
    Self {
      width: image.width(),
      height: image.height(),
      data: data.into_boxed_slice(),
    }
  }

  pub fn to_gray(&self) -> GrayImage {
    let data = self
      .data
      .iter()
      .map(|&v| if v { 255u8 } else { 0u8 })
      .collect::<Vec<_>>();
    // 长度由构造保证
    GrayImage::from_raw(self.width, self.height, data)
      .unwrap_or_else(|| GrayImage::new(self.width, self.height))
  }

  /// 填充多边形内部（含边界）；不足三个不同顶点时返回 None
  pub fn from_polygon(width: u32, height: u32, points: &[Point<i32>]) -> Option<Self> {
    let mut poly: Vec<Point<i32>> = Vec::with_capacity(points.len());
    for p in points {
      if poly.last() != Some(p) {
        poly.push(*p);
      }
    }
    while poly.len() > 1 && poly.first() == poly.last() {
      poly.pop();
    }

    let mut distinct = poly.clone();
    distinct.sort_by_key(|p| (p.y, p.x));
    distinct.dedup();
    if distinct.len() < 3 {
      return None;
    }

    let mut canvas = GrayImage::new(width, height);
    draw_polygon_mut(&mut canvas, &poly, Luma([255u8]));
    Some(Self::from_gray(&canvas))
  }

  pub fn from_rect(width: u32, height: u32, bbox: &BoundingBox) -> Self {
    let mut mask = Self::new(width, height);
    for y in bbox.y1..bbox.y2.min(height) {
      for x in bbox.x1..bbox.x2.min(width) {
        mask.set(x, y, true);
      }
    }
    mask
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  pub fn dimensions(&self) -> (u32, u32) {
    (self.width, self.height)
  }

  pub fn as_slice(&self) -> &[bool] {
    &self.data
  }

  fn index(&self, x: u32, y: u32) -> Option<usize> {
    (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
  }

  /// 越界坐标返回 false
  pub fn get(&self, x: u32, y: u32) -> bool {
    self.index(x, y).map(|i| self.data[i]).unwrap_or(false)
  }

  pub fn set(&mut self, x: u32, y: u32, value: bool) {
    if let Some(i) = self.index(x, y) {
      self.data[i] = value;
    }
  }

  pub fn count(&self) -> usize {
    self.data.iter().filter(|&&v| v).count()
  }

  fn check_shape(&self, width: u32, height: u32) -> Result<(), RasterError> {
    if (width, height) != self.dimensions() {
      return Err(RasterError::ShapeMismatch {
        expected: self.dimensions(),
        actual: (width, height),
      });
    }
    Ok(())
  }
}

/// 将 `mask` 为 true 且 `exclude` 为 false 的像素涂成 `color`
pub fn paint_mask(
  canvas: &mut RgbImage,
  mask: &Mask,
  exclude: Option<&Mask>,
  color: [u8; 3],
) -> Result<(), RasterError> {
  mask.check_shape(canvas.width(), canvas.height())?;
  if let Some(exclude) = exclude {
    exclude.check_shape(canvas.width(), canvas.height())?;
  }

  let pixels = canvas.chunks_exact_mut(RGB_CHANNELS);
  match exclude {
    Some(exclude) => {
      for ((pixel, &inside), &skip) in pixels.zip(mask.as_slice()).zip(exclude.as_slice()) {
        if inside && !skip {
          pixel.copy_from_slice(&color);
        }
      }
    }
    None => {
      for (pixel, &inside) in pixels.zip(mask.as_slice()) {
        if inside {
          pixel.copy_from_slice(&color);
        }
      }
    }
  }
  Ok(())
}

/// 以透明度 `alpha` 把 `color` 混合到掩码覆盖的像素上
pub fn blend_mask(
  canvas: &mut RgbImage,
  mask: &Mask,
  color: [u8; 3],
  alpha: f32,
) -> Result<(), RasterError> {
  mask.check_shape(canvas.width(), canvas.height())?;
  let alpha = alpha.clamp(0.0, 1.0);
  for (pixel, &inside) in canvas.chunks_exact_mut(RGB_CHANNELS).zip(mask.as_slice()) {
    if inside {
      for (dst, &src) in pixel.iter_mut().zip(color.iter()) {
        *dst = (src as f32 * alpha + *dst as f32 * (1.0 - alpha)).round() as u8;
      }
    }
  }
  Ok(())
}
