// 该文件是 Fangtu （房图） 项目的一部分。
// src/export.rs - 户型测量数据导出
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

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::{
  detector::DetectError,
  input::ImageMeta,
  output::SaveImageFileError,
  raster::RasterError,
  room::{BoundingBox, Region, RoomCategory},
};

const UNIT_METERS: &str = "meters";

/// 三维预览与数据导出失败，可恢复
#[derive(Error, Debug)]
pub enum ExportError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("保存图像文件错误: {0}")]
  SaveImageFileError(#[from] SaveImageFileError),
  #[error("检测房间失败: {0}")]
  DetectError(#[from] DetectError),
  #[error("绘制预览失败: {0}")]
  RasterError(#[from] RasterError),
  #[error("参数无效: {0}")]
  InvalidParameter(String),
}

fn round2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanDimensions {
  pub width: f64,
  pub length: f64,
  pub total_area: f64,
  pub unit: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoomDimensions {
  pub width: f64,
  pub length: f64,
  pub area: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomRecord {
  #[serde(rename = "type")]
  pub category: RoomCategory,
  pub dimensions: RoomDimensions,
  pub position: BoundingBox,
}

/// 一次导出得到的测量记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloorPlanRecord {
  pub dimensions: PlanDimensions,
  pub rooms: Vec<RoomRecord>,
  pub image: ImageMeta,
}

impl FloorPlanRecord {
  /// 两空格缩进的 JSON
  pub fn to_json(&self) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    std::fs::write(path, self.to_json()?)?;
    info!("户型数据已保存到 {}", path.display());
    Ok(())
  }
}

pub fn export(
  regions: &[Region],
  meta: &ImageMeta,
  pixels_per_meter: f64,
) -> Result<FloorPlanRecord, ExportError> {
  if !(pixels_per_meter.is_finite() && pixels_per_meter > 0.0) {
    return Err(ExportError::InvalidParameter(format!(
      "像素/米比例必须为正数: {}",
      pixels_per_meter
    )));
  }

  let width = meta.width as f64 / pixels_per_meter;
  let length = meta.height as f64 / pixels_per_meter;

  let rooms = regions
    .iter()
    .map(|region| {
      let width = region.bbox.width() as f64 / pixels_per_meter;
      let length = region.bbox.height() as f64 / pixels_per_meter;
      RoomRecord {
        category: region.category,
        dimensions: RoomDimensions {
          width: round2(width),
          length: round2(length),
          area: round2(width * length),
        },
        position: region.bbox,
      }
    })
    .collect();

  Ok(FloorPlanRecord {
    dimensions: PlanDimensions {
      width: round2(width),
      length: round2(length),
      total_area: round2(width * length),
      unit: UNIT_METERS,
    },
    rooms,
    image: meta.clone(),
  })
}
