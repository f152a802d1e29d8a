// 该文件是 Fangtu （房图） 项目的一部分。
// src/output.rs - 输出定义
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

use thiserror::Error;

use crate::{detector::DetectError, input::DecodeError, raster::RasterError};

pub trait Render<Frame, Output>: Sized {
  type Error;
  fn render_result(&self, frame: &Frame, result: &Output) -> Result<Frame, Self::Error>;
}

pub mod draw;
pub use self::draw::{Detections, Draw, RenderOptions, dimension_text};

pub mod enhance;

pub mod font;

mod save_image_file;
pub use self::save_image_file::{SaveImageFileError, SaveImageFileOutput};

#[derive(Error, Debug)]
pub enum RenderError {
  #[error("加载图像失败: {0}")]
  DecodeError(#[from] DecodeError),
  #[error("检测房间或墙体失败: {0}")]
  DetectError(#[from] DetectError),
  #[error("合成图像失败: {0}")]
  RasterError(#[from] RasterError),
  #[error("保存图像文件错误: {0}")]
  SaveImageFileError(#[from] SaveImageFileError),
}

/// 标签与尺寸标注失败，可恢复
#[derive(Error, Debug)]
pub enum AnnotationError {
  #[error("没有可用的字体")]
  FontUnavailable,
  #[error("读取字体文件失败: {0}")]
  FontReadError(#[from] std::io::Error),
  #[error("字体文件无效: {0}")]
  InvalidFont(String),
  #[error("图像过小，无法排版文字: 字号 {0}")]
  FontTooSmall(u32),
}
