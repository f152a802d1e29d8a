// 该文件是 Fangtu （房图） 项目的一部分。
// src/input.rs - 户型图文件输入
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

use std::path::{Path, PathBuf};

use image::{ImageReader, RgbImage};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum DecodeError {
  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Image loading error: {0}")]
  ImageLoadError(#[from] image::ImageError),
}

/// 源图像元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageMeta {
  pub width: u32,
  pub height: u32,
  pub path: String,
}

/// 已加载的户型图
#[derive(Debug, Clone)]
pub struct FloorPlan {
  pub image: RgbImage,
  pub meta: ImageMeta,
}

impl FloorPlan {
  pub fn open(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
    let path = path.as_ref();
    let image = ImageReader::open(path)
      .and_then(|reader| reader.with_guessed_format())
      .map_err(|err| {
        error!("无法打开图片文件 {}: {}", path.display(), err);
        err
      })?
      .decode()
      .map_err(|err| {
        error!("无法解码图片文件 {}: {}", path.display(), err);
        err
      })?
      .to_rgb8();

    debug!(
      "已加载 {}: {}x{}",
      path.display(),
      image.width(),
      image.height()
    );
    Ok(Self::from_image(image, path.to_path_buf()))
  }

  pub fn from_image(image: RgbImage, path: PathBuf) -> Self {
    let meta = ImageMeta {
      width: image.width(),
      height: image.height(),
      path: path.to_string_lossy().into_owned(),
    };
    Self { image, meta }
  }
}
