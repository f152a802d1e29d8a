// 该文件是 Fangtu （房图） 项目的一部分。
// src/output/save_image_file.rs - 保存图像文件
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

use std::{
  fs::File,
  io::BufWriter,
  path::{Path, PathBuf},
};

use image::{
  RgbImage,
  codecs::jpeg::{JpegEncoder, PixelDensity},
};
use thiserror::Error;
use tracing::info;

const JPEG_QUALITY: u8 = 95;
const METERS_PER_INCH: f64 = 0.0254;

#[derive(Error, Debug)]
pub enum SaveImageFileError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("PNG 编码错误: {0}")]
  PngError(#[from] png::EncodingError),
}

/// 写出带 DPI 元数据的图像文件
#[derive(Debug, Clone)]
pub struct SaveImageFileOutput {
  path: PathBuf,
  dpi: u32,
}

fn dots_per_meter(dpi: u32) -> u32 {
  (dpi as f64 / METERS_PER_INCH).round() as u32
}

impl SaveImageFileOutput {
  pub fn new(path: impl Into<PathBuf>, dpi: u32) -> Self {
    Self {
      path: path.into(),
      dpi,
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn save_image(&self, image: &RgbImage) -> Result<(), SaveImageFileError> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    let extension = self
      .path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
      Some("png") => self.save_png(image)?,
      Some("jpg") | Some("jpeg") => self.save_jpeg(image)?,
      _ => image.save(&self.path)?,
    }

    info!("保存图像到文件: {}", self.path.display());
    Ok(())
  }

  fn save_png(&self, image: &RgbImage) -> Result<(), SaveImageFileError> {
    let writer = BufWriter::new(File::create(&self.path)?);
    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let density = dots_per_meter(self.dpi);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
      xppu: density,
      yppu: density,
      unit: png::Unit::Meter,
    }));
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    writer.finish()?;
    Ok(())
  }

  fn save_jpeg(&self, image: &RgbImage) -> Result<(), SaveImageFileError> {
    let mut writer = BufWriter::new(File::create(&self.path)?);
    let mut encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    encoder.set_pixel_density(PixelDensity::dpi(self.dpi.min(u16::MAX as u32) as u16));
    encoder.encode_image(image)?;
    Ok(())
  }
}
