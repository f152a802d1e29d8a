// 该文件是 Fangtu （房图） 项目的一部分。
// src/output/draw.rs - 户型图重绘
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

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::{
  drawing::{draw_hollow_rect_mut, draw_text_mut, text_size},
  rect::Rect,
};
use tracing::{debug, warn};

use crate::{
  output::{AnnotationError, Render, RenderError, enhance},
  raster::{Mask, paint_mask},
  room::Region,
  scheme::ColorScheme,
};

// 渲染常量
pub const PIXELS_PER_METER: f64 = 40.0;
pub const DEFAULT_DPI: u32 = 300;
const BACKGROUND: [u8; 3] = [255, 255, 255];
const SHADOW_COLOR: [u8; 3] = [0, 0, 0];
const SHADOW_OFFSET: i32 = 1;
const LABEL_FONT_DIVISOR: u32 = 30;
const DIMENSION_FONT_DIVISOR: u32 = 40;
const DIMENSION_MARGIN: i32 = 10;
const CONTRAST_FACTOR: f32 = 1.2;
const SHARPNESS_FACTOR: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
  pub show_labels: bool,
  pub show_dimensions: bool,
  pub pixels_per_meter: f64,
  /// 仅作为输出文件的元数据
  pub dpi: u32,
}

impl Default for RenderOptions {
  fn default() -> Self {
    Self {
      show_labels: true,
      show_dimensions: true,
      pixels_per_meter: PIXELS_PER_METER,
      dpi: DEFAULT_DPI,
    }
  }
}

/// 同一张图上的房间与墙体检测结果
#[derive(Debug, Clone)]
pub struct Detections {
  pub regions: Vec<Region>,
  pub walls: Mask,
}

/// 整体尺寸标注文本，例如 `100.0m × 50.0m`
pub fn dimension_text(width: u32, height: u32, pixels_per_meter: f64) -> String {
  format!(
    "{:.1}m × {:.1}m",
    width as f64 / pixels_per_meter,
    height as f64 / pixels_per_meter
  )
}

pub struct Draw {
  scheme: &'static ColorScheme,
  options: RenderOptions,
  font: Option<FontArc>,
}

impl Draw {
  pub fn new(scheme: &'static ColorScheme, options: RenderOptions, font: Option<FontArc>) -> Self {
    Self {
      scheme,
      options,
      font,
    }
  }

  pub fn options(&self) -> &RenderOptions {
    &self.options
  }

  pub fn scheme(&self) -> &'static ColorScheme {
    self.scheme
  }

  pub fn font(&self) -> Option<&FontArc> {
    self.font.as_ref()
  }

  /// 白底画布上依次绘制墙体与房间填充，房间填充不会覆盖墙体像素
  pub fn compose(
    &self,
    width: u32,
    height: u32,
    regions: &[Region],
    walls: &Mask,
  ) -> Result<RgbImage, RenderError> {
    let mut canvas = RgbImage::from_pixel(width, height, Rgb(BACKGROUND));
    paint_mask(&mut canvas, walls, None, self.scheme.walls)?;

    for region in regions {
      let color = self.scheme.color_for(region.category);
      match Mask::from_polygon(width, height, &region.boundary) {
        Some(room) => paint_mask(&mut canvas, &room, Some(walls), color)?,
        None => {
          // 轮廓无法填充时退回到包围盒
          debug!("区域 {} 轮廓退化，使用包围盒填充", region.category);
          let (w, h) = (region.bbox.width(), region.bbox.height());
          if w == 0 || h == 0 {
            continue;
          }
          let room = Mask::from_rect(width, height, &region.bbox);
          paint_mask(&mut canvas, &room, Some(walls), color)?;
          let rect = Rect::at(region.bbox.x1 as i32, region.bbox.y1 as i32).of_size(w, h);
          draw_hollow_rect_mut(&mut canvas, rect, self.scheme.walls_rgb());
        }
      }
    }

    Ok(canvas)
  }

  fn font_for(&self, canvas: &RgbImage, divisor: u32) -> Result<(&FontArc, u32), AnnotationError> {
    let font = self.font.as_ref().ok_or(AnnotationError::FontUnavailable)?;
    let size = canvas.width().min(canvas.height()) / divisor;
    if size == 0 {
      return Err(AnnotationError::FontTooSmall(size));
    }
    Ok((font, size))
  }

  /// 在每个房间包围盒中心绘制带阴影的类别标签
  pub fn draw_labels(
    &self,
    canvas: &mut RgbImage,
    regions: &[Region],
  ) -> Result<(), AnnotationError> {
    let (font, size) = self.font_for(canvas, LABEL_FONT_DIVISOR)?;
    let scale = PxScale::from(size as f32);

    for region in regions {
      let label = region.category.to_label_str();
      let (text_width, _) = text_size(scale, font, &label);
      let center_x = ((region.bbox.x1 + region.bbox.x2) / 2) as i32;
      let text_y = ((region.bbox.y1 + region.bbox.y2) / 2) as i32;
      let text_x = center_x - (text_width / 2) as i32;

      draw_text_mut(
        canvas,
        Rgb(SHADOW_COLOR),
        text_x + SHADOW_OFFSET,
        text_y + SHADOW_OFFSET,
        scale,
        font,
        &label,
      );
      draw_text_mut(
        canvas,
        Rgb(self.scheme.text),
        text_x,
        text_y,
        scale,
        font,
        &label,
      );
    }
    Ok(())
  }

  /// 在右下角绘制整体尺寸
  pub fn draw_dimensions(&self, canvas: &mut RgbImage) -> Result<(), AnnotationError> {
    let (font, size) = self.font_for(canvas, DIMENSION_FONT_DIVISOR)?;
    let scale = PxScale::from(size as f32);
    let text = dimension_text(
      canvas.width(),
      canvas.height(),
      self.options.pixels_per_meter,
    );
    let (text_width, _) = text_size(scale, font, &text);
    let x = canvas.width() as i32 - text_width as i32 - DIMENSION_MARGIN;
    let y = canvas.height() as i32 - size as i32 - DIMENSION_MARGIN;

    draw_text_mut(
      canvas,
      Rgb(self.scheme.dimensions),
      x,
      y,
      scale,
      font,
      &text,
    );
    Ok(())
  }
}

impl Render<RgbImage, Detections> for Draw {
  type Error = RenderError;

  fn render_result(&self, frame: &RgbImage, result: &Detections) -> Result<RgbImage, Self::Error> {
    let (width, height) = frame.dimensions();
    let mut canvas = self.compose(width, height, &result.regions, &result.walls)?;

    if self.options.show_labels
      && let Err(err) = self.draw_labels(&mut canvas, &result.regions)
    {
      warn!("添加房间标签失败: {}", err);
    }

    if self.options.show_dimensions
      && let Err(err) = self.draw_dimensions(&mut canvas)
    {
      warn!("添加尺寸标注失败: {}", err);
    }

    let canvas = enhance::contrast(&canvas, CONTRAST_FACTOR);
    Ok(enhance::sharpness(&canvas, SHARPNESS_FACTOR))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    room::{BoundingBox, RoomCategory},
    scheme::{NEUTRAL_GRAY, SchemeName},
  };
  use imageproc::point::Point;

  fn modern() -> &'static ColorScheme {
    ColorScheme::by_name(SchemeName::Modern)
  }

  fn square_region(category: RoomCategory, x0: i32, y0: i32, x1: i32, y1: i32) -> Region {
    let boundary = vec![
      Point::new(x0, y0),
      Point::new(x1, y0),
      Point::new(x1, y1),
      Point::new(x0, y1),
    ];
    Region {
      category,
      bbox: BoundingBox::enclosing(&boundary).unwrap(),
      area: ((x1 - x0) * (y1 - y0)) as f64,
      boundary,
    }
  }

  fn no_overlays() -> RenderOptions {
    RenderOptions {
      show_labels: false,
      show_dimensions: false,
      ..Default::default()
    }
  }

  #[test]
  fn dimension_text_formats_meters() {
    assert_eq!(dimension_text(4000, 2000, PIXELS_PER_METER), "100.0m × 50.0m");
    assert_eq!(dimension_text(100, 60, PIXELS_PER_METER), "2.5m × 1.5m");
    // 25.05 与 0.15 在双精度下分别略大、略小于中点
    assert_eq!(dimension_text(1002, 6, PIXELS_PER_METER), "25.1m × 0.1m");
  }

  #[test]
  fn walls_are_never_overpainted() {
    let mut walls = Mask::new(30, 30);
    for i in 0..30 {
      walls.set(i, 15, true);
      walls.set(15, i, true);
    }
    let regions = vec![
      square_region(RoomCategory::Kitchen, 2, 2, 27, 27),
      square_region(RoomCategory::Unknown, 10, 10, 20, 20),
    ];
    let draw = Draw::new(modern(), no_overlays(), None);

    let canvas = draw.compose(30, 30, &regions, &walls).unwrap();

    for y in 0..30 {
      for x in 0..30 {
        if walls.get(x, y) {
          assert_eq!(canvas.get_pixel(x, y), &Rgb(modern().walls));
        }
      }
    }
    assert_eq!(canvas.get_pixel(3, 3), &Rgb(modern().kitchen));
    assert_eq!(canvas.get_pixel(12, 12), &Rgb(NEUTRAL_GRAY));
    assert_eq!(canvas.get_pixel(0, 0), &Rgb(BACKGROUND));
  }

  #[test]
  fn degenerate_contour_falls_back_to_bbox() {
    let region = Region {
      category: RoomCategory::Bedroom,
      bbox: BoundingBox::new(5, 5, 15, 12),
      boundary: vec![Point::new(5, 5), Point::new(14, 5)],
      area: 0.0,
    };
    let draw = Draw::new(modern(), no_overlays(), None);

    let canvas = draw.compose(20, 20, &[region], &Mask::new(20, 20)).unwrap();

    assert_eq!(canvas.get_pixel(5, 5), &Rgb(modern().walls));
    assert_eq!(canvas.get_pixel(14, 11), &Rgb(modern().walls));
    assert_eq!(canvas.get_pixel(8, 8), &Rgb(modern().bedroom));
    assert_eq!(canvas.get_pixel(16, 16), &Rgb(BACKGROUND));
  }

  #[test]
  fn render_keeps_input_dimensions() {
    let frame = RgbImage::from_pixel(64, 48, Rgb([255, 255, 255]));
    let detections = Detections {
      regions: vec![square_region(RoomCategory::LivingRoom, 4, 4, 40, 40)],
      walls: Mask::new(64, 48),
    };
    let draw = Draw::new(modern(), RenderOptions::default(), None);

    let enhanced = draw.render_result(&frame, &detections).unwrap();

    assert_eq!(enhanced.dimensions(), frame.dimensions());
  }

  #[test]
  fn missing_font_is_recoverable() {
    let draw = Draw::new(modern(), RenderOptions::default(), None);
    let mut canvas = RgbImage::new(100, 100);
    assert!(matches!(
      draw.draw_labels(&mut canvas, &[]),
      Err(AnnotationError::FontUnavailable)
    ));
    assert!(matches!(
      draw.draw_dimensions(&mut canvas),
      Err(AnnotationError::FontUnavailable)
    ));
  }

  #[test]
  fn mismatched_wall_mask_is_a_render_error() {
    let draw = Draw::new(modern(), no_overlays(), None);
    assert!(matches!(
      draw.compose(10, 10, &[], &Mask::new(5, 5)),
      Err(RenderError::RasterError(_))
    ));
  }
}
