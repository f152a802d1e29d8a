// 该文件是 Fangtu （房图） 项目的一部分。
// src/extrude.rs - 房间块体拉伸与三维预览
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
  drawing::{draw_line_segment_mut, draw_text_mut, text_size},
  point::Point,
};
use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::{
  export::ExportError,
  raster::{Mask, blend_mask},
  room::{Region, RoomCategory},
  scheme::ColorScheme,
};

pub const DEFAULT_WALL_HEIGHT: f32 = 2.5;
pub const PREVIEW_WIDTH: u32 = 1200;
pub const PREVIEW_HEIGHT: u32 = 1000;

const FLOOR_ALPHA: f32 = 0.7;
const VIEW_ELEVATION_DEG: f32 = 30.0;
const VIEW_AZIMUTH_DEG: f32 = 45.0;
// 坐标轴盒子的显示比例 x:y:z
const BOX_ASPECT: [f32; 3] = [4.0, 4.0, 3.0];
// z 轴上限比墙高多出的余量
const Z_HEADROOM: f32 = 1.0;
const PREVIEW_MARGIN: f32 = 60.0;
const LABEL_FONT_SIZE: f32 = 16.0;
const BACKGROUND: [u8; 3] = [255, 255, 255];
const EDGE_COLOR: [u8; 3] = [0, 0, 0];
const AXIS_COLOR: [u8; 3] = [170, 170, 170];

/// 固定的观察角度
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPreset {
  pub elevation_deg: f32,
  pub azimuth_deg: f32,
}

impl Default for ViewPreset {
  fn default() -> Self {
    Self {
      elevation_deg: VIEW_ELEVATION_DEG,
      azimuth_deg: VIEW_AZIMUTH_DEG,
    }
  }
}

impl ViewPreset {
  /// 屏幕右方向、屏幕上方向与指向观察者的方向
  fn basis(&self) -> (Vector3<f32>, Vector3<f32>, Vector3<f32>) {
    let (se, ce) = self.elevation_deg.to_radians().sin_cos();
    let (sa, ca) = self.azimuth_deg.to_radians().sin_cos();
    let right = Vector3::new(-sa, ca, 0.0);
    let up = Vector3::new(-se * ca, -se * sa, ce);
    let toward = Vector3::new(ce * ca, ce * sa, se);
    (right, up, toward)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloorQuad {
  pub category: RoomCategory,
  pub corners: [Point3<f32>; 4],
  /// 归一化到 0-1 的 RGB
  pub color: [f32; 3],
  pub alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
  pub bottom: Point3<f32>,
  pub top: Point3<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextAnchor {
  pub text: String,
  pub position: Point3<f32>,
}

/// 房间块体场景描述
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
  pub floors: Vec<FloorQuad>,
  pub walls: Vec<WallSegment>,
  pub labels: Vec<TextAnchor>,
  pub wall_height: f32,
  pub view: ViewPreset,
}

/// 把每个房间的包围盒拉伸成固定高度的块体
pub fn extrude(
  regions: &[Region],
  scheme: &ColorScheme,
  wall_height: f32,
) -> Result<Scene, ExportError> {
  if !(wall_height.is_finite() && wall_height > 0.0) {
    return Err(ExportError::InvalidParameter(format!(
      "墙高必须为正数: {}",
      wall_height
    )));
  }

  let mut scene = Scene {
    floors: Vec::with_capacity(regions.len()),
    walls: Vec::with_capacity(regions.len() * 4),
    labels: Vec::with_capacity(regions.len()),
    wall_height,
    view: ViewPreset::default(),
  };

  for region in regions {
    let (x1, y1) = (region.bbox.x1 as f32, region.bbox.y1 as f32);
    let (x2, y2) = (region.bbox.x2 as f32, region.bbox.y2 as f32);
    let corners = [
      Point3::new(x1, y1, 0.0),
      Point3::new(x2, y1, 0.0),
      Point3::new(x2, y2, 0.0),
      Point3::new(x1, y2, 0.0),
    ];
    let color = scheme.color_for(region.category).map(|c| c as f32 / 255.0);

    scene.floors.push(FloorQuad {
      category: region.category,
      corners,
      color,
      alpha: FLOOR_ALPHA,
    });
    scene
      .walls
      .extend(corners.iter().map(|&bottom| WallSegment {
        bottom,
        top: Point3::new(bottom.x, bottom.y, wall_height),
      }));
    scene.labels.push(TextAnchor {
      text: region.category.to_label_str(),
      position: Point3::new((x1 + x2) / 2.0, (y1 + y2) / 2.0, wall_height / 2.0),
    });
  }

  debug!(
    "三维场景: {} 个地面, {} 条竖边",
    scene.floors.len(),
    scene.walls.len()
  );
  Ok(scene)
}

/// 场景坐标到屏幕像素的正交投影
struct Projector {
  extent: Vector3<f32>,
  right: Vector3<f32>,
  up: Vector3<f32>,
  toward: Vector3<f32>,
  scale: f32,
  offset: (f32, f32),
}

impl Projector {
  fn new(view: &ViewPreset, extent: Vector3<f32>, width: u32, height: u32) -> Self {
    let (right, up, toward) = view.basis();
    let mut projector = Self {
      extent,
      right,
      up,
      toward,
      scale: 1.0,
      offset: (0.0, 0.0),
    };

    // 让坐标轴盒子的八个顶点刚好放进画布
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (f32::MAX, f32::MIN, f32::MAX, f32::MIN);
    for corner in projector.box_corners() {
      let (sx, sy) = projector.screen(&corner);
      min_x = min_x.min(sx);
      max_x = max_x.max(sx);
      min_y = min_y.min(sy);
      max_y = max_y.max(sy);
    }
    let avail_w = (width as f32 - 2.0 * PREVIEW_MARGIN).max(1.0);
    let avail_h = (height as f32 - 2.0 * PREVIEW_MARGIN).max(1.0);
    projector.scale = (avail_w / (max_x - min_x)).min(avail_h / (max_y - min_y));
    projector.offset = (
      width as f32 / 2.0 - (min_x + max_x) / 2.0 * projector.scale,
      height as f32 / 2.0 + (min_y + max_y) / 2.0 * projector.scale,
    );
    projector
  }

  fn normalize(&self, p: &Point3<f32>) -> Vector3<f32> {
    Vector3::new(
      (p.x / self.extent.x - 0.5) * BOX_ASPECT[0],
      (p.y / self.extent.y - 0.5) * BOX_ASPECT[1],
      (p.z / self.extent.z - 0.5) * BOX_ASPECT[2],
    )
  }

  fn screen(&self, p: &Point3<f32>) -> (f32, f32) {
    let n = self.normalize(p);
    (n.dot(&self.right), n.dot(&self.up))
  }

  fn project(&self, p: &Point3<f32>) -> (f32, f32) {
    let (sx, sy) = self.screen(p);
    (
      self.offset.0 + sx * self.scale,
      self.offset.1 - sy * self.scale,
    )
  }

  /// 沿视线方向的深度，越大越靠近观察者
  fn depth(&self, p: &Point3<f32>) -> f32 {
    self.normalize(p).dot(&self.toward)
  }

  fn box_corners(&self) -> [Point3<f32>; 8] {
    let (x, y, z) = (self.extent.x, self.extent.y, self.extent.z);
    [
      Point3::new(0.0, 0.0, 0.0),
      Point3::new(x, 0.0, 0.0),
      Point3::new(x, y, 0.0),
      Point3::new(0.0, y, 0.0),
      Point3::new(0.0, 0.0, z),
      Point3::new(x, 0.0, z),
      Point3::new(x, y, z),
      Point3::new(0.0, y, z),
    ]
  }
}

fn draw_edge(
  canvas: &mut RgbImage,
  projector: &Projector,
  a: &Point3<f32>,
  b: &Point3<f32>,
  color: [u8; 3],
) {
  draw_line_segment_mut(canvas, projector.project(a), projector.project(b), Rgb(color));
}

impl Scene {
  /// 把场景绘制成预览图；`plan_width`/`plan_height` 为原图像素尺寸
  pub fn render(
    &self,
    plan_width: u32,
    plan_height: u32,
    font: Option<&FontArc>,
  ) -> Result<RgbImage, ExportError> {
    if plan_width == 0 || plan_height == 0 {
      return Err(ExportError::InvalidParameter(format!(
        "户型图尺寸无效: {}x{}",
        plan_width, plan_height
      )));
    }

    let extent = Vector3::new(
      plan_width as f32,
      plan_height as f32,
      self.wall_height + Z_HEADROOM,
    );
    let projector = Projector::new(&self.view, extent, PREVIEW_WIDTH, PREVIEW_HEIGHT);
    let mut canvas = RgbImage::from_pixel(PREVIEW_WIDTH, PREVIEW_HEIGHT, Rgb(BACKGROUND));

    // 坐标轴盒子
    let corners = projector.box_corners();
    for i in 0..4 {
      draw_edge(&mut canvas, &projector, &corners[i], &corners[(i + 1) % 4], AXIS_COLOR);
      draw_edge(&mut canvas, &projector, &corners[i + 4], &corners[(i + 1) % 4 + 4], AXIS_COLOR);
      draw_edge(&mut canvas, &projector, &corners[i], &corners[i + 4], AXIS_COLOR);
    }

    // 由远及近绘制半透明地面
    let mut order: Vec<(f32, &FloorQuad)> = self
      .floors
      .iter()
      .map(|floor| {
        let depth = floor.corners.iter().map(|c| projector.depth(c)).sum::<f32>() / 4.0;
        (depth, floor)
      })
      .collect();
    order.sort_by(|a, b| a.0.total_cmp(&b.0));

    for (_, floor) in order {
      let polygon = floor
        .corners
        .iter()
        .map(|c| {
          let (x, y) = projector.project(c);
          Point::new(x.round() as i32, y.round() as i32)
        })
        .collect::<Vec<_>>();
      if let Some(mask) = Mask::from_polygon(PREVIEW_WIDTH, PREVIEW_HEIGHT, &polygon) {
        let color = floor.color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        blend_mask(&mut canvas, &mask, color, floor.alpha)?;
      }
      for i in 0..4 {
        draw_edge(
          &mut canvas,
          &projector,
          &floor.corners[i],
          &floor.corners[(i + 1) % 4],
          EDGE_COLOR,
        );
      }
    }

    for wall in &self.walls {
      draw_edge(&mut canvas, &projector, &wall.bottom, &wall.top, EDGE_COLOR);
    }

    if let Some(font) = font {
      let scale = PxScale::from(LABEL_FONT_SIZE);
      for label in &self.labels {
        let (x, y) = projector.project(&label.position);
        let (w, h) = text_size(scale, font, &label.text);
        draw_text_mut(
          &mut canvas,
          Rgb(EDGE_COLOR),
          x.round() as i32 - (w / 2) as i32,
          y.round() as i32 - (h / 2) as i32,
          scale,
          font,
          &label.text,
        );
      }
    }

    Ok(canvas)
  }
}
