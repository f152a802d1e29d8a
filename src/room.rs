// 该文件是 Fangtu （房图） 项目的一部分。
// src/room.rs - 房间区域定义
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

use imageproc::point::Point;
use serde::Serialize;

/// 房间类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomCategory {
  LivingRoom,
  Bedroom,
  Bathroom,
  Kitchen,
  Dining,
  Hallway,
  Outdoor,
  Unknown,
}

impl RoomCategory {
  pub fn key(&self) -> &'static str {
    match self {
      RoomCategory::LivingRoom => "living_room",
      RoomCategory::Bedroom => "bedroom",
      RoomCategory::Bathroom => "bathroom",
      RoomCategory::Kitchen => "kitchen",
      RoomCategory::Dining => "dining",
      RoomCategory::Hallway => "hallway",
      RoomCategory::Outdoor => "outdoor",
      RoomCategory::Unknown => "unknown",
    }
  }

  /// 显示用标签：下划线换成空格，每个单词首字母大写
  pub fn to_label_str(&self) -> String {
    self
      .key()
      .split('_')
      .map(|word| {
        let mut chars = word.chars();
        match chars.next() {
          Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
          None => String::new(),
        }
      })
      .collect::<Vec<_>>()
      .join(" ")
  }
}

impl std::fmt::Display for RoomCategory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.key())
  }
}

/// 像素坐标下的包围盒，x2/y2 不包含在内
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
  pub x1: u32,
  pub y1: u32,
  pub x2: u32,
  pub y2: u32,
}

impl BoundingBox {
  pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
    Self { x1, y1, x2, y2 }
  }

  pub fn width(&self) -> u32 {
    self.x2.saturating_sub(self.x1)
  }

  pub fn height(&self) -> u32 {
    self.y2.saturating_sub(self.y1)
  }

  pub fn center(&self) -> (f32, f32) {
    (
      (self.x1 + self.x2) as f32 / 2.0,
      (self.y1 + self.y2) as f32 / 2.0,
    )
  }

  /// 轮廓点的外接矩形
  pub fn enclosing(points: &[Point<i32>]) -> Option<Self> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points.iter().skip(1) {
      min_x = min_x.min(p.x);
      min_y = min_y.min(p.y);
      max_x = max_x.max(p.x);
      max_y = max_y.max(p.y);
    }
    Some(Self {
      x1: min_x.max(0) as u32,
      y1: min_y.max(0) as u32,
      x2: (max_x + 1).max(0) as u32,
      y2: (max_y + 1).max(0) as u32,
    })
  }
}

/// 检测得到的候选房间
#[derive(Debug, Clone)]
pub struct Region {
  pub category: RoomCategory,
  pub bbox: BoundingBox,
  pub boundary: Vec<Point<i32>>,
  /// 轮廓包围面积（像素²）
  pub area: f64,
}
