// 该文件是 Fangtu （房图） 项目的一部分。
// src/scheme.rs - 配色方案
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

use std::str::FromStr;

use clap::ValueEnum;
use image::Rgb;
use thiserror::Error;
use tracing::warn;

use crate::room::RoomCategory;

/// 未知类别使用的中性灰
pub const NEUTRAL_GRAY: [u8; 3] = [220, 220, 220];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
  #[error("未知的配色方案: {0}")]
  UnknownScheme(String),
}

/// 配色方案名称
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemeName {
  #[default]
  Modern,
  Minimal,
  Colorful,
  Blueprint,
}

impl SchemeName {
  pub fn as_str(&self) -> &'static str {
    match self {
      SchemeName::Modern => "modern",
      SchemeName::Minimal => "minimal",
      SchemeName::Colorful => "colorful",
      SchemeName::Blueprint => "blueprint",
    }
  }
}

impl FromStr for SchemeName {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "modern" => Ok(SchemeName::Modern),
      "minimal" => Ok(SchemeName::Minimal),
      "colorful" => Ok(SchemeName::Colorful),
      "blueprint" => Ok(SchemeName::Blueprint),
      _ => Err(ConfigError::UnknownScheme(s.to_string())),
    }
  }
}

/// 每个类别的 RGB 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
  pub walls: [u8; 3],
  pub text: [u8; 3],
  pub dimensions: [u8; 3],
  pub living_room: [u8; 3],
  pub bedroom: [u8; 3],
  pub bathroom: [u8; 3],
  pub kitchen: [u8; 3],
  pub dining: [u8; 3],
  pub hallway: [u8; 3],
  pub outdoor: [u8; 3],
}

const MODERN: ColorScheme = ColorScheme {
  walls: [40, 40, 40],
  text: [30, 30, 30],
  dimensions: [70, 70, 70],
  living_room: [200, 230, 255],
  bedroom: [180, 210, 250],
  bathroom: [190, 230, 240],
  kitchen: [255, 230, 200],
  dining: [240, 220, 210],
  hallway: [220, 220, 220],
  outdoor: [200, 240, 200],
};

const MINIMAL: ColorScheme = ColorScheme {
  walls: [30, 30, 30],
  text: [50, 50, 50],
  dimensions: [100, 100, 100],
  living_room: [240, 240, 240],
  bedroom: [230, 230, 230],
  bathroom: [220, 220, 220],
  kitchen: [210, 210, 210],
  dining: [200, 200, 200],
  hallway: [190, 190, 190],
  outdoor: [180, 180, 180],
};

const COLORFUL: ColorScheme = ColorScheme {
  walls: [50, 50, 50],
  text: [40, 40, 40],
  dimensions: [80, 80, 80],
  living_room: [200, 230, 180],
  bedroom: [180, 200, 250],
  bathroom: [170, 230, 240],
  kitchen: [250, 220, 170],
  dining: [240, 190, 210],
  hallway: [220, 220, 220],
  outdoor: [190, 240, 190],
};

const BLUEPRINT: ColorScheme = ColorScheme {
  walls: [255, 255, 255],
  text: [20, 50, 120],
  dimensions: [40, 70, 140],
  living_room: [200, 220, 255],
  bedroom: [180, 200, 240],
  bathroom: [170, 210, 230],
  kitchen: [190, 210, 220],
  dining: [200, 210, 230],
  hallway: [210, 220, 240],
  outdoor: [220, 230, 250],
};

impl ColorScheme {
  pub fn by_name(name: SchemeName) -> &'static ColorScheme {
    match name {
      SchemeName::Modern => &MODERN,
      SchemeName::Minimal => &MINIMAL,
      SchemeName::Colorful => &COLORFUL,
      SchemeName::Blueprint => &BLUEPRINT,
    }
  }

  /// 按名称查找配色方案，未知名称回退到 `modern`
  pub fn lookup(name: &str) -> &'static ColorScheme {
    match name.parse::<SchemeName>() {
      Ok(name) => Self::by_name(name),
      Err(err) => {
        warn!("{}，使用默认配色方案 modern", err);
        Self::by_name(SchemeName::default())
      }
    }
  }

  /// 类别对应的填充颜色
  pub fn color_for(&self, category: RoomCategory) -> [u8; 3] {
    match category {
      RoomCategory::LivingRoom => self.living_room,
      RoomCategory::Bedroom => self.bedroom,
      RoomCategory::Bathroom => self.bathroom,
      RoomCategory::Kitchen => self.kitchen,
      RoomCategory::Dining => self.dining,
      RoomCategory::Hallway => self.hallway,
      RoomCategory::Outdoor => self.outdoor,
      RoomCategory::Unknown => NEUTRAL_GRAY,
    }
  }

  pub fn walls_rgb(&self) -> Rgb<u8> {
    Rgb(self.walls)
  }
}
