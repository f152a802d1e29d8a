// 该文件是 Fangtu （房图） 项目的一部分。
// src/args.rs - 命令行参数
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

use std::path::PathBuf;

use clap::Parser;
use fangtu::{scheme::SchemeName, task::GeneratorConfig};

/// Fangtu 户型图增强工具
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入户型图
  #[arg(value_name = "INPUT")]
  pub input: PathBuf,

  /// 增强后的图像输出路径
  /// 支持格式: *.png（带 DPI）, *.jpg, *.jpeg（带 DPI）, *.bmp 等
  #[arg(short, long, value_name = "PATH")]
  pub output: Option<PathBuf>,

  /// 配色方案
  #[arg(short = 'c', long, value_enum, default_value_t = SchemeName::Modern)]
  pub color_scheme: SchemeName,

  /// 输出图像 DPI
  #[arg(short, long, default_value = "300", value_name = "INT")]
  pub dpi: u32,

  /// 不绘制整体尺寸
  #[arg(long)]
  pub no_dimensions: bool,

  /// 不绘制房间标签
  #[arg(long)]
  pub no_labels: bool,

  /// 同时生成三维预览（输出文件名加 `_3d` 后缀）
  #[arg(long = "3d")]
  pub three_d: bool,

  /// 导出测量数据 JSON 文件
  #[arg(long, value_name = "PATH")]
  pub export_data: Option<PathBuf>,

  /// 标注使用的 TrueType 字体
  #[arg(long, value_name = "FILE")]
  pub font: Option<PathBuf>,

  /// 三维预览的墙高（米）
  #[arg(long, default_value = "2.5", value_name = "METERS")]
  pub wall_height: f32,
}

impl Args {
  pub fn generator_config(&self) -> GeneratorConfig {
    GeneratorConfig {
      color_scheme: self.color_scheme,
      dpi: self.dpi,
      show_dimensions: !self.no_dimensions,
      show_labels: !self.no_labels,
      font: self.font.clone(),
      wall_height: self.wall_height,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::CommandFactory;

  #[test]
  fn command_is_well_formed() {
    Args::command().debug_assert();
  }

  #[test]
  fn defaults_follow_config() {
    let args = Args::try_parse_from(["fangtu", "plan.png"]).unwrap();
    assert_eq!(args.generator_config(), GeneratorConfig::default());
    assert!(args.output.is_none() && !args.three_d);
  }

  #[test]
  fn flags_are_parsed() {
    let args = Args::try_parse_from([
      "fangtu",
      "plan.png",
      "-o",
      "out.png",
      "-c",
      "blueprint",
      "-d",
      "150",
      "--no-labels",
      "--3d",
      "--export-data",
      "plan.json",
    ])
    .unwrap();
    assert_eq!(args.color_scheme, SchemeName::Blueprint);
    assert_eq!(args.dpi, 150);
    assert!(args.three_d);
    let config = args.generator_config();
    assert!(!config.show_labels && config.show_dimensions);
    assert_eq!(args.export_data, Some(PathBuf::from("plan.json")));
  }

  #[test]
  fn unknown_scheme_is_rejected() {
    assert!(Args::try_parse_from(["fangtu", "plan.png", "-c", "neon"]).is_err());
  }
}
