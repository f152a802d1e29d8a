// 该文件是 Fangtu （房图） 项目的一部分。
// tests/pipeline.rs - 完整流程测试
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

use image::{Rgb, RgbImage};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};

use fangtu::task::{FloorPlanGenerator, GeneratorConfig, PipelineTask, Task};

fn work_dir(name: &str) -> PathBuf {
  let dir = std::env::temp_dir().join(format!("fangtu-it-{}-{}", std::process::id(), name));
  std::fs::create_dir_all(&dir).unwrap();
  dir
}

/// 200x100 白底，左侧一个大房间，右侧一个细长走廊
fn write_plan(dir: &PathBuf) -> PathBuf {
  let mut image = RgbImage::from_pixel(200, 100, Rgb([255, 255, 255]));
  draw_filled_rect_mut(&mut image, Rect::at(10, 10).of_size(100, 80), Rgb([40, 40, 40]));
  draw_filled_rect_mut(&mut image, Rect::at(130, 30).of_size(60, 20), Rgb([90, 90, 90]));
  let path = dir.join("plan.png");
  image.save(&path).unwrap();
  path
}

fn generator() -> FloorPlanGenerator {
  FloorPlanGenerator::new(&GeneratorConfig {
    show_labels: false,
    show_dimensions: false,
    ..GeneratorConfig::default()
  })
}

#[test]
fn missing_input_fails() {
  let dir = work_dir("missing");
  let result = PipelineTask::default().run_task(&dir.join("nope.png"), &generator(), None);
  std::fs::remove_dir_all(&dir).ok();
  assert!(result.is_err());
}

#[test]
fn undecodable_input_fails() {
  let dir = work_dir("garbage");
  let input = dir.join("plan.png");
  std::fs::write(&input, b"not an image").unwrap();
  let result = PipelineTask::default().run_task(&input, &generator(), None);
  std::fs::remove_dir_all(&dir).ok();
  assert!(result.is_err());
}

#[test]
fn full_run_writes_every_artifact() {
  let dir = work_dir("full");
  let input = write_plan(&dir);
  let output = dir.join("out").join("enhanced.png");
  let record = dir.join("plan.json");

  let report = PipelineTask::default()
    .with_3d(true)
    .with_export_data(Some(record.clone()))
    .run_task(&input, &generator(), Some(&output))
    .unwrap();

  assert!(report.warnings.is_empty(), "{:?}", report.warnings);
  assert_eq!(report.image.dimensions(), (200, 100));
  assert_eq!(image::open(&output).unwrap().width(), 200);
  assert_eq!(report.record, Some(record.clone()));
  if cfg!(feature = "extrude_3d") {
    let preview = dir.join("out").join("enhanced_3d.png");
    assert_eq!(report.preview, Some(preview.clone()));
    assert_eq!(image::open(&preview).unwrap().width(), 1200);
  }

  let json: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(&record).unwrap()).unwrap();
  std::fs::remove_dir_all(&dir).ok();

  assert_eq!(json["dimensions"]["width"], 5.0);
  assert_eq!(json["dimensions"]["length"], 2.5);
  assert_eq!(json["dimensions"]["unit"], "meters");
  assert_eq!(json["image"]["width"], 200);
  let rooms = json["rooms"].as_array().unwrap();
  assert_eq!(rooms.len(), 2);
  assert!(rooms.iter().any(|room| room["type"] == "living_room"));
  assert!(rooms.iter().any(|room| room["type"] == "hallway"));
}

#[test]
fn failed_export_is_only_a_warning() {
  let dir = work_dir("export-fail");
  let input = write_plan(&dir);
  // 目录不存在，写入必然失败
  let record = dir.join("missing").join("plan.json");

  let report = PipelineTask::default()
    .with_export_data(Some(record))
    .run_task(&input, &generator(), None)
    .unwrap();
  std::fs::remove_dir_all(&dir).ok();

  assert_eq!(report.record, None);
  assert_eq!(report.warnings.len(), 1);
  assert_eq!(report.image.dimensions(), (200, 100));
}

#[cfg(feature = "extrude_3d")]
#[test]
fn invalid_wall_height_is_only_a_warning() {
  let dir = work_dir("wall-height");
  let input = write_plan(&dir);
  let generator = FloorPlanGenerator::new(&GeneratorConfig {
    show_labels: false,
    show_dimensions: false,
    wall_height: -1.0,
    ..GeneratorConfig::default()
  });

  let report = PipelineTask::default()
    .with_3d(true)
    .run_task(&input, &generator, Some(&dir.join("enhanced.png")))
    .unwrap();
  let preview_written = dir.join("enhanced_3d.png").exists();
  std::fs::remove_dir_all(&dir).ok();

  assert_eq!(report.preview, None);
  assert_eq!(report.warnings.len(), 1);
  assert!(!preview_written);
}
