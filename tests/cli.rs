// 该文件是 Fangtu （房图） 项目的一部分。
// tests/cli.rs - 命令行退出码测试
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
  path::{Path, PathBuf},
  process::{Command, Output},
};

use image::{Rgb, RgbImage};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};

fn work_dir(name: &str) -> PathBuf {
  let dir = std::env::temp_dir().join(format!("fangtu-cli-{}-{}", std::process::id(), name));
  std::fs::create_dir_all(&dir).unwrap();
  dir
}

fn write_plan(dir: &Path) -> PathBuf {
  let mut image = RgbImage::from_pixel(120, 80, Rgb([255, 255, 255]));
  draw_filled_rect_mut(&mut image, Rect::at(10, 10).of_size(60, 50), Rgb([30, 30, 30]));
  let path = dir.join("plan.png");
  image.save(&path).unwrap();
  path
}

fn fangtu(args: &[&Path]) -> Output {
  Command::new(env!("CARGO_BIN_EXE_fangtu"))
    .args(args)
    .arg("--no-labels")
    .arg("--no-dimensions")
    .output()
    .unwrap()
}

#[test]
fn missing_input_exits_with_one() {
  let dir = work_dir("missing");
  let output = fangtu(&[&dir.join("nope.png")]);
  std::fs::remove_dir_all(&dir).ok();
  assert_eq!(output.status.code(), Some(1));
}

#[test]
fn undecodable_input_exits_with_one() {
  let dir = work_dir("garbage");
  let input = dir.join("plan.png");
  std::fs::write(&input, b"not an image").unwrap();
  let output = fangtu(&[&input]);
  std::fs::remove_dir_all(&dir).ok();
  assert_eq!(output.status.code(), Some(1));
}

#[test]
fn success_writes_output_and_exits_with_zero() {
  let dir = work_dir("ok");
  let input = write_plan(&dir);
  let enhanced = dir.join("enhanced.png");
  let output = fangtu(&[&input, Path::new("-o"), &enhanced]);
  let written = enhanced.exists();
  std::fs::remove_dir_all(&dir).ok();
  assert_eq!(output.status.code(), Some(0));
  assert!(written);
}

#[test]
fn failed_export_still_exits_with_zero() {
  let dir = work_dir("export");
  let input = write_plan(&dir);
  let record = dir.join("missing").join("plan.json");
  let output = fangtu(&[&input, Path::new("--export-data"), &record]);
  std::fs::remove_dir_all(&dir).ok();
  assert_eq!(output.status.code(), Some(0));
  assert!(String::from_utf8_lossy(&output.stderr).contains("警告"));
}
