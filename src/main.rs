// 该文件是 Fangtu （房图） 项目的一部分。
// src/main.rs - 项目主程序
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

mod args;

use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use fangtu::task::{FloorPlanGenerator, PipelineTask, Task};

fn main() -> ExitCode {
  tracing_subscriber::fmt::init();

  let args = args::Args::parse();

  println!("Fangtu 户型图增强");
  println!("==================");
  println!("输入文件: {}", args.input.display());
  println!("配色方案: {}", args.color_scheme.as_str());
  println!("DPI: {}", args.dpi);
  println!();

  if !args.input.exists() {
    eprintln!("错误: 输入文件不存在: {}", args.input.display());
    return ExitCode::FAILURE;
  }

  let generator = FloorPlanGenerator::new(&args.generator_config());
  let task = PipelineTask::default()
    .with_3d(args.three_d)
    .with_export_data(args.export_data.clone());

  let report = match task.run_task(&args.input, &generator, args.output.as_deref()) {
    Ok(report) => report,
    Err(err) => {
      eprintln!("错误: {:#}", err);
      return ExitCode::FAILURE;
    }
  };

  match &report.output {
    Some(path) => println!("增强图像已保存: {}", path.display()),
    None => println!(
      "未指定输出路径，增强图像 ({}x{}) 仅保留在内存中",
      report.image.width(),
      report.image.height()
    ),
  }
  if let Some(path) = &report.preview {
    println!("三维预览已保存: {}", path.display());
  } else if args.three_d && report.output.is_none() && report.warnings.is_empty() {
    println!("三维场景已生成，未指定输出路径，未写入文件");
  }
  if let Some(path) = &report.record {
    println!("户型数据已导出: {}", path.display());
  }
  for warning in &report.warnings {
    eprintln!("警告: {}", warning);
  }

  info!("处理完成");
  println!();
  println!("处理完成!");
  ExitCode::SUCCESS
}
