// 该文件是 Fangtu （房图） 项目的一部分。
// src/task.rs - 任务编排
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
  time::Instant,
};

use anyhow::Context;
use image::RgbImage;
use tracing::{info, warn};

#[cfg(feature = "extrude_3d")]
use crate::extrude::{self, DEFAULT_WALL_HEIGHT, Scene};
use crate::{
  detector::{DetectError, Detector, RegionDetector, WallExtractor},
  export::{self, ExportError, FloorPlanRecord},
  input::{DecodeError, FloorPlan},
  output::{
    Detections, Draw, Render, RenderError, RenderOptions, SaveImageFileOutput, draw::DEFAULT_DPI,
    font,
  },
  scheme::{ColorScheme, SchemeName},
};

#[cfg(not(feature = "extrude_3d"))]
const DEFAULT_WALL_HEIGHT: f32 = 2.5;

pub trait Task<I, M, O>: Sized {
  type Output;
  type Error;
  fn run_task(self, input: I, model: M, output: O) -> Result<Self::Output, Self::Error>;
}

/// 生成器配置，默认值与命令行一致
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
  pub color_scheme: SchemeName,
  pub dpi: u32,
  pub show_dimensions: bool,
  pub show_labels: bool,
  /// 标注字体，缺省时查找系统字体
  pub font: Option<PathBuf>,
  pub wall_height: f32,
}

impl Default for GeneratorConfig {
  fn default() -> Self {
    Self {
      color_scheme: SchemeName::default(),
      dpi: DEFAULT_DPI,
      show_dimensions: true,
      show_labels: true,
      font: None,
      wall_height: DEFAULT_WALL_HEIGHT,
    }
  }
}

/// 户型图生成器，配色与渲染选项在构造时确定
pub struct FloorPlanGenerator {
  draw: Draw,
  region_detector: RegionDetector,
  wall_extractor: WallExtractor,
  wall_height: f32,
}

impl FloorPlanGenerator {
  pub fn new(config: &GeneratorConfig) -> Self {
    let scheme = ColorScheme::by_name(config.color_scheme);
    let options = RenderOptions {
      show_labels: config.show_labels,
      show_dimensions: config.show_dimensions,
      dpi: config.dpi,
      ..RenderOptions::default()
    };
    let font = match font::resolve_font(config.font.as_deref()) {
      Ok(font) => Some(font),
      Err(err) => {
        warn!("无法加载标注字体，将跳过文字绘制: {}", err);
        None
      }
    };
    info!("使用配色方案: {}", config.color_scheme.as_str());

    Self {
      draw: Draw::new(scheme, options, font),
      region_detector: RegionDetector::default(),
      wall_extractor: WallExtractor::default(),
      wall_height: config.wall_height,
    }
  }

  pub fn scheme(&self) -> &'static ColorScheme {
    self.draw.scheme()
  }

  pub fn options(&self) -> &RenderOptions {
    self.draw.options()
  }

  pub fn load(&self, path: impl AsRef<Path>) -> Result<FloorPlan, DecodeError> {
    FloorPlan::open(path)
  }

  pub fn detect(&self, plan: &FloorPlan) -> Result<Detections, DetectError> {
    let regions = self.region_detector.detect(&plan.image)?;
    let walls = self.wall_extractor.detect(&plan.image)?;
    info!("检测到 {} 个房间区域", regions.len());
    Ok(Detections { regions, walls })
  }

  /// 重新绘制户型图，给定输出路径时写入文件
  pub fn enhance(&self, plan: &FloorPlan, output: Option<&Path>) -> Result<RgbImage, RenderError> {
    let detections = self.detect(plan)?;
    let enhanced = self.draw.render_result(&plan.image, &detections)?;
    if let Some(path) = output {
      SaveImageFileOutput::new(path, self.options().dpi).save_image(&enhanced)?;
    }
    Ok(enhanced)
  }

  /// 生成三维块体场景，给定输出路径时写入预览图
  #[cfg(feature = "extrude_3d")]
  pub fn generate_3d(&self, plan: &FloorPlan, output: Option<&Path>) -> Result<Scene, ExportError> {
    let regions = self.region_detector.detect(&plan.image)?;
    let scene = extrude::extrude(&regions, self.scheme(), self.wall_height)?;
    if let Some(path) = output {
      let preview = scene.render(plan.meta.width, plan.meta.height, self.draw.font())?;
      SaveImageFileOutput::new(path, self.options().dpi).save_image(&preview)?;
    }
    Ok(scene)
  }

  /// 导出测量数据到 JSON 文件
  pub fn export_data(
    &self,
    plan: &FloorPlan,
    output: &Path,
  ) -> Result<FloorPlanRecord, ExportError> {
    let regions = self.region_detector.detect(&plan.image)?;
    let record = export::export(&regions, &plan.meta, self.options().pixels_per_meter)?;
    record.write_to(output)?;
    Ok(record)
  }
}

/// `plan.png` -> `plan_3d.png`
pub fn derived_3d_path(output: &Path) -> PathBuf {
  let stem = output
    .file_stem()
    .map(|stem| stem.to_string_lossy().into_owned())
    .unwrap_or_default();
  let name = match output.extension() {
    Some(ext) => format!("{}_3d.{}", stem, ext.to_string_lossy()),
    None => format!("{}_3d", stem),
  };
  output.with_file_name(name)
}

pub struct EnhanceTask;

impl<'a> Task<&'a FloorPlan, &'a FloorPlanGenerator, Option<&'a Path>> for EnhanceTask {
  type Output = RgbImage;
  type Error = anyhow::Error;

  fn run_task(
    self,
    input: &'a FloorPlan,
    model: &'a FloorPlanGenerator,
    output: Option<&'a Path>,
  ) -> Result<Self::Output, Self::Error> {
    info!("开始增强户型图...");
    let now = Instant::now();
    let enhanced = model.enhance(input, output).context("户型图增强失败")?;
    info!("增强完成，耗时: {:.2?}", now.elapsed());
    Ok(enhanced)
  }
}

#[cfg(feature = "extrude_3d")]
pub struct ExtrudeTask;

#[cfg(feature = "extrude_3d")]
impl<'a> Task<&'a FloorPlan, &'a FloorPlanGenerator, Option<&'a Path>> for ExtrudeTask {
  type Output = Scene;
  type Error = ExportError;

  fn run_task(
    self,
    input: &'a FloorPlan,
    model: &'a FloorPlanGenerator,
    output: Option<&'a Path>,
  ) -> Result<Self::Output, Self::Error> {
    info!("开始生成三维预览...");
    let now = Instant::now();
    let scene = model.generate_3d(input, output)?;
    info!("三维预览完成，耗时: {:.2?}", now.elapsed());
    Ok(scene)
  }
}

pub struct ExportTask;

impl<'a> Task<&'a FloorPlan, &'a FloorPlanGenerator, &'a Path> for ExportTask {
  type Output = FloorPlanRecord;
  type Error = ExportError;

  fn run_task(
    self,
    input: &'a FloorPlan,
    model: &'a FloorPlanGenerator,
    output: &'a Path,
  ) -> Result<Self::Output, Self::Error> {
    info!("开始导出户型数据...");
    let now = Instant::now();
    let record = model.export_data(input, output)?;
    info!("导出完成，耗时: {:.2?}", now.elapsed());
    Ok(record)
  }
}

#[cfg(feature = "extrude_3d")]
fn run_extrude(
  plan: &FloorPlan,
  model: &FloorPlanGenerator,
  preview: Option<&Path>,
) -> Result<(), ExportError> {
  ExtrudeTask.run_task(plan, model, preview).map(|_| ())
}

#[cfg(not(feature = "extrude_3d"))]
fn run_extrude(
  _plan: &FloorPlan,
  _model: &FloorPlanGenerator,
  _preview: Option<&Path>,
) -> Result<(), ExportError> {
  Err(ExportError::InvalidParameter(
    "未启用 extrude_3d 特性".to_string(),
  ))
}

/// 一次完整运行的结果
#[derive(Debug, Default)]
pub struct PipelineReport {
  pub image: RgbImage,
  pub output: Option<PathBuf>,
  pub preview: Option<PathBuf>,
  pub record: Option<PathBuf>,
  /// 可恢复的失败
  pub warnings: Vec<String>,
}

/// 命令行流程：增强，随后可选三维预览与数据导出
#[derive(Debug, Default, Clone)]
pub struct PipelineTask {
  three_d: bool,
  export_data: Option<PathBuf>,
}

impl PipelineTask {
  pub fn with_3d(mut self, three_d: bool) -> Self {
    self.three_d = three_d;
    self
  }

  pub fn with_export_data(mut self, export_data: Option<PathBuf>) -> Self {
    self.export_data = export_data;
    self
  }
}

impl<'a> Task<&'a Path, &'a FloorPlanGenerator, Option<&'a Path>> for PipelineTask {
  type Output = PipelineReport;
  type Error = anyhow::Error;

  fn run_task(
    self,
    input: &'a Path,
    model: &'a FloorPlanGenerator,
    output: Option<&'a Path>,
  ) -> Result<Self::Output, Self::Error> {
    if !input.exists() {
      anyhow::bail!("输入文件不存在: {}", input.display());
    }

    let plan = model
      .load(input)
      .with_context(|| format!("无法读取输入图像 {}", input.display()))?;
    let image = EnhanceTask.run_task(&plan, model, output)?;

    let mut report = PipelineReport {
      image,
      output: output.map(Path::to_path_buf),
      ..PipelineReport::default()
    };

    if self.three_d {
      let preview = output.map(derived_3d_path);
      match run_extrude(&plan, model, preview.as_deref()) {
        Ok(()) => report.preview = preview,
        Err(err) => {
          warn!("三维预览生成失败: {}", err);
          report.warnings.push(format!("三维预览生成失败: {}", err));
        }
      }
    }

    if let Some(path) = self.export_data.as_deref() {
      match ExportTask.run_task(&plan, model, path) {
        Ok(_) => report.record = Some(path.to_path_buf()),
        Err(err) => {
          warn!("户型数据导出失败: {}", err);
          report.warnings.push(format!("户型数据导出失败: {}", err));
        }
      }
    }

    Ok(report)
  }
}
