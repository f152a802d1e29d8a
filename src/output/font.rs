// 该文件是 Fangtu （房图） 项目的一部分。
// src/output/font.rs - 标注字体
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

use std::path::Path;

use ab_glyph::FontArc;
use tracing::{debug, info};

use crate::output::AnnotationError;

// 常见系统字体位置
const SYSTEM_FONT_PATHS: &[&str] = &[
  "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
  "/usr/share/fonts/TTF/DejaVuSans.ttf",
  "/usr/share/fonts/dejavu/DejaVuSans.ttf",
  "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
  "/System/Library/Fonts/Helvetica.ttc",
  "/Library/Fonts/Arial.ttf",
  "C:\\Windows\\Fonts\\arial.ttf",
];

pub fn load_font_file(path: impl AsRef<Path>) -> Result<FontArc, AnnotationError> {
  let data = std::fs::read(path.as_ref())?;
  FontArc::try_from_vec(data).map_err(|err| AnnotationError::InvalidFont(err.to_string()))
}

/// 依次尝试常见系统字体
pub fn find_system_font() -> Option<FontArc> {
  SYSTEM_FONT_PATHS
    .iter()
    .map(Path::new)
    .filter(|path| path.exists())
    .find_map(|path| match load_font_file(path) {
      Ok(font) => {
        info!("使用系统字体: {}", path.display());
        Some(font)
      }
      Err(err) => {
        debug!("跳过字体 {}: {}", path.display(), err);
        None
      }
    })
}

/// 优先使用显式指定的字体文件，否则查找系统字体
pub fn resolve_font(explicit: Option<&Path>) -> Result<FontArc, AnnotationError> {
  match explicit {
    Some(path) => load_font_file(path),
    None => find_system_font().ok_or(AnnotationError::FontUnavailable),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_font_file_is_read_error() {
    let path = std::env::temp_dir().join("fangtu-no-such-font.ttf");
    assert!(matches!(
      resolve_font(Some(&path)),
      Err(AnnotationError::FontReadError(_))
    ));
  }

  #[test]
  fn invalid_font_data_is_rejected() {
    let path = std::env::temp_dir().join(format!("fangtu-bad-font-{}.ttf", std::process::id()));
    std::fs::write(&path, b"not a font").unwrap();
    let result = load_font_file(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(AnnotationError::InvalidFont(_))));
  }
}
