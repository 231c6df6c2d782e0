//! 來源圖片載入
//!
//! 解碼在選取當下同步完成，不存在尚未完成就被新圖片取代的解碼作業。

use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// 已載入的來源圖片
///
/// 載入後不可變；更換圖片時整個換新。
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub path: PathBuf,
    pub bitmap: RgbaImage,
}

impl SourceImage {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }
}

/// 載入並解碼來源圖片
pub fn load_source_image(path: &Path) -> Result<SourceImage> {
    let bitmap = image::open(path)
        .with_context(|| format!("無法載入圖片: {}", path.display()))?
        .to_rgba8();

    Ok(SourceImage {
        path: path.to_path_buf(),
        bitmap,
    })
}

/// 將點陣圖編碼為 PNG 位元組串（供顧問服務的內嵌圖片酬載使用）
pub fn encode_png(bitmap: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    bitmap
        .write_to(&mut buffer, ImageFormat::Png)
        .context("PNG 編碼失敗")?;
    Ok(buffer.into_inner())
}
