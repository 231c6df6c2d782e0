//! 精靈圖合成器
//!
//! 將一串幀依列優先順序排入 rows x cols 網格，輸出單張精靈圖。
//! 切割器的反向操作。

use anyhow::{Result, bail};
use image::{RgbaImage, imageops};
use log::debug;

/// 計算將指定數量的幀排入固定欄數所需的列數
#[must_use]
pub fn sheet_rows(frame_count: usize, cols: u32) -> u32 {
    if frame_count == 0 || cols == 0 {
        return 0;
    }
    ((frame_count as u64).div_ceil(u64::from(cols))) as u32
}

/// 預設欄數：幀數開平方向上取整，讓輸出接近正方形
#[must_use]
pub fn default_cols(frame_count: usize) -> u32 {
    ((frame_count as f64).sqrt().ceil() as u32).max(1)
}

/// 將幀序列合成為單張精靈圖
///
/// 格子尺寸取所有幀的最大寬高；較小的幀靠左上對齊，空缺處保持透明。
pub fn compose_sheet(frames: &[RgbaImage], cols: u32) -> Result<RgbaImage> {
    if frames.is_empty() {
        bail!("沒有可合成的幀");
    }
    if cols == 0 {
        bail!("欄數必須至少為 1");
    }

    let cell_w = frames.iter().map(RgbaImage::width).max().unwrap_or(0);
    let cell_h = frames.iter().map(RgbaImage::height).max().unwrap_or(0);
    if cell_w == 0 || cell_h == 0 {
        bail!("幀尺寸為零，無法合成");
    }

    let rows = sheet_rows(frames.len(), cols);
    let mut sheet = RgbaImage::new(cols * cell_w, rows * cell_h);

    debug!(
        "合成 {} 幀為 {}x{} 精靈圖（格子 {}x{}）",
        frames.len(),
        cols,
        rows,
        cell_w,
        cell_h
    );

    for (i, frame) in frames.iter().enumerate() {
        let r = (i as u32) / cols;
        let c = (i as u32) % cols;
        let x = i64::from(c * cell_w);
        let y = i64::from(r * cell_h);
        imageops::overlay(&mut sheet, frame, x, y);
    }

    Ok(sheet)
}
