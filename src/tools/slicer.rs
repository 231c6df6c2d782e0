//! 精靈圖切割器
//!
//! 將裁切區域依網格均分為多個幀，依列優先順序編號。

use image::{Rgba, RgbaImage};

/// 裁切區域（以來源圖片像素座標表示）
///
/// 原點允許為負值或超出來源邊界，切割時超出範圍的取樣一律視為透明。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// 建立涵蓋整張圖片的裁切區域
    #[must_use]
    pub const fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// 網格設定
///
/// rows/cols 應 >= 1，由編輯介面負責夾限；切割器本身不做驗證。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: u32,
    pub cols: u32,
}

impl GridLayout {
    #[must_use]
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// 單一幀的輸出尺寸（實數格寬高取 floor）
    #[must_use]
    pub fn cell_size(&self, crop: CropRegion) -> (u32, u32) {
        let cell_w = f64::from(crop.width) / f64::from(self.cols);
        let cell_h = f64::from(crop.height) / f64::from(self.rows);
        (cell_w.floor() as u32, cell_h.floor() as u32)
    }
}

/// 切割出的單一幀
#[derive(Debug, Clone)]
pub struct SlicedFrame {
    /// 列優先順序的序號，從 0 開始
    pub index: usize,
    pub image: RgbaImage,
    /// 是否被排除在 GIF 輸出之外
    pub excluded: bool,
}

/// 將裁切區域切割為 rows x cols 個幀
///
/// 每格的取樣原點與取樣範圍以實數計算，輸出緩衝區尺寸才取 floor，
/// 避免取樣原點在多格之間累積漂移。格寬或格高 floor 後為 0 時，
/// 該格仍會產生一個零面積的空幀，不視為錯誤。
#[must_use]
pub fn slice_frames(source: &RgbaImage, crop: CropRegion, grid: GridLayout) -> Vec<SlicedFrame> {
    let cell_w = f64::from(crop.width) / f64::from(grid.cols);
    let cell_h = f64::from(crop.height) / f64::from(grid.rows);
    let (dest_w, dest_h) = grid.cell_size(crop);

    let mut frames = Vec::with_capacity((grid.rows as usize) * (grid.cols as usize));

    for r in 0..grid.rows {
        for c in 0..grid.cols {
            let origin_x = f64::from(crop.x) + f64::from(c) * cell_w;
            let origin_y = f64::from(crop.y) + f64::from(r) * cell_h;
            let image = sample_cell(source, origin_x, origin_y, cell_w, cell_h, dest_w, dest_h);

            frames.push(SlicedFrame {
                index: frames.len(),
                image,
                excluded: false,
            });
        }
    }

    frames
}

/// 將來源圖片的實數範圍重新取樣到整數尺寸的輸出緩衝區
///
/// 使用最近鄰取樣；超出來源邊界的像素填入透明色。
fn sample_cell(
    source: &RgbaImage,
    origin_x: f64,
    origin_y: f64,
    cell_w: f64,
    cell_h: f64,
    dest_w: u32,
    dest_h: u32,
) -> RgbaImage {
    let mut dest = RgbaImage::new(dest_w, dest_h);
    if dest_w == 0 || dest_h == 0 {
        return dest;
    }

    let (src_w, src_h) = source.dimensions();
    let scale_x = cell_w / f64::from(dest_w);
    let scale_y = cell_h / f64::from(dest_h);

    for dy in 0..dest_h {
        let sy = (origin_y + (f64::from(dy) + 0.5) * scale_y).floor() as i64;
        for dx in 0..dest_w {
            let sx = (origin_x + (f64::from(dx) + 0.5) * scale_x).floor() as i64;

            let pixel = if sx >= 0 && sy >= 0 && sx < i64::from(src_w) && sy < i64::from(src_h) {
                *source.get_pixel(sx as u32, sy as u32)
            } else {
                Rgba([0, 0, 0, 0])
            };

            dest.put_pixel(dx, dy, pixel);
        }
    }

    dest
}
