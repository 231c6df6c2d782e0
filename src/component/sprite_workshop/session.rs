//! 工作台會話狀態
//!
//! 所有可編輯狀態（來源圖片、裁切、網格、播放速率、幀集合）都集中在
//! 這個結構，由工作台元件持有並傳給純函式使用。幀集合是
//! (來源, 裁切, 網格) 的衍生結果：三者任一變動都會整批重切，
//! 排除標記因此一併歸零。

use crate::config::WorkshopSettings;
use crate::tools::{
    CropRegion, GridLayout, GridSuggestion, MAX_FPS, MIN_FPS, SlicedFrame, SourceImage,
    slice_frames,
};

pub struct WorkshopSession {
    source: SourceImage,
    crop: CropRegion,
    grid: GridLayout,
    fps: u32,
    frames: Vec<SlicedFrame>,
    defaults: WorkshopSettings,
}

impl WorkshopSession {
    #[must_use]
    pub fn new(source: SourceImage, defaults: &WorkshopSettings) -> Self {
        let crop = CropRegion::full(source.width(), source.height());
        let grid = GridLayout::new(defaults.default_rows.max(1), defaults.default_cols.max(1));
        let fps = defaults.default_fps.clamp(MIN_FPS, MAX_FPS);
        let frames = slice_frames(&source.bitmap, crop, grid);

        Self {
            source,
            crop,
            grid,
            fps,
            frames,
            defaults: defaults.clone(),
        }
    }

    #[must_use]
    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    #[must_use]
    pub const fn crop(&self) -> CropRegion {
        self.crop
    }

    #[must_use]
    pub const fn grid(&self) -> GridLayout {
        self.grid
    }

    #[must_use]
    pub const fn fps(&self) -> u32 {
        self.fps
    }

    #[must_use]
    pub fn frames(&self) -> &[SlicedFrame] {
        &self.frames
    }

    /// 目前網格下單一幀的輸出尺寸
    #[must_use]
    pub fn cell_size(&self) -> (u32, u32) {
        self.grid.cell_size(self.crop)
    }

    #[must_use]
    pub fn excluded_count(&self) -> usize {
        self.frames.iter().filter(|f| f.excluded).count()
    }

    /// 依原始序號順序列出未被排除的幀
    #[must_use]
    pub fn included_frames(&self) -> Vec<&SlicedFrame> {
        self.frames.iter().filter(|f| !f.excluded).collect()
    }

    pub fn set_crop(&mut self, crop: CropRegion) {
        self.crop = crop;
        self.reslice();
    }

    /// 設定網格；低於 1 的值在這一層夾限為 1
    pub fn set_grid(&mut self, rows: u32, cols: u32) {
        self.grid = GridLayout::new(rows.max(1), cols.max(1));
        self.reslice();
    }

    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps.clamp(MIN_FPS, MAX_FPS);
    }

    /// 更換來源圖片；裁切範圍重設為整張圖，網格與播放速率保留
    pub fn replace_source(&mut self, source: SourceImage) {
        self.crop = CropRegion::full(source.width(), source.height());
        self.source = source;
        self.reslice();
    }

    /// 套用顧問建議：覆寫網格並將裁切重設為整張圖
    pub fn apply_suggestion(&mut self, suggestion: GridSuggestion) {
        self.grid = GridLayout::new(suggestion.rows.max(1), suggestion.cols.max(1));
        self.crop = CropRegion::full(self.source.width(), self.source.height());
        self.reslice();
    }

    /// 回復預設：整張圖裁切、預設網格與播放速率
    pub fn reset(&mut self) {
        self.crop = CropRegion::full(self.source.width(), self.source.height());
        self.grid = GridLayout::new(
            self.defaults.default_rows.max(1),
            self.defaults.default_cols.max(1),
        );
        self.fps = self.defaults.default_fps.clamp(MIN_FPS, MAX_FPS);
        self.reslice();
    }

    /// 切換指定幀的排除狀態；序號超出範圍時不做任何事
    pub fn toggle_frame(&mut self, index: usize) -> bool {
        match self.frames.get_mut(index) {
            Some(frame) => {
                frame.excluded = !frame.excluded;
                true
            }
            None => false,
        }
    }

    fn reslice(&mut self) {
        self.frames = slice_frames(&self.source.bitmap, self.crop, self.grid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;

    fn test_session() -> WorkshopSession {
        let source = SourceImage {
            path: PathBuf::from("/test/sheet.png"),
            bitmap: RgbaImage::from_pixel(40, 40, Rgba([9, 9, 9, 255])),
        };
        WorkshopSession::new(source, &WorkshopSettings::default())
    }

    #[test]
    fn test_new_session_covers_full_image() {
        let session = test_session();
        assert_eq!(session.crop(), CropRegion::full(40, 40));
        assert_eq!(session.grid(), GridLayout::new(4, 4));
        assert_eq!(session.fps(), 10);
        assert_eq!(session.frames().len(), 16);
    }

    #[test]
    fn test_toggle_flips_only_target_frame() {
        let mut session = test_session();

        assert!(session.toggle_frame(5));
        assert!(session.frames()[5].excluded);
        for (i, frame) in session.frames().iter().enumerate() {
            if i != 5 {
                assert!(!frame.excluded);
            }
        }

        // 再切換一次應回復原狀
        assert!(session.toggle_frame(5));
        assert!(!session.frames()[5].excluded);
    }

    #[test]
    fn test_toggle_out_of_range_is_noop() {
        let mut session = test_session();
        assert!(!session.toggle_frame(999));
        assert_eq!(session.excluded_count(), 0);
    }

    #[test]
    fn test_reslice_resets_exclusions() {
        let mut session = test_session();
        session.toggle_frame(0);
        session.toggle_frame(3);
        assert_eq!(session.excluded_count(), 2);

        session.set_grid(2, 2);

        assert_eq!(session.frames().len(), 4);
        assert_eq!(session.excluded_count(), 0);
    }

    #[test]
    fn test_set_crop_resets_exclusions() {
        let mut session = test_session();
        session.toggle_frame(1);

        session.set_crop(CropRegion {
            x: 0,
            y: 0,
            width: 20,
            height: 20,
        });

        assert_eq!(session.excluded_count(), 0);
    }

    #[test]
    fn test_grid_clamped_to_minimum() {
        let mut session = test_session();
        session.set_grid(0, 0);
        assert_eq!(session.grid(), GridLayout::new(1, 1));
        assert_eq!(session.frames().len(), 1);
    }

    #[test]
    fn test_fps_clamped_to_range() {
        let mut session = test_session();
        session.set_fps(0);
        assert_eq!(session.fps(), MIN_FPS);
        session.set_fps(240);
        assert_eq!(session.fps(), MAX_FPS);
    }

    #[test]
    fn test_apply_suggestion_overwrites_grid_and_crop() {
        let mut session = test_session();
        session.set_crop(CropRegion {
            x: 5,
            y: 5,
            width: 10,
            height: 10,
        });
        session.toggle_frame(0);

        session.apply_suggestion(GridSuggestion { rows: 2, cols: 5 });

        assert_eq!(session.grid(), GridLayout::new(2, 5));
        assert_eq!(session.crop(), CropRegion::full(40, 40));
        assert_eq!(session.frames().len(), 10);
        assert_eq!(session.excluded_count(), 0);
    }

    #[test]
    fn test_included_frames_preserve_order() {
        let mut session = test_session();
        session.toggle_frame(1);
        session.toggle_frame(7);

        let included: Vec<usize> = session.included_frames().iter().map(|f| f.index).collect();
        let expected: Vec<usize> = (0..16).filter(|i| *i != 1 && *i != 7).collect();
        assert_eq!(included, expected);
    }

    #[test]
    fn test_replace_source_resets_crop_keeps_grid() {
        let mut session = test_session();
        session.set_grid(2, 3);
        session.set_crop(CropRegion {
            x: 1,
            y: 1,
            width: 8,
            height: 8,
        });

        session.replace_source(SourceImage {
            path: PathBuf::from("/test/other.png"),
            bitmap: RgbaImage::from_pixel(60, 30, Rgba([1, 1, 1, 255])),
        });

        assert_eq!(session.crop(), CropRegion::full(60, 30));
        assert_eq!(session.grid(), GridLayout::new(2, 3));
        assert_eq!(session.frames().len(), 6);
    }
}
