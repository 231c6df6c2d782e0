//! 幀預覽匯出
//!
//! 將目前的幀集合存成編號 PNG，讓使用者在終端機之外檢視每一幀，
//! 再回來決定要排除哪些。被排除的幀也會匯出，檔名加上標記。

use crate::tools::{SlicedFrame, ensure_directory_exists};
use anyhow::Result;
use log::error;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 單一幀的匯出結果
#[derive(Debug)]
pub struct ExportResult {
    pub output_path: PathBuf,
    pub index: usize,
    pub success: bool,
    pub error_message: Option<String>,
}

fn frame_filename(frame: &SlicedFrame) -> String {
    if frame.excluded {
        format!("frame_{:03}_excluded.png", frame.index)
    } else {
        format!("frame_{:03}.png", frame.index)
    }
}

/// 平行匯出所有幀
///
/// 每個結果帶原始序號；零面積的退化幀會記為失敗而不是中斷整批。
pub fn export_frames(
    frames: &[SlicedFrame],
    output_dir: &Path,
    shutdown_signal: &Arc<AtomicBool>,
) -> Result<Vec<ExportResult>> {
    ensure_directory_exists(output_dir)?;

    let results = frames
        .par_iter()
        .map(|frame| {
            let output_path = output_dir.join(frame_filename(frame));

            if shutdown_signal.load(Ordering::SeqCst) {
                return ExportResult {
                    output_path,
                    index: frame.index,
                    success: false,
                    error_message: Some("操作已取消".to_string()),
                };
            }

            match frame.image.save(&output_path) {
                Ok(()) => ExportResult {
                    output_path,
                    index: frame.index,
                    success: true,
                    error_message: None,
                },
                Err(e) => {
                    error!("幀匯出失敗 [{}]: {}", frame.index, e);
                    ExportResult {
                        output_path,
                        index: frame.index,
                        success: false,
                        error_message: Some(e.to_string()),
                    }
                }
            }
        })
        .collect();

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn make_frame(index: usize, excluded: bool) -> SlicedFrame {
        SlicedFrame {
            index,
            image: RgbaImage::from_pixel(2, 2, Rgba([7, 7, 7, 255])),
            excluded,
        }
    }

    #[test]
    fn test_export_writes_numbered_files() {
        let frames = vec![make_frame(0, false), make_frame(1, true)];
        let dir = tempfile::tempdir().unwrap();
        let shutdown = Arc::new(AtomicBool::new(false));

        let results = export_frames(&frames, dir.path(), &shutdown).unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.success));
        assert!(dir.path().join("frame_000.png").exists());
        assert!(dir.path().join("frame_001_excluded.png").exists());
    }

    #[test]
    fn test_degenerate_frame_is_reported_not_fatal() {
        let frames = vec![
            make_frame(0, false),
            SlicedFrame {
                index: 1,
                image: RgbaImage::new(0, 0),
                excluded: false,
            },
        ];
        let dir = tempfile::tempdir().unwrap();
        let shutdown = Arc::new(AtomicBool::new(false));

        let results = export_frames(&frames, dir.path(), &shutdown).unwrap();

        let ok_count = results.iter().filter(|r| r.success).count();
        assert_eq!(ok_count, 1);
        let failed = results.iter().find(|r| !r.success).unwrap();
        assert_eq!(failed.index, 1);
        assert!(failed.error_message.is_some());
    }
}
