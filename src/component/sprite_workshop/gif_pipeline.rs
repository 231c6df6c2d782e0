//! GIF 產生管線
//!
//! 四階段流程：
//! A. 依原始序號篩選未排除的幀（全數排除時視為無事可做，不是錯誤）
//! B. 驗證幀尺寸（拒絕零面積的退化幀）
//! C. 平行準備幀，結果帶原始序號，合流時依序號排序
//! D. 編碼並寫出 GIF

use super::session::WorkshopSession;
use crate::tools::{OUTPUT_FILENAME, build_frame, encode_animation, ensure_directory_exists};
use anyhow::{Context, Result, bail};
use console::style;
use image::Frame;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 單次產生的結果
#[derive(Debug)]
pub struct GenerationOutcome {
    pub frame_count: usize,
    pub byte_len: usize,
    pub output_path: PathBuf,
}

/// 將會話中未排除的幀編碼為 GIF 並寫出
///
/// 回傳 `Ok(None)` 表示沒有可輸出的幀（不視為錯誤）；
/// 編碼或寫檔失敗則以 `Err` 傳回呼叫端。
pub fn generate_gif(
    session: &WorkshopSession,
    output_dir: &Path,
    shutdown_signal: &Arc<AtomicBool>,
) -> Result<Option<GenerationOutcome>> {
    // Stage A: 篩選輸出幀
    print!("  {} 篩選輸出幀...", style("A").dim());
    let included = session.included_frames();
    if included.is_empty() {
        println!(" 0 幀");
        println!("  {} 所有幀都被排除，略過產生", style("⤳").yellow());
        return Ok(None);
    }
    println!(" {} / {} 幀", included.len(), session.frames().len());

    // Stage B: 驗證幀尺寸
    print!("  {} 驗證幀尺寸...", style("B").dim());
    let (cell_w, cell_h) = session.cell_size();
    if cell_w == 0 || cell_h == 0 {
        println!();
        bail!("幀尺寸為 {cell_w}x{cell_h}，裁切範圍對網格設定而言太小");
    }
    println!(" {cell_w}x{cell_h}");

    // Stage C: 平行準備幀
    println!("  {} 準備 {} 幀...", style("C").dim(), included.len());
    let progress = ProgressBar::new(included.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("  [{bar:30}] {pos}/{len}")?.progress_chars("=>-"),
    );

    let fps = session.fps();
    let mut prepared: Vec<(usize, Frame)> = included
        .par_iter()
        .map(|sliced| {
            let frame = build_frame(sliced.image.clone(), fps);
            progress.inc(1);
            (sliced.index, frame)
        })
        .collect();
    progress.finish_and_clear();

    if shutdown_signal.load(Ordering::SeqCst) {
        bail!("操作已取消");
    }

    // 合流屏障：依原始序號排序，編碼順序與完成順序無關
    prepared.sort_by_key(|(index, _)| *index);
    let frames: Vec<Frame> = prepared.into_iter().map(|(_, frame)| frame).collect();
    let frame_count = frames.len();

    // Stage D: 編碼並寫出
    print!("  {} 編碼 GIF...", style("D").dim());
    let bytes = encode_animation(frames)?;
    println!(" {} bytes", bytes.len());

    ensure_directory_exists(output_dir)?;
    let output_path = output_dir.join(OUTPUT_FILENAME);
    fs::write(&output_path, &bytes)
        .with_context(|| format!("無法寫出 GIF: {}", output_path.display()))?;

    info!(
        "GIF 產生完成: {} 幀, {} bytes, fps={}, 輸出 {}",
        frame_count,
        bytes.len(),
        fps,
        output_path.display()
    );

    Ok(Some(GenerationOutcome {
        frame_count,
        byte_len: bytes.len(),
        output_path,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkshopSettings;
    use crate::tools::{CropRegion, SourceImage};
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;

    fn test_session() -> WorkshopSession {
        let source = SourceImage {
            path: PathBuf::from("/test/sheet.png"),
            bitmap: RgbaImage::from_pixel(40, 40, Rgba([50, 100, 150, 255])),
        };
        WorkshopSession::new(source, &WorkshopSettings::default())
    }

    #[test]
    fn test_generate_writes_gif_file() {
        let session = test_session();
        let output_dir = tempfile::tempdir().unwrap();
        let shutdown = Arc::new(AtomicBool::new(false));

        let outcome = generate_gif(&session, output_dir.path(), &shutdown)
            .unwrap()
            .unwrap();

        assert_eq!(outcome.frame_count, 16);
        assert!(outcome.output_path.ends_with(OUTPUT_FILENAME));
        let bytes = fs::read(&outcome.output_path).unwrap();
        assert_eq!(&bytes[..6], b"GIF89a");
        assert_eq!(bytes.len(), outcome.byte_len);
    }

    #[test]
    fn test_all_frames_excluded_is_a_noop() {
        let mut session = test_session();
        for i in 0..session.frames().len() {
            session.toggle_frame(i);
        }

        let output_dir = tempfile::tempdir().unwrap();
        let shutdown = Arc::new(AtomicBool::new(false));

        let outcome = generate_gif(&session, output_dir.path(), &shutdown).unwrap();

        assert!(outcome.is_none());
        assert!(!output_dir.path().join(OUTPUT_FILENAME).exists());
    }

    #[test]
    fn test_degenerate_frames_are_rejected() {
        let mut session = test_session();
        // 裁切比網格小 => 幀尺寸 floor 為 0
        session.set_crop(CropRegion {
            x: 0,
            y: 0,
            width: 2,
            height: 2,
        });

        let output_dir = tempfile::tempdir().unwrap();
        let shutdown = Arc::new(AtomicBool::new(false));

        let result = generate_gif(&session, output_dir.path(), &shutdown);

        assert!(result.is_err());
        assert!(!output_dir.path().join(OUTPUT_FILENAME).exists());
    }

    #[test]
    fn test_cancelled_generation_writes_nothing() {
        let session = test_session();
        let output_dir = tempfile::tempdir().unwrap();
        let shutdown = Arc::new(AtomicBool::new(true));

        let result = generate_gif(&session, output_dir.path(), &shutdown);

        assert!(result.is_err());
        assert!(!output_dir.path().join(OUTPUT_FILENAME).exists());
    }
}
