//! E2E Integration Tests
//!
//! 以合成圖片走完「切割、產生 GIF、解碼驗證」與
//! 「幀合成精靈圖後重新切割」的完整流程

use image::{Rgba, RgbaImage};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use sprite_gif_studio::component::gif_splitter::decode_gif_frames;
use sprite_gif_studio::component::sprite_workshop::{
    WorkshopSession, export_frames, generate_gif,
};
use sprite_gif_studio::config::WorkshopSettings;
use sprite_gif_studio::tools::{
    CropRegion, GridLayout, OUTPUT_FILENAME, compose_sheet, load_source_image, slice_frames,
};

/// 每格一個純色的 2x3 合成精靈圖（格子 8x8）
fn synthetic_sheet() -> RgbaImage {
    let colors = [
        Rgba([255, 0, 0, 255]),
        Rgba([0, 255, 0, 255]),
        Rgba([0, 0, 255, 255]),
        Rgba([255, 255, 0, 255]),
        Rgba([0, 255, 255, 255]),
        Rgba([255, 0, 255, 255]),
    ];
    RgbaImage::from_fn(24, 16, |x, y| {
        let c = (x / 8) as usize;
        let r = (y / 8) as usize;
        colors[r * 3 + c]
    })
}

fn synthetic_session() -> WorkshopSession {
    let source = sprite_gif_studio::tools::SourceImage {
        path: PathBuf::from("/test/synthetic.png"),
        bitmap: synthetic_sheet(),
    };
    let settings = WorkshopSettings {
        default_rows: 2,
        default_cols: 3,
        default_fps: 10,
    };
    WorkshopSession::new(source, &settings)
}

/// 測試產生 GIF 並解碼驗證幀數與延遲
#[test]
fn test_generate_and_decode_gif_e2e() {
    let mut session = synthetic_session();
    assert_eq!(session.frames().len(), 6);

    // 排除最後一幀
    session.toggle_frame(5);

    let output_dir = tempfile::tempdir().unwrap();
    let shutdown = Arc::new(AtomicBool::new(false));

    let outcome = generate_gif(&session, output_dir.path(), &shutdown)
        .unwrap()
        .expect("應產生 GIF");

    println!("產生結果:");
    println!("  - 幀數: {}", outcome.frame_count);
    println!("  - 大小: {} bytes", outcome.byte_len);

    assert_eq!(outcome.frame_count, 5);
    assert!(outcome.output_path.ends_with(OUTPUT_FILENAME));

    // 解碼驗證
    let decoded = decode_gif_frames(&outcome.output_path).unwrap();
    assert_eq!(decoded.len(), 5, "解碼後幀數應與輸出幀數一致");

    for frame in &decoded {
        assert_eq!(frame.buffer().dimensions(), (8, 8));
        let (numer, denom) = frame.delay().numer_denom_ms();
        assert_eq!(
            f64::from(numer) / f64::from(denom),
            100.0,
            "fps=10 時每幀延遲應為 100 ms"
        );
    }

    println!("✓ GIF 產生與解碼測試通過");
}

/// 測試全數排除時不產生輸出也不崩潰
#[test]
fn test_generate_with_everything_excluded() {
    let mut session = synthetic_session();
    for i in 0..6 {
        session.toggle_frame(i);
    }

    let output_dir = tempfile::tempdir().unwrap();
    let shutdown = Arc::new(AtomicBool::new(false));

    let outcome = generate_gif(&session, output_dir.path(), &shutdown).unwrap();

    assert!(outcome.is_none(), "全數排除應為無輸出的正常結束");
    assert!(!output_dir.path().join(OUTPUT_FILENAME).exists());

    println!("✓ 全數排除測試通過");
}

/// 測試幀合成精靈圖後重新切割的往返
#[test]
fn test_sheet_roundtrip_e2e() {
    let session = synthetic_session();
    let frames: Vec<RgbaImage> = session
        .frames()
        .iter()
        .map(|f| f.image.clone())
        .collect();

    // 合成精靈圖並寫到磁碟
    let sheet = compose_sheet(&frames, 3).unwrap();
    assert_eq!(sheet.dimensions(), (24, 16));

    let dir = tempfile::tempdir().unwrap();
    let sheet_path = dir.path().join("roundtrip_sheet.png");
    sheet.save(&sheet_path).unwrap();

    // 重新載入並以相同網格切割
    let reloaded = load_source_image(&sheet_path).unwrap();
    let resliced = slice_frames(
        &reloaded.bitmap,
        CropRegion::full(24, 16),
        GridLayout::new(2, 3),
    );

    assert_eq!(resliced.len(), frames.len());
    for (original, result) in frames.iter().zip(resliced.iter()) {
        assert_eq!(
            original.as_raw(),
            result.image.as_raw(),
            "往返後像素應一致"
        );
    }

    println!("✓ 精靈圖往返測試通過");
}

/// 測試幀預覽匯出
#[test]
fn test_export_frames_e2e() {
    let mut session = synthetic_session();
    session.toggle_frame(2);

    let dir = tempfile::tempdir().unwrap();
    let shutdown = Arc::new(AtomicBool::new(false));

    let results = export_frames(session.frames(), dir.path(), &shutdown).unwrap();

    assert_eq!(results.len(), 6);
    assert!(results.iter().all(|r| r.success));

    let entries: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();

    assert!(entries.contains(&"frame_000.png".to_string()));
    assert!(entries.contains(&"frame_002_excluded.png".to_string()));

    // 被匯出的幀應可重新載入且尺寸正確
    let reloaded = load_source_image(&dir.path().join("frame_000.png")).unwrap();
    assert_eq!(reloaded.bitmap.dimensions(), (8, 8));

    println!("✓ 幀匯出測試通過");
}
