use crate::config::Config;
use crate::tools::{compose_sheet, default_cols, sheet_rows, validate_file_exists};
use anyhow::{Context, Result, bail};
use console::style;
use dialoguer::Input;
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, RgbaImage};
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// GIF 拆解器
///
/// 將動畫 GIF 的所有幀攤平成一張精靈圖，是工作台切割流程的反向操作。
pub struct GifSplitter {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl GifSplitter {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== GIF 拆解為精靈圖 ===").cyan().bold());

        let input: String = Input::new()
            .with_prompt("請輸入 GIF 檔案路徑")
            .interact_text()?;
        let gif_path = PathBuf::from(input.trim());
        validate_file_exists(&gif_path)?;

        if !self.config.image_type_table.is_animation_file(&gif_path) {
            bail!("不是 GIF 檔案: {}", gif_path.display());
        }

        println!("{}", style("解碼 GIF 幀中...").dim());
        let frames = decode_gif_frames(&gif_path)?;

        if frames.is_empty() {
            bail!("GIF 不含任何幀: {}", gif_path.display());
        }

        let mean_delay = mean_delay_ms(&frames);
        println!(
            "{}",
            style(format!(
                "共 {} 幀，平均延遲 {:.1} ms",
                frames.len(),
                mean_delay
            ))
            .green()
        );

        if self.shutdown_signal.load(Ordering::SeqCst) {
            bail!("操作已取消");
        }

        let suggested = default_cols(frames.len());
        let cols: u32 = Input::new()
            .with_prompt("精靈圖欄數")
            .default(suggested)
            .interact_text()?;
        if cols < 1 {
            println!("{}", style("欄數至少為 1，已自動調整").yellow());
        }
        let cols = cols.max(1);

        let images: Vec<RgbaImage> = frames.into_iter().map(image::Frame::into_buffer).collect();
        let rows = sheet_rows(images.len(), cols);

        println!(
            "{}",
            style(format!("合成 {} 列 x {} 欄精靈圖中...", rows, cols)).dim()
        );
        let sheet = compose_sheet(&images, cols)?;

        let output_dir: String = Input::new()
            .with_prompt("請輸入輸出資料夾路徑")
            .default(".".to_string())
            .interact_text()?;

        let stem = gif_path
            .file_stem()
            .map_or_else(|| "animation".to_string(), |s| s.to_string_lossy().to_string());
        let output_path = PathBuf::from(output_dir.trim()).join(format!("{stem}_sheet.png"));

        sheet
            .save(&output_path)
            .with_context(|| format!("無法寫出精靈圖: {}", output_path.display()))?;

        println!(
            "{}",
            style(format!(
                "✓ 完成: {} ({}x{}, {} 列 x {} 欄)",
                output_path.display(),
                sheet.width(),
                sheet.height(),
                rows,
                cols
            ))
            .green()
            .bold()
        );
        info!(
            "精靈圖已建立: {} ({} 幀, {} 列 x {} 欄)",
            output_path.display(),
            images.len(),
            rows,
            cols
        );

        Ok(())
    }
}

/// 解碼 GIF 的所有幀
pub fn decode_gif_frames(path: &Path) -> Result<Vec<image::Frame>> {
    let file = File::open(path).with_context(|| format!("無法開啟 GIF: {}", path.display()))?;
    let decoder = GifDecoder::new(BufReader::new(file))
        .with_context(|| format!("無法解碼 GIF: {}", path.display()))?;

    decoder
        .into_frames()
        .collect_frames()
        .context("GIF 幀解碼失敗")
}

fn mean_delay_ms(frames: &[image::Frame]) -> f64 {
    if frames.is_empty() {
        return 0.0;
    }
    let total: f64 = frames
        .iter()
        .map(|frame| {
            let (numer, denom) = frame.delay().numer_denom_ms();
            f64::from(numer) / f64::from(denom)
        })
        .sum();
    total / frames.len() as f64
}
