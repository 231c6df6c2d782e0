use super::frame_exporter::export_frames;
use super::gif_pipeline::generate_gif;
use super::session::WorkshopSession;
use crate::config::Config;
use crate::config::save::{add_recent_path, save_settings};
use crate::tools::{
    AdvisorEndpoint, CropRegion, GeminiLayoutAdvisor, LayoutAdvisor, MAX_FPS, MIN_FPS,
    SourceImage, encode_png, load_source_image, scan_image_files, validate_file_exists,
};
use anyhow::Result;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, MultiSelect, Select};
use log::{info, warn};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// 精靈圖工作台
///
/// 載入圖片後進入編輯迴圈：調整裁切、網格與播放速率，排除不要的幀，
/// 最後產生 GIF。任何裁切、網格或來源變動都會整批重切幀集合。
pub struct SpriteWorkshop {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl SpriteWorkshop {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        println!("{}", style("=== 精靈圖 GIF 工作台 ===").cyan().bold());

        let Some(source) = self.prompt_source_image()? else {
            return Ok(());
        };
        let mut session = WorkshopSession::new(source, &self.config.settings.workshop);

        loop {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷訊號，離開工作台");
                break;
            }

            print_session_status(&session);

            let options = vec![
                "調整裁切範圍",
                "調整網格",
                "調整播放速率",
                "選擇輸出幀",
                "匯出幀預覽 (PNG)",
                "AI 偵測網格",
                "產生 GIF",
                "更換圖片",
                "回復預設",
                "返回主選單",
            ];

            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("請選擇操作")
                .items(&options)
                .default(0)
                .interact_opt()?;

            let result = match selection {
                Some(0) => adjust_crop(&mut session),
                Some(1) => adjust_grid(&mut session),
                Some(2) => adjust_fps(&mut session),
                Some(3) => select_output_frames(&mut session),
                Some(4) => self.export_frame_previews(&session),
                Some(5) => self.detect_grid(&mut session),
                Some(6) => self.generate(&session),
                Some(7) => self.replace_image(&mut session),
                Some(8) => {
                    session.reset();
                    println!("{}", style("已回復預設設定").green());
                    Ok(())
                }
                Some(9) | None => break,
                _ => unreachable!(),
            };

            if let Err(e) = result {
                eprintln!("{} {}", style("錯誤:").red().bold(), e);
            }
        }

        Ok(())
    }

    /// 選取來源圖片：可輸入檔案路徑，或輸入資料夾後從掃描結果挑選
    fn prompt_source_image(&mut self) -> Result<Option<SourceImage>> {
        let path = match self.prompt_image_path()? {
            Some(path) => path,
            None => return Ok(None),
        };

        let source = load_source_image(&path)?;
        println!(
            "{}",
            style(format!(
                "已載入 {} ({}x{})",
                path.display(),
                source.width(),
                source.height()
            ))
            .green()
        );
        info!(
            "載入來源圖片: {} ({}x{})",
            path.display(),
            source.width(),
            source.height()
        );

        add_recent_path(&mut self.config.settings, &path.to_string_lossy());
        if let Err(e) = save_settings(&self.config.settings) {
            warn!("無法儲存最近使用路徑: {e}");
        }

        Ok(Some(source))
    }

    fn prompt_image_path(&self) -> Result<Option<PathBuf>> {
        // 有最近使用紀錄時先列出供選擇
        if !self.config.settings.recent_paths.is_empty() {
            let mut items: Vec<String> = self.config.settings.recent_paths.clone();
            items.push("輸入新路徑…".to_string());

            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("請選擇圖片")
                .items(&items)
                .default(0)
                .interact_opt()?;

            match selection {
                None => return Ok(None),
                Some(i) if i < self.config.settings.recent_paths.len() => {
                    let path = PathBuf::from(&self.config.settings.recent_paths[i]);
                    validate_file_exists(&path)?;
                    return Ok(Some(path));
                }
                Some(_) => {}
            }
        }

        let input: String = Input::new()
            .with_prompt("請輸入圖片檔案或資料夾路徑")
            .interact_text()?;
        let path = PathBuf::from(input.trim());

        if path.is_dir() {
            return self.pick_from_directory(&path);
        }

        validate_file_exists(&path)?;
        Ok(Some(path))
    }

    fn pick_from_directory(&self, directory: &Path) -> Result<Option<PathBuf>> {
        println!("{}", style("掃描圖片檔案中...").dim());
        let files = scan_image_files(directory, &self.config.image_type_table)?;

        if files.is_empty() {
            println!("{}", style("找不到任何圖片檔案").yellow());
            return Ok(None);
        }

        let items: Vec<String> = files
            .iter()
            .map(|file| {
                let size_kb = file.size as f64 / 1024.0;
                format!(
                    "{} ({:.1} KB)",
                    file.path.file_name().unwrap_or_default().to_string_lossy(),
                    size_kb
                )
            })
            .collect();

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("請選擇圖片")
            .items(&items)
            .default(0)
            .interact_opt()?;

        Ok(selection.map(|i| files[i].path.clone()))
    }

    fn export_frame_previews(&self, session: &WorkshopSession) -> Result<()> {
        let output_dir = prompt_output_dir()?;

        // 每次匯出使用新目錄，避免殘留上一個網格設定的舊幀
        let stem = session
            .source()
            .path
            .file_stem()
            .map_or_else(|| "sprite".to_string(), |s| s.to_string_lossy().to_string());
        let tag = Uuid::new_v4().simple().to_string();
        let export_dir = output_dir.join(format!("frames_{}_{}", stem, &tag[..8]));

        println!("{}", style("匯出幀預覽中...").dim());
        let results = export_frames(session.frames(), &export_dir, &self.shutdown_signal)?;

        let success = results.iter().filter(|r| r.success).count();
        let failed = results.len() - success;

        println!(
            "{}",
            style(format!("已匯出 {} 幀到 {}", success, export_dir.display())).green()
        );
        if failed > 0 {
            println!("{}", style(format!("{failed} 幀匯出失敗")).yellow());
        }

        Ok(())
    }

    /// 以遠端推論服務猜測網格配置；失敗時不改動任何狀態
    fn detect_grid(&self, session: &mut WorkshopSession) -> Result<()> {
        let advisor_settings = &self.config.settings.advisor;

        let Ok(api_key) = env::var(&advisor_settings.api_key_env) else {
            println!(
                "{}",
                style(format!(
                    "未設定環境變數 {}，無法使用 AI 偵測",
                    advisor_settings.api_key_env
                ))
                .yellow()
            );
            return Ok(());
        };

        println!("{}", style("以 AI 分析網格配置中...").dim());

        let advisor = GeminiLayoutAdvisor::new(AdvisorEndpoint {
            api_url: advisor_settings.api_url.clone(),
            model: advisor_settings.model.clone(),
            api_key,
        });

        let image_png = encode_png(&session.source().bitmap)?;

        if apply_layout_suggestion(&advisor, session, &image_png) {
            let grid = session.grid();
            println!(
                "{}",
                style(format!("已套用建議網格: {} 列 x {} 欄", grid.rows, grid.cols)).green()
            );
        } else {
            println!("{}", style("無法取得建議，維持目前設定").yellow());
        }

        Ok(())
    }

    fn generate(&self, session: &WorkshopSession) -> Result<()> {
        let output_dir = prompt_output_dir()?;

        println!();
        println!("{}", style("開始產生 GIF...").cyan());

        if let Some(outcome) = generate_gif(session, &output_dir, &self.shutdown_signal)? {
            println!(
                "{}",
                style(format!(
                    "✓ 完成: {} ({} 幀, {} bytes)",
                    outcome.output_path.display(),
                    outcome.frame_count,
                    outcome.byte_len
                ))
                .green()
                .bold()
            );
        }

        Ok(())
    }

    fn replace_image(&mut self, session: &mut WorkshopSession) -> Result<()> {
        if let Some(source) = self.prompt_source_image()? {
            session.replace_source(source);
            println!(
                "{}",
                style(format!("已重新切割為 {} 幀", session.frames().len())).green()
            );
        }
        Ok(())
    }
}

/// 套用顧問建議；回傳是否有建議被套用
///
/// 沒有建議（包含任何失敗）時會話狀態完全不變。
pub fn apply_layout_suggestion(
    advisor: &dyn LayoutAdvisor,
    session: &mut WorkshopSession,
    image_png: &[u8],
) -> bool {
    match advisor.suggest_layout(image_png) {
        Some(suggestion) => {
            session.apply_suggestion(suggestion);
            true
        }
        None => false,
    }
}

fn print_session_status(session: &WorkshopSession) {
    let crop = session.crop();
    let grid = session.grid();
    let (cell_w, cell_h) = session.cell_size();

    println!();
    println!("{}", style("── 目前狀態 ──").cyan());
    println!(
        "  圖片: {} ({}x{})",
        session.source().path.display(),
        session.source().width(),
        session.source().height()
    );
    println!(
        "  裁切: x={}, y={}, {}x{}",
        crop.x, crop.y, crop.width, crop.height
    );
    println!(
        "  網格: {} 列 x {} 欄（每幀 {}x{}）",
        grid.rows, grid.cols, cell_w, cell_h
    );
    if cell_w == 0 || cell_h == 0 {
        println!(
            "  {}",
            style("⚠ 幀尺寸為零：裁切範圍對網格而言太小").yellow()
        );
    }
    println!("  播放速率: {} fps", session.fps());
    println!(
        "  幀: {} 個（排除 {} 個）",
        session.frames().len(),
        session.excluded_count()
    );
}

fn prompt_output_dir() -> Result<PathBuf> {
    let input: String = Input::new()
        .with_prompt("請輸入輸出資料夾路徑")
        .default(".".to_string())
        .interact_text()?;
    Ok(PathBuf::from(input.trim()))
}

fn adjust_crop(session: &mut WorkshopSession) -> Result<()> {
    let crop = session.crop();

    let x: i32 = Input::new()
        .with_prompt("裁切起點 X")
        .default(crop.x)
        .interact_text()?;
    let y: i32 = Input::new()
        .with_prompt("裁切起點 Y")
        .default(crop.y)
        .interact_text()?;
    let width: u32 = Input::new()
        .with_prompt("裁切寬度")
        .default(crop.width)
        .interact_text()?;
    let height: u32 = Input::new()
        .with_prompt("裁切高度")
        .default(crop.height)
        .interact_text()?;

    session.set_crop(CropRegion {
        x,
        y,
        width,
        height,
    });
    println!(
        "{}",
        style(format!("已重新切割為 {} 幀", session.frames().len())).green()
    );

    Ok(())
}

fn adjust_grid(session: &mut WorkshopSession) -> Result<()> {
    let grid = session.grid();

    let rows: u32 = Input::new()
        .with_prompt("列數")
        .default(grid.rows)
        .interact_text()?;
    let cols: u32 = Input::new()
        .with_prompt("欄數")
        .default(grid.cols)
        .interact_text()?;

    if rows < 1 || cols < 1 {
        println!("{}", style("列數與欄數至少為 1，已自動調整").yellow());
    }

    session.set_grid(rows, cols);
    println!(
        "{}",
        style(format!("已重新切割為 {} 幀", session.frames().len())).green()
    );

    Ok(())
}

fn adjust_fps(session: &mut WorkshopSession) -> Result<()> {
    let fps: u32 = Input::new()
        .with_prompt(format!("播放速率 fps ({MIN_FPS}-{MAX_FPS})"))
        .default(session.fps())
        .interact_text()?;

    if !(MIN_FPS..=MAX_FPS).contains(&fps) {
        println!(
            "{}",
            style(format!("播放速率超出 {MIN_FPS}-{MAX_FPS}，已自動夾限")).yellow()
        );
    }

    session.set_fps(fps);
    println!("{}", style(format!("播放速率: {} fps", session.fps())).green());

    Ok(())
}

/// 以勾選清單挑選輸出幀；取消勾選即為排除
fn select_output_frames(session: &mut WorkshopSession) -> Result<()> {
    if session.frames().is_empty() {
        println!("{}", style("目前沒有任何幀").yellow());
        return Ok(());
    }

    let items: Vec<String> = session
        .frames()
        .iter()
        .map(|frame| {
            let (w, h) = frame.image.dimensions();
            format!("幀 {:03} ({}x{})", frame.index, w, h)
        })
        .collect();
    let defaults: Vec<bool> = session.frames().iter().map(|f| !f.excluded).collect();

    let selection = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("勾選要輸出的幀（空白鍵切換）")
        .items(&items)
        .defaults(&defaults)
        .interact_opt()?;

    let Some(selected) = selection else {
        return Ok(());
    };

    // 逐幀比對勾選結果，只切換狀態有變的幀
    for index in 0..session.frames().len() {
        let include = selected.contains(&index);
        let currently_included = !session.frames()[index].excluded;
        if include != currently_included {
            session.toggle_frame(index);
        }
    }

    println!(
        "{}",
        style(format!(
            "輸出 {} 幀（排除 {} 幀）",
            session.frames().len() - session.excluded_count(),
            session.excluded_count()
        ))
        .green()
    );

    Ok(())
}
