//! 精靈圖工作台元件
//!
//! 互動流程：
//! 1. 載入來源圖片（檔案路徑或資料夾掃描）
//! 2. 調整裁切範圍、網格與播放速率（任一變動都會整批重切）
//! 3. 排除不要的幀、匯出幀預覽
//! 4. 產生循環 GIF

mod frame_exporter;
mod gif_pipeline;
mod main;
mod session;

pub use frame_exporter::{ExportResult, export_frames};
pub use gif_pipeline::{GenerationOutcome, generate_gif};
pub use main::{SpriteWorkshop, apply_layout_suggestion};
pub use session::WorkshopSession;
