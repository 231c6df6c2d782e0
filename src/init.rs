//! 程式初始化
//!
//! 日誌預設只輸出警告以上，避免干擾互動介面；
//! 以 RUST_LOG 環境變數可調整層級。

use env_logger::Env;

pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .init();
}
