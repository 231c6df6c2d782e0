pub mod load;
pub mod save;
pub mod types;

pub use types::{
    AdvisorSettings, Config, ImageTypeTable, Language, MAX_RECENT_PATHS, UserSettings,
    WorkshopSettings,
};
