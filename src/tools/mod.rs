mod gif_encoder;
mod image_loader;
mod image_scanner;
mod layout_advisor;
mod path_validator;
mod sheet_composer;
mod slicer;

pub use gif_encoder::{
    MAX_FPS, MIN_FPS, OUTPUT_FILENAME, build_frame, encode_animation, encode_images, frame_delay,
};
pub use image_loader::{SourceImage, encode_png, load_source_image};
pub use image_scanner::{ImageFileInfo, scan_image_files};
pub use layout_advisor::{
    AdvisorEndpoint, GeminiLayoutAdvisor, GridSuggestion, LayoutAdvisor, parse_grid_suggestion,
};
pub use path_validator::{ensure_directory_exists, validate_directory_exists, validate_file_exists};
pub use sheet_composer::{compose_sheet, default_cols, sheet_rows};
pub use slicer::{CropRegion, GridLayout, SlicedFrame, slice_frames};
