use crate::config::ImageTypeTable;
use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageFileInfo {
    pub path: PathBuf,
    pub size: u64,
}

/// 掃描資料夾中的圖片檔案，依檔名排序
pub fn scan_image_files(directory: &Path, table: &ImageTypeTable) -> Result<Vec<ImageFileInfo>> {
    let mut image_files: Vec<ImageFileInfo> = WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| table.is_image_file(entry.path()))
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            Some(ImageFileInfo {
                path: entry.into_path(),
                size: metadata.len(),
            })
        })
        .collect();

    image_files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(image_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_finds_only_images() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sheet.png"), b"fake").unwrap();
        fs::write(dir.path().join("photo.jpg"), b"fake").unwrap();
        fs::write(dir.path().join("notes.txt"), b"fake").unwrap();

        let table = ImageTypeTable::embedded().unwrap();
        let files = scan_image_files(dir.path(), &table).unwrap();

        assert_eq!(files.len(), 2);
        // 依檔名排序
        assert!(files[0].path.ends_with("photo.jpg"));
        assert!(files[1].path.ends_with("sheet.png"));
    }
}
