//! アップロードする画像ファイルの読み込み
//!
//! 拡張子は .jpg/.jpeg/.png のみ。中身も `image` クレートで判定し、
//! 拡張子だけ変えた別形式のファイルは送らない。

use crate::error::{RecordsError, Result};
use image::ImageFormat;
use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// 読み込んだ画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// 対応している拡張子か
pub fn is_supported_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

pub fn load_image(path: &Path) -> Result<ImageFile> {
    if !path.is_file() {
        return Err(RecordsError::FileNotFound(path.display().to_string()));
    }
    if !is_supported_extension(path) {
        return Err(RecordsError::ImageLoad(format!(
            "対応していない形式です（jpg/jpeg/png のみ）: {}",
            path.display()
        )));
    }

    let bytes = std::fs::read(path)?;
    let mime = sniff_mime(&bytes)
        .ok_or_else(|| RecordsError::ImageLoad(format!("画像として読めません: {}", path.display())))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());

    tracing::debug!(file = %file_name, mime, size = bytes.len(), "image loaded");
    Ok(ImageFile { file_name, mime, bytes })
}

/// 先頭バイトから MIME を判定する
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn test_supported_extension() {
        assert!(is_supported_extension(Path::new("rex.jpg")));
        assert!(is_supported_extension(Path::new("rex.JPEG")));
        assert!(is_supported_extension(Path::new("rex.png")));
        assert!(!is_supported_extension(Path::new("rex.gif")));
        assert!(!is_supported_extension(Path::new("rex")));
    }

    #[test]
    fn test_sniff_mime() {
        assert_eq!(sniff_mime(PNG_HEADER), Some("image/png"));
        assert_eq!(sniff_mime(JPEG_HEADER), Some("image/jpeg"));
        assert_eq!(sniff_mime(b"GIF89a......"), None);
        assert_eq!(sniff_mime(b"hello"), None);
    }
}
