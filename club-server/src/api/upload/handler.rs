//! Image Upload Handler
//!
//! 接收 multipart 照片上传 (员工/会员头像)，统一转成 JPEG 存储。
//! 按内容哈希去重：同一张照片重复上传只占一份磁盘。

use axum::Json;
use axum::extract::{Extension, Multipart, State};
use image::DynamicImage;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::{fs, io::Cursor};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality (85% 在头像场景下肉眼无损，体积可控)
const JPEG_QUALITY: u8 = 85;

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_id: String,
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub format: String,
    pub url: String,
}

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Find existing file by content hash
fn find_file_by_hash(images_dir: &Path, hash: &str) -> Option<String> {
    let hash_dir = images_dir.join("by_hash");
    if !hash_dir.exists() {
        return None;
    }

    // by_hash 目录用哈希前 2 位做子目录 (e.g., "ab/abc123...")
    let prefix = &hash[..2];
    let hash_path = hash_dir.join(format!("{}/{}", prefix, hash));

    if hash_path.exists()
        && let Ok(target) = fs::read_link(&hash_path)
    {
        return target.file_name().map(|s| s.to_string_lossy().to_string());
    }
    None
}

/// Create hash-based symlink for deduplication
fn create_hash_symlink(images_dir: &Path, hash: &str, filename: &str) -> Result<(), AppError> {
    let hash_dir = images_dir.join("by_hash");
    let prefix = &hash[..2];
    let hash_subdir = hash_dir.join(prefix);
    fs::create_dir_all(&hash_subdir)
        .map_err(|e| AppError::internal(format!("Failed to create hash subdir: {}", e)))?;

    let hash_path = hash_subdir.join(hash);
    let target_path = PathBuf::from("../../").join(filename);

    symlink::symlink_auto(&target_path, &hash_path)
        .map_err(|e| AppError::internal(format!("Failed to create symlink: {}", e)))?;

    Ok(())
}

/// Process and compress image
fn process_and_compress_image(data: Vec<u8>) -> Result<(DynamicImage, Vec<u8>), AppError> {
    let img = image::load_from_memory(&data)
        .map_err(|e| AppError::validation(format!("Invalid image: {}", e)))?;

    // 统一转 RGB 再按质量参数编码成 JPEG
    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("Failed to compress image: {}", e)))?;
    }

    Ok((img, buffer))
}

/// Validate image file
fn validate_image(data: &[u8], ext: &str) -> Result<(), AppError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {} bytes ({}MB)",
            MAX_FILE_SIZE,
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    let ext_lower = ext.to_lowercase();
    if !SUPPORTED_FORMATS.contains(&ext_lower.as_str()) {
        return Err(AppError::validation(format!(
            "Unsupported file format '{}'. Supported: {}",
            ext_lower,
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    // 扩展名可以伪造，按字节实际解码一次确认是图片
    if let Err(e) = image::load_from_memory(data) {
        return Err(AppError::validation(format!(
            "Invalid image file ({}): {}",
            ext_lower, e
        )));
    }

    Ok(())
}

/// POST /api/image/upload - 上传照片 (multipart, 字段名 `file`)
pub async fn upload(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let images_dir = state.config.uploads_dir();
    fs::create_dir_all(&images_dir)
        .map_err(|e| AppError::internal(format!("Failed to create images directory: {}", e)))?;

    // 取第一个名为 file 的字段
    let mut field_data: Option<Vec<u8>> = None;
    let mut original_filename = None;

    while let Some(f) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?
    {
        let name = f.name().map(|s| s.to_string());
        if name.as_deref() == Some("file") || name.as_deref() == Some("") {
            original_filename = f.file_name().map(|s| s.to_string());
            field_data = Some(
                f.bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?
                    .to_vec(),
            );
            break;
        }
    }

    let data = field_data.ok_or_else(|| {
        AppError::validation("No 'file' field found. Field name must be 'file'".to_string())
    })?;

    let filename = original_filename
        .ok_or_else(|| AppError::validation("No filename provided in file field".to_string()))?;

    if data.is_empty() {
        return Err(AppError::validation("Empty file provided".to_string()));
    }

    let ext = PathBuf::from(&filename)
        .extension()
        .and_then(|ext| ext.to_str().map(|s| s.to_string()))
        .ok_or_else(|| AppError::validation(format!("Invalid file extension for: {}", filename)))?;

    validate_image(&data, &ext)?;

    let (_original_img, compressed_data) = process_and_compress_image(data)?;

    // 压缩后的字节做哈希：同一原图不同扩展名也能去重
    let file_hash = calculate_hash(&compressed_data);

    if let Some(existing_filename) = find_file_by_hash(&images_dir, &file_hash) {
        tracing::info!(
            original_name = %filename,
            existing_file = %existing_filename,
            "Duplicate image detected, returning existing file"
        );

        let file_id = existing_filename
            .strip_suffix(".jpg")
            .map(|s| s.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let url = format!("/api/image/{}", existing_filename);
        let response = UploadResponse {
            file_id,
            filename: existing_filename,
            original_name: filename,
            size: compressed_data.len(),
            format: "jpg".to_string(),
            url,
        };

        return Ok(Json(response));
    }

    let file_id = Uuid::new_v4().to_string();
    let new_filename = format!("{}.jpg", file_id);
    let file_path = images_dir.join(&new_filename);

    fs::write(&file_path, &compressed_data)
        .map_err(|e| AppError::internal(format!("Failed to save file: {}", e)))?;

    create_hash_symlink(&images_dir, &file_hash, &new_filename)?;

    tracing::info!(
        original_name = %filename,
        size = %compressed_data.len(),
        hash = %file_hash,
        uploaded_by = %current_user.username,
        "Image uploaded successfully"
    );

    let url = format!("/api/image/{}", new_filename);
    let response = UploadResponse {
        file_id,
        filename: new_filename,
        original_name: filename,
        size: compressed_data.len(),
        format: "jpg".to_string(),
        url,
    };

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::new(4, 4);
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_hash_is_stable_hex() {
        let hash = calculate_hash(b"hello");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, calculate_hash(b"hello"));
        assert_ne!(hash, calculate_hash(b"hello!"));
    }

    #[test]
    fn test_hash_symlink_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let images_dir = dir.path();
        fs::write(images_dir.join("abc.jpg"), b"jpeg-bytes").unwrap();

        let hash = calculate_hash(b"jpeg-bytes");
        create_hash_symlink(images_dir, &hash, "abc.jpg").unwrap();

        assert_eq!(
            find_file_by_hash(images_dir, &hash),
            Some("abc.jpg".to_string())
        );

        // 符号链接指向 ../../<file>，必须能从 by_hash/<前缀>/ 解析回原文件
        let link = images_dir.join("by_hash").join(&hash[..2]).join(&hash);
        assert_eq!(fs::read(link).unwrap(), b"jpeg-bytes");
    }

    #[test]
    fn test_find_file_by_hash_misses_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let hash = calculate_hash(b"never-stored");
        assert_eq!(find_file_by_hash(dir.path(), &hash), None);
    }

    #[test]
    fn test_validate_image_checks_extension_and_bytes() {
        let png = tiny_png();
        assert!(validate_image(&png, "png").is_ok());
        assert!(validate_image(&png, "PNG").is_ok());
        assert!(validate_image(&png, "bmp").is_err());
        assert!(validate_image(b"definitely not an image", "png").is_err());
    }

    #[test]
    fn test_validate_image_rejects_oversized() {
        let huge = vec![0u8; MAX_FILE_SIZE + 1];
        assert!(validate_image(&huge, "png").is_err());
    }

    #[test]
    fn test_compression_always_yields_jpeg() {
        let (_, compressed) = process_and_compress_image(tiny_png()).unwrap();
        // JPEG SOI 标记
        assert_eq!(&compressed[..2], &[0xFF, 0xD8]);
    }
}
