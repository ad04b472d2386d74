//! Image loading and saving
//!
//! All decoding goes through the `image` crate. The format is guessed from
//! the file content first and from the extension second, so mislabelled
//! uploads still decode. Missing, empty and corrupt files all surface as
//! [`MeasureError::ImageLoadError`].

use crate::error::{MeasureError, Result};
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};
use std::io::Cursor;
use std::path::Path;

/// Load an image from disk
///
/// # Arguments
///
/// * `path` - Path to the image file
///
/// # Errors
///
/// Returns `MeasureError::ImageLoadError` if:
/// - File cannot be opened or is empty
/// - Format cannot be determined
/// - Decoding fails
///
/// # Example
///
/// ```rust,no_run
/// use scan_sizes::image_loader::load_image;
/// use std::path::Path;
///
/// let img = load_image(Path::new("photo.jpg"))?;
/// println!("Loaded image: {}x{}", img.width(), img.height());
/// # Ok::<(), scan_sizes::MeasureError>(())
/// ```
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        MeasureError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;

    if metadata.len() == 0 {
        return Err(MeasureError::ImageLoadError {
            message: format!("Image file is empty: {}", path.display()),
            source: None,
        });
    }

    let reader = ImageReader::open(path)
        .map_err(|e| {
            MeasureError::image_load(format!("Failed to open image file: {}", path.display()), e)
        })?
        .with_guessed_format()
        .map_err(|e| {
            MeasureError::image_load(format!("Failed to read image file: {}", path.display()), e)
        })?;

    let img = reader.decode().map_err(|e| {
        MeasureError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    log::debug!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(img)
}

/// Decode an image held in memory, e.g. the body of an upload
pub fn load_image_from_memory(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(MeasureError::ImageLoadError {
            message: "Image data is empty".to_string(),
            source: None,
        });
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| MeasureError::image_load("Failed to read image data", e))?;

    reader
        .decode()
        .map_err(|e| MeasureError::image_load("Failed to decode image data", e))
}

/// Write an image to disk, choosing the encoder from the path's extension
pub fn save_image(image: &RgbImage, path: &Path) -> Result<()> {
    image.save(path).map_err(|e| {
        MeasureError::image_save(format!("Failed to write image: {}", path.display()), e)
    })
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> Vec<&'static str> {
    ImageFormat::all()
        .filter(|format| format.reading_enabled())
        .flat_map(|format| format.extensions_str().iter().copied())
        .collect()
}

/// Check if a file extension is supported (case-insensitive, without the dot)
pub fn is_supported_extension(ext: &str) -> bool {
    ImageFormat::from_extension(ext)
        .map(|format| format.reading_enabled())
        .unwrap_or(false)
}

/// Check if a file name carries a supported image extension
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(is_supported_extension)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_extension("jpg"));
        assert!(is_supported_extension("JPEG"));
        assert!(is_supported_extension("png"));
        assert!(is_supported_extension("bmp"));
        assert!(is_supported_extension("gif"));
        assert!(!is_supported_extension("xyz"));
        assert!(!is_supported_extension("doc"));

        let all = supported_extensions();
        assert!(all.contains(&"png"));
    }

    #[test]
    fn test_has_supported_extension() {
        assert!(has_supported_extension(Path::new("upload/photo.PNG")));
        assert!(!has_supported_extension(Path::new("notes.txt")));
        assert!(!has_supported_extension(Path::new("no_extension")));
    }

    #[test]
    fn test_empty_bytes_rejected() {
        let err = load_image_from_memory(&[]).unwrap_err();
        assert!(matches!(err, MeasureError::ImageLoadError { .. }));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = load_image_from_memory(b"definitely not an image").unwrap_err();
        assert!(matches!(err, MeasureError::ImageLoadError { .. }));
    }

    #[test]
    fn test_memory_round_trip_png() {
        let mut img = RgbImage::new(4, 3);
        img.put_pixel(1, 2, Rgb([10, 20, 30]));

        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let decoded = load_image_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(1, 2), &Rgb([10, 20, 30]));
    }
}
