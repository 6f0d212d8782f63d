//! Export formats and filename normalization.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File format a preview can be saved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Bmp];

    /// Match a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
    }

    /// Infer the format from a path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        Self::from_extension(path.as_ref().extension()?.to_str()?)
    }

    /// Canonical extension, appended when a path lacks one.
    pub fn extension(self) -> &'static str {
        self.extensions()[0]
    }

    /// Every extension accepted for this format.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ImageFormat::Png => &["png"],
            ImageFormat::Jpeg => &["jpg", "jpeg"],
            ImageFormat::Bmp => &["bmp"],
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Bmp => "image/bmp",
        }
    }
}

/// Append `format`'s extension unless the path already carries one of its
/// extensions. An unrelated extension is kept: `shot.tif` becomes
/// `shot.tif.png`.
pub fn normalize_path(path: impl AsRef<Path>, format: ImageFormat) -> PathBuf {
    let path = path.as_ref();
    if ImageFormat::from_path(path) == Some(format) {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(ImageFormat::from_extension("png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("Bmp"), Some(ImageFormat::Bmp));
        assert_eq!(ImageFormat::from_extension("tiff"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(ImageFormat::from_path("a/b/photo.JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_path("photo"), None);
    }

    #[test]
    fn test_normalize_appends_missing_extension() {
        assert_eq!(
            normalize_path("out/photo", ImageFormat::Png),
            PathBuf::from("out/photo.png")
        );
        assert_eq!(
            normalize_path("photo", ImageFormat::Jpeg),
            PathBuf::from("photo.jpg")
        );
    }

    #[test]
    fn test_normalize_keeps_matching_extension() {
        assert_eq!(
            normalize_path("photo.jpeg", ImageFormat::Jpeg),
            PathBuf::from("photo.jpeg")
        );
        assert_eq!(
            normalize_path("PHOTO.BMP", ImageFormat::Bmp),
            PathBuf::from("PHOTO.BMP")
        );
    }

    #[test]
    fn test_normalize_appends_after_other_extension() {
        assert_eq!(
            normalize_path("photo.png", ImageFormat::Bmp),
            PathBuf::from("photo.png.bmp")
        );
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&ImageFormat::Jpeg).unwrap(), r#""jpeg""#);
    }
}
