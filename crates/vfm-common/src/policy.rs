//! Upload size and file-type policy
//!
//! The remote asset store accepts files up to 5 MiB. Extensions are split in
//! two classes: universal ones work with every upload backend, restricted ones
//! are only accepted by the legacy CMS FilePicker endpoint.

use mime::Mime;
use std::path::Path;

/// Maximum accepted file size in bytes (5 MiB).
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Image formats accepted by both upload backends.
pub const UNIVERSAL_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "svg", "webp"];

/// Formats accepted by the CMS FilePicker only.
///
/// The GraphQL backend answers "Invalid file format" for these.
pub const RESTRICTED_EXTENSIONS: &[&str] = &["bmp", "pdf", "txt", "json", "css", "js", "xml"];

/// Compatibility class of a supported extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionClass {
    /// Works with every backend
    Universal,
    /// Works with the CMS backend only
    Restricted,
}

/// Lower-cased text after the last dot of the file name.
///
/// A leading dot counts, so a file named `.png` has extension `png`.
pub fn extension_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Classify an extension (case-insensitive, leading dot optional).
pub fn classify(ext: &str) -> Option<ExtensionClass> {
    let ext = ext.trim_start_matches('.').to_ascii_lowercase();

    if UNIVERSAL_EXTENSIONS.contains(&ext.as_str()) {
        Some(ExtensionClass::Universal)
    } else if RESTRICTED_EXTENSIONS.contains(&ext.as_str()) {
        Some(ExtensionClass::Restricted)
    } else {
        None
    }
}

/// Whether the extension belongs to the supported set
pub fn is_supported(ext: &str) -> bool {
    classify(ext).is_some()
}

/// Whether `path` carries a supported extension
pub fn is_supported_path(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| is_supported(&ext))
}

/// MIME type sent for a file with the given extension.
///
/// Unknown extensions map to `application/octet-stream`.
pub fn mime_for_extension(ext: &str) -> Mime {
    match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "png" => mime::IMAGE_PNG,
        "gif" => mime::IMAGE_GIF,
        "svg" => mime::IMAGE_SVG,
        "bmp" => mime::IMAGE_BMP,
        "pdf" => mime::APPLICATION_PDF,
        "txt" => mime::TEXT_PLAIN,
        "json" => mime::APPLICATION_JSON,
        "css" => mime::TEXT_CSS,
        "js" => mime::APPLICATION_JAVASCRIPT,
        "webp" => parse_or_octet_stream("image/webp"),
        "xml" => parse_or_octet_stream("application/xml"),
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

fn parse_or_octet_stream(raw: &str) -> Mime {
    raw.parse().unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_max_file_size_is_five_mebibytes() {
        assert_eq!(MAX_FILE_SIZE, 5_242_880);
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("png"), Some(ExtensionClass::Universal));
        assert_eq!(classify(".JPEG"), Some(ExtensionClass::Universal));
        assert_eq!(classify("pdf"), Some(ExtensionClass::Restricted));
        assert_eq!(classify(".Css"), Some(ExtensionClass::Restricted));
        assert_eq!(classify("exe"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_extension_sets_are_disjoint() {
        for ext in UNIVERSAL_EXTENSIONS {
            assert!(!RESTRICTED_EXTENSIONS.contains(ext), "{ext} is in both sets");
        }
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(&PathBuf::from("a/Logo.PNG")), Some("png".to_string()));
        assert_eq!(extension_of(&PathBuf::from("archive.tar.gz")), Some("gz".to_string()));
        assert_eq!(extension_of(&PathBuf::from("README")), None);
        assert!(is_supported_path(&PathBuf::from("banner.WebP")));
        assert!(!is_supported_path(&PathBuf::from("notes.md")));
    }

    #[test]
    fn test_extension_of_dotfiles() {
        assert_eq!(extension_of(&PathBuf::from(".png")), Some("png".to_string()));
        assert_eq!(extension_of(&PathBuf::from("img/.Hidden.JPG")), Some("jpg".to_string()));
        assert_eq!(extension_of(&PathBuf::from("trailing.")), Some(String::new()));
        assert_eq!(extension_of(&PathBuf::from(".")), None);
        assert!(is_supported_path(&PathBuf::from("assets/.png")));
        assert!(!is_supported_path(&PathBuf::from(".gitignore")));
    }

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(mime_for_extension("jpg").as_ref(), "image/jpeg");
        assert_eq!(mime_for_extension(".JPEG").as_ref(), "image/jpeg");
        assert_eq!(mime_for_extension("svg").as_ref(), "image/svg+xml");
        assert_eq!(mime_for_extension("webp").as_ref(), "image/webp");
        assert_eq!(mime_for_extension("xml").as_ref(), "application/xml");
        assert_eq!(mime_for_extension("js").as_ref(), "application/javascript");
        assert_eq!(mime_for_extension("zip").as_ref(), "application/octet-stream");
    }
}
