//! Input classification.
//!
//! Decides whether an upload is a PDF, a raster image, or unsupported. The
//! declared content type is consulted first; the file extension is the
//! fallback for sources that do not declare one (files read from disk).

use std::path::Path;

use super::InputFile;

/// File extensions accepted by the upload picker, without the leading dot.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[
    "pdf", "jpg", "jpeg", "png", "webp", "gif", "bmp", "tif", "tiff",
];

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp", "tif", "tiff"];

/// Declared image type, selecting the normalizer's embedding path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    /// PNG, embedded losslessly.
    Png,
    /// JPEG, embedded as-is.
    Jpeg,
    /// Anything else; rasterized to PNG first.
    Other,
}

/// What an upload turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "image")]
pub enum InputKind {
    /// A PDF document.
    Pdf,
    /// A raster image.
    Image(ImageKind),
    /// Not something we can turn into pages.
    Unsupported,
}

impl InputKind {
    /// Whether the upload can be loaded.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

/// Classify an upload.
///
/// # Examples
///
/// ```
/// use pagedeck::input::{ImageKind, InputFile, InputKind, classify};
///
/// let file = InputFile::new("photo.JPG", Vec::new());
/// assert_eq!(classify(&file), InputKind::Image(ImageKind::Jpeg));
///
/// let file = InputFile::new("notes.txt", Vec::new());
/// assert_eq!(classify(&file), InputKind::Unsupported);
/// ```
pub fn classify(file: &InputFile) -> InputKind {
    let content_type = file
        .content_type
        .as_deref()
        .map(media_type)
        .unwrap_or_default();
    let ext = extension(&file.name);

    if content_type == "application/pdf" || ext.as_deref() == Some("pdf") {
        return InputKind::Pdf;
    }

    let ext_is_image = ext
        .as_deref()
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e));

    if content_type.starts_with("image/") || ext_is_image {
        return InputKind::Image(image_kind(&content_type, ext.as_deref()));
    }

    InputKind::Unsupported
}

/// The picker filter string, e.g. `.pdf,.jpg,...`.
pub fn accept_attribute() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn image_kind(content_type: &str, ext: Option<&str>) -> ImageKind {
    // only an image/* declaration overrides the extension
    match content_type {
        "image/png" => return ImageKind::Png,
        "image/jpeg" | "image/jpg" | "image/pjpeg" => return ImageKind::Jpeg,
        ct if ct.starts_with("image/") => return ImageKind::Other,
        _ => {}
    }

    match ext {
        Some("png") => ImageKind::Png,
        Some("jpg" | "jpeg") => ImageKind::Jpeg,
        _ => ImageKind::Other,
    }
}

/// Lowercased media type without parameters (`; charset=...`).
fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn file(name: &str, content_type: Option<&str>) -> InputFile {
        let file = InputFile::new(name, Vec::new());
        match content_type {
            Some(ct) => file.with_content_type(ct),
            None => file,
        }
    }

    #[rstest]
    #[case("report.pdf", None, InputKind::Pdf)]
    #[case("REPORT.PDF", None, InputKind::Pdf)]
    #[case("download", Some("application/pdf"), InputKind::Pdf)]
    #[case("scan.png", None, InputKind::Image(ImageKind::Png))]
    #[case("scan.PNG", None, InputKind::Image(ImageKind::Png))]
    #[case("photo.jpg", None, InputKind::Image(ImageKind::Jpeg))]
    #[case("photo.jpeg", None, InputKind::Image(ImageKind::Jpeg))]
    #[case("anim.gif", None, InputKind::Image(ImageKind::Other))]
    #[case("pic.webp", None, InputKind::Image(ImageKind::Other))]
    #[case("old.bmp", None, InputKind::Image(ImageKind::Other))]
    #[case("fax.tif", None, InputKind::Image(ImageKind::Other))]
    #[case("fax.tiff", None, InputKind::Image(ImageKind::Other))]
    #[case("notes.txt", None, InputKind::Unsupported)]
    #[case("archive.zip", Some("application/zip"), InputKind::Unsupported)]
    #[case("no_extension", None, InputKind::Unsupported)]
    fn test_classify(
        #[case] name: &str,
        #[case] content_type: Option<&str>,
        #[case] expected: InputKind,
    ) {
        assert_eq!(classify(&file(name, content_type)), expected);
    }

    #[test]
    fn test_content_type_wins_over_extension() {
        let png_named_jpg = file("photo.jpg", Some("image/png"));
        assert_eq!(classify(&png_named_jpg), InputKind::Image(ImageKind::Png));

        let heic = file("photo.jpg", Some("image/heic"));
        assert_eq!(classify(&heic), InputKind::Image(ImageKind::Other));

        let pjpeg = file("blob", Some("image/pjpeg"));
        assert_eq!(classify(&pjpeg), InputKind::Image(ImageKind::Jpeg));
    }

    #[rstest]
    #[case("photo.jpg", "application/octet-stream", InputKind::Image(ImageKind::Jpeg))]
    #[case("scan.png", "binary/octet-stream", InputKind::Image(ImageKind::Png))]
    #[case("anim.gif", "application/octet-stream", InputKind::Image(ImageKind::Other))]
    #[case("data.bin", "application/octet-stream", InputKind::Unsupported)]
    fn test_non_image_content_type_falls_back_to_extension(
        #[case] name: &str,
        #[case] content_type: &str,
        #[case] expected: InputKind,
    ) {
        assert_eq!(classify(&file(name, Some(content_type))), expected);
    }

    #[rstest]
    #[case("blob", "application/pdf; charset=binary", InputKind::Pdf)]
    #[case("blob", " Application/PDF ;q=1", InputKind::Pdf)]
    #[case("blob", "image/png; foo=bar", InputKind::Image(ImageKind::Png))]
    #[case("blob", "IMAGE/JPEG;charset=binary", InputKind::Image(ImageKind::Jpeg))]
    fn test_content_type_parameters_ignored(
        #[case] name: &str,
        #[case] content_type: &str,
        #[case] expected: InputKind,
    ) {
        assert_eq!(classify(&file(name, Some(content_type))), expected);
    }

    #[test]
    fn test_pdf_extension_beats_image_content_type() {
        let odd = file("doc.pdf", Some("image/png"));
        assert_eq!(classify(&odd), InputKind::Pdf);
    }

    #[test]
    fn test_accept_attribute() {
        assert_eq!(
            accept_attribute(),
            ".pdf,.jpg,.jpeg,.png,.webp,.gif,.bmp,.tif,.tiff"
        );
    }

    #[test]
    fn test_is_supported() {
        assert!(InputKind::Pdf.is_supported());
        assert!(InputKind::Image(ImageKind::Other).is_supported());
        assert!(!InputKind::Unsupported.is_supported());
    }
}
