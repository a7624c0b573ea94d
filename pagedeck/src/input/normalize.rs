//! Image-to-PDF normalization.
//!
//! Turns a raster image into a single-page PDF so the rest of the engine only
//! ever deals with PDF sources.
//!
//! # Embedding paths
//!
//! - **JPEG**: the original bytes become a `DCTDecode` image XObject
//! - **PNG**: decoded samples stored losslessly with `FlateDecode`, alpha as `SMask`
//! - **Other formats**: decoded, re-encoded to PNG, then embedded as PNG
//!
//! # Page sizing
//!
//! See [`ImagePlacement::compute`]. Image pixels are treated as points.

use std::io::{Cursor, Write};

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::codecs::jpeg::JpegDecoder;
use image::{DynamicImage, ExtendedColorType, GenericImageView, ImageDecoder, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use serde::Serialize;
use tracing::debug;

use super::{ImageKind, InputFile};
use crate::error::{PageDeckError, Result};

/// Longest side, in points, of a page sized from the image itself.
pub const MAX_INTRINSIC_SIDE: f32 = 2000.0;

const IMAGE_NAME: &str = "Im0";

/// A page size in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    /// Width in points.
    pub width: f32,
    /// Height in points.
    pub height: f32,
}

impl PageSize {
    /// Create a page size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Where an image lands on its page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImagePlacement {
    /// Size of the generated page.
    pub page: PageSize,
    /// Left edge of the drawn image.
    pub x: f32,
    /// Bottom edge of the drawn image.
    pub y: f32,
    /// Drawn width.
    pub width: f32,
    /// Drawn height.
    pub height: f32,
    /// Uniform scale applied to the image.
    pub scale: f32,
}

impl ImagePlacement {
    /// Compute page size and image placement.
    ///
    /// With a target, the page takes the target size (at least 1pt per axis)
    /// and the image is scaled uniformly to fit, centered on both axes.
    /// Without one, the page takes the image size, scaled down so the longer
    /// side is at most [`MAX_INTRINSIC_SIDE`], with the image at the origin.
    /// Drawn sizes never drop below 1pt.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagedeck::input::{ImagePlacement, PageSize};
    ///
    /// let placement = ImagePlacement::compute(200.0, 100.0, Some(PageSize::new(400.0, 400.0)));
    /// assert_eq!(placement.page, PageSize::new(400.0, 400.0));
    /// assert_eq!((placement.width, placement.height), (400.0, 200.0));
    /// assert_eq!((placement.x, placement.y), (0.0, 100.0));
    /// ```
    pub fn compute(image_width: f32, image_height: f32, target: Option<PageSize>) -> Self {
        match target {
            Some(target) => {
                let page = PageSize::new(target.width.max(1.0), target.height.max(1.0));
                let scale = (page.width / image_width).min(page.height / image_height);
                let width = (image_width * scale).max(1.0);
                let height = (image_height * scale).max(1.0);
                Self {
                    page,
                    x: (page.width - width) / 2.0,
                    y: (page.height - height) / 2.0,
                    width,
                    height,
                    scale,
                }
            }
            None => {
                let longest = image_width.max(image_height);
                let scale = (MAX_INTRINSIC_SIDE / longest).min(1.0);
                let width = (image_width * scale).max(1.0);
                let height = (image_height * scale).max(1.0);
                Self {
                    page: PageSize::new(width, height),
                    x: 0.0,
                    y: 0.0,
                    width,
                    height,
                    scale,
                }
            }
        }
    }
}

/// How the image data ended up in the PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageEmbedding {
    /// Original JPEG bytes, `DCTDecode`.
    Jpeg,
    /// PNG samples, `FlateDecode`.
    Png,
    /// Decoded and re-encoded to PNG before embedding.
    Rasterized,
}

/// A single-page PDF generated from an image.
#[derive(Clone)]
pub struct NormalizedImage {
    /// Serialized PDF.
    pub bytes: Vec<u8>,
    /// Page size and image position.
    pub placement: ImagePlacement,
    /// Embedding path that was used.
    pub embedding: ImageEmbedding,
}

impl std::fmt::Debug for NormalizedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizedImage")
            .field("len", &self.bytes.len())
            .field("placement", &self.placement)
            .field("embedding", &self.embedding)
            .finish()
    }
}

/// Image XObject ready to be placed in a document.
struct EmbeddedImage {
    width: u32,
    height: u32,
    color_space: &'static str,
    filter: &'static str,
    data: Vec<u8>,
    invert_cmyk: bool,
    soft_mask: Option<Vec<u8>>,
}

/// Converts raster images into single-page PDFs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageNormalizer;

impl ImageNormalizer {
    /// Create a new normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Normalize an image upload into a one-page PDF.
    ///
    /// This does CPU-bound decoding; async callers should run it on a blocking
    /// thread.
    ///
    /// # Arguments
    ///
    /// * `file` - The image upload
    /// * `kind` - Declared image type, selecting the embedding path
    /// * `target` - Page size to fit into, or `None` to size from the image
    ///
    /// # Errors
    ///
    /// - [`PageDeckError::ImageDecode`] if the image cannot be decoded or has a zero dimension
    /// - [`PageDeckError::EmptyEncoding`] if re-encoding produced no bytes
    pub fn normalize(
        &self,
        file: &InputFile,
        kind: ImageKind,
        target: Option<PageSize>,
    ) -> Result<NormalizedImage> {
        let (image, embedding) = match kind {
            ImageKind::Jpeg => (embed_jpeg(file)?, ImageEmbedding::Jpeg),
            ImageKind::Png => (embed_png(&file.name, &file.bytes)?, ImageEmbedding::Png),
            ImageKind::Other => {
                let png = rasterize(file)?;
                (embed_png(&file.name, &png)?, ImageEmbedding::Rasterized)
            }
        };

        let placement = ImagePlacement::compute(image.width as f32, image.height as f32, target);
        let bytes = build_document(&image, &placement)
            .map_err(|e| PageDeckError::image_decode(&file.name, e))?;

        debug!(
            "Normalized {} ({}x{}px, {:?}) to {}x{}pt page",
            file.name, image.width, image.height, embedding, placement.page.width, placement.page.height
        );

        Ok(NormalizedImage {
            bytes,
            placement,
            embedding,
        })
    }
}

fn check_dimensions(name: &str, width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(PageDeckError::image_decode(
            name,
            format!("image has zero size ({width}x{height})"),
        ));
    }
    Ok(())
}

fn embed_jpeg(file: &InputFile) -> Result<EmbeddedImage> {
    let decoder = JpegDecoder::new(Cursor::new(&file.bytes))
        .map_err(|e| PageDeckError::image_decode(&file.name, e))?;
    let (width, height) = decoder.dimensions();
    check_dimensions(&file.name, width, height)?;

    let (color_space, invert_cmyk) = match decoder.original_color_type() {
        ExtendedColorType::L8 | ExtendedColorType::L16 => ("DeviceGray", false),
        ExtendedColorType::Cmyk8 => ("DeviceCMYK", true),
        _ => ("DeviceRGB", false),
    };

    Ok(EmbeddedImage {
        width,
        height,
        color_space,
        filter: "DCTDecode",
        data: file.bytes.clone(),
        invert_cmyk,
        soft_mask: None,
    })
}

fn embed_png(name: &str, bytes: &[u8]) -> Result<EmbeddedImage> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|e| PageDeckError::image_decode(name, e))?;
    let (width, height) = image.dimensions();
    check_dimensions(name, width, height)?;

    let has_alpha = image.color().has_alpha();
    let (color_space, samples, alpha) = if image.color().has_color() {
        if has_alpha {
            let rgba = image.to_rgba8();
            let mut rgb = Vec::with_capacity((width * height * 3) as usize);
            let mut alpha = Vec::with_capacity((width * height) as usize);
            for pixel in rgba.pixels() {
                rgb.extend_from_slice(&pixel.0[..3]);
                alpha.push(pixel.0[3]);
            }
            ("DeviceRGB", rgb, Some(alpha))
        } else {
            ("DeviceRGB", image.to_rgb8().into_raw(), None)
        }
    } else if has_alpha {
        let luma_alpha = image.to_luma_alpha8();
        let mut gray = Vec::with_capacity((width * height) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for pixel in luma_alpha.pixels() {
            gray.push(pixel.0[0]);
            alpha.push(pixel.0[1]);
        }
        ("DeviceGray", gray, Some(alpha))
    } else {
        ("DeviceGray", image.to_luma8().into_raw(), None)
    };

    // fully opaque masks are dropped
    let alpha = alpha.filter(|a| a.iter().any(|v| *v != u8::MAX));

    let compress = |data: &[u8]| {
        deflate(data).map_err(|e| PageDeckError::image_decode(name, e))
    };

    Ok(EmbeddedImage {
        width,
        height,
        color_space,
        filter: "FlateDecode",
        data: compress(&samples)?,
        invert_cmyk: false,
        soft_mask: alpha.as_deref().map(compress).transpose()?,
    })
}

/// Decode any supported format and re-encode it as PNG.
fn rasterize(file: &InputFile) -> Result<Vec<u8>> {
    let image: DynamicImage = image::load_from_memory(&file.bytes)
        .map_err(|e| PageDeckError::image_decode(&file.name, e))?;
    let (width, height) = image.dimensions();
    check_dimensions(&file.name, width, height)?;

    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| PageDeckError::image_decode(&file.name, e))?;

    let png = cursor.into_inner();
    if png.is_empty() {
        return Err(PageDeckError::EmptyEncoding {
            name: file.name.clone(),
        });
    }
    Ok(png)
}

fn deflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

fn image_dictionary(image: &EmbeddedImage, color_space: &str) -> Dictionary {
    dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => image.width as i64,
        "Height" => image.height as i64,
        "ColorSpace" => color_space,
        "BitsPerComponent" => 8,
        "Filter" => image.filter,
    }
}

fn build_document(image: &EmbeddedImage, placement: &ImagePlacement) -> lopdf::Result<Vec<u8>> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut image_dict = image_dictionary(image, image.color_space);
    if image.invert_cmyk {
        // Adobe CMYK JPEGs store inverted samples
        image_dict.set(
            "Decode",
            [1, 0, 1, 0, 1, 0, 1, 0]
                .into_iter()
                .map(Object::Integer)
                .collect::<Vec<_>>(),
        );
    }
    if let Some(mask) = &image.soft_mask {
        let mask_dict = image_dictionary(image, "DeviceGray");
        let mask_id = doc.add_object(Stream::new(mask_dict, mask.clone()).with_compression(false));
        image_dict.set("SMask", mask_id);
    }
    let image_id =
        doc.add_object(Stream::new(image_dict, image.data.clone()).with_compression(false));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(placement.width),
                    0.into(),
                    0.into(),
                    Object::Real(placement.height),
                    Object::Real(placement.x),
                    Object::Real(placement.y),
                ],
            ),
            Operation::new("Do", vec![IMAGE_NAME.into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(placement.page.width),
            Object::Real(placement.page.height),
        ],
        "Resources" => dictionary! {
            "XObject" => dictionary! { IMAGE_NAME => image_id },
        },
        "Contents" => content_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
