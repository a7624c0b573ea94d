//! Builders for in-memory test inputs.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use crate::input::InputFile;

/// A PDF with one page per `(width, height)` entry, each page showing its number.
pub fn pdf_bytes(sizes: &[(f32, f32)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for (index, (width, height)) in sizes.iter().enumerate() {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![50.into(), 50.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Page {}", index + 1))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Real(*width), Object::Real(*height)],
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save pdf");
    bytes
}

/// A US Letter PDF with `count` pages.
pub fn letter_pdf(count: usize) -> Vec<u8> {
    pdf_bytes(&vec![(612.0, 792.0); count])
}

fn encode(image: image::DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, format).expect("encode image");
    cursor.into_inner()
}

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// An opaque RGB PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(gradient(width, height).into(), ImageFormat::Png)
}

/// An RGBA PNG with a transparent left half.
pub fn png_rgba_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_fn(width, height, |x, _| {
        let alpha = if x < width / 2 { 0 } else { 255 };
        Rgba([200, 10, 10, alpha])
    });
    encode(image.into(), ImageFormat::Png)
}

/// A baseline RGB JPEG.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(gradient(width, height).into(), ImageFormat::Jpeg)
}

/// A GIF, which takes the rasterize path.
pub fn gif_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::DynamicImage::ImageRgba8(
        RgbaImage::from_pixel(width, height, Rgba([0, 0, 255, 255])),
    );
    encode(image, ImageFormat::Gif)
}

/// A BMP, which takes the rasterize path.
pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(gradient(width, height).into(), ImageFormat::Bmp)
}

/// Upload wrapper around PDF bytes.
pub fn pdf_file(name: &str, sizes: &[(f32, f32)]) -> InputFile {
    InputFile::new(name, pdf_bytes(sizes)).with_content_type("application/pdf")
}

/// Upload wrapper around PNG bytes.
pub fn png_file(name: &str, width: u32, height: u32) -> InputFile {
    InputFile::new(name, png_bytes(width, height)).with_content_type("image/png")
}

/// Upload wrapper around JPEG bytes.
pub fn jpeg_file(name: &str, width: u32, height: u32) -> InputFile {
    InputFile::new(name, jpeg_bytes(width, height)).with_content_type("image/jpeg")
}

/// Media boxes of every page in `bytes`, in page order.
pub fn media_boxes(bytes: &[u8]) -> Vec<(f32, f32)> {
    let doc = Document::load_mem(bytes).expect("parse output");
    doc.get_pages()
        .values()
        .map(|page_id| {
            let page = doc.get_dictionary(*page_id).expect("page dict");
            let media_box = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("media box");
            let value = |i: usize| {
                media_box[i]
                    .as_float()
                    .expect("numeric media box entry")
            };
            (value(2) - value(0), value(3) - value(1))
        })
        .collect()
}
