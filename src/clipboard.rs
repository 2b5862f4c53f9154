use anyhow::{anyhow, Context, Result};
use arboard::Clipboard;
use image::{DynamicImage, RgbaImage};

/// Returns `Ok(None)` when the clipboard holds no image data.
pub fn read_image() -> Result<Option<DynamicImage>> {
    let mut clipboard = Clipboard::new().context("cannot initialize clipboard")?;
    let image = match clipboard.get_image() {
        Ok(data) => data,
        Err(_) => return Ok(None),
    };

    let width = image.width as u32;
    let height = image.height as u32;
    let bytes = image.bytes.into_owned();

    let rgba = RgbaImage::from_raw(width, height, bytes)
        .ok_or_else(|| anyhow!("clipboard image has invalid shape"))?;

    Ok(Some(DynamicImage::ImageRgba8(rgba)))
}

pub fn write_png(png_bytes: &[u8]) -> Result<()> {
    let mut clipboard = Clipboard::new().context("cannot initialize clipboard")?;
    let decoded = image::load_from_memory(png_bytes).context("cannot decode png for clipboard")?;
    let rgba = decoded.to_rgba8();
    let width = rgba.width() as usize;
    let height = rgba.height() as usize;
    clipboard
        .set_image(arboard::ImageData {
            width,
            height,
            bytes: std::borrow::Cow::Owned(rgba.into_raw()),
        })
        .context("cannot write image to clipboard")
}
