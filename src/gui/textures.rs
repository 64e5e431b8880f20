//! Uploaded images as egui textures
//!
//! Images arrive as data URIs. PNG payloads are decoded once per slot and
//! cached until the slot's data changes; anything else is drawn as a
//! placeholder.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Cursor;

use anyhow::{Context, Result, anyhow, bail};
use eframe::egui;
use tracing::{debug, warn};

use super::constants::MAX_TEXTURE_SIDE;
use crate::upload;

struct CachedTexture {
    fingerprint: u64,
    texture: Option<egui::TextureHandle>,
}

#[derive(Default)]
pub struct TextureCache {
    slots: HashMap<String, CachedTexture>,
}

fn fingerprint(data: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    data.hash(&mut hasher);
    hasher.finish()
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for `slot`, decoding `data_uri` when it changed since the last call
    pub fn get(&mut self, ctx: &egui::Context, slot: &str, data_uri: &str) -> Option<egui::TextureHandle> {
        let print = fingerprint(data_uri);
        if let Some(cached) = self.slots.get(slot) {
            if cached.fingerprint == print {
                return cached.texture.clone();
            }
        }

        let texture = match load_image(data_uri) {
            Ok(image) => {
                debug!(slot, size = ?image.size, "Loaded image texture");
                Some(ctx.load_texture(format!("upload-{slot}"), image, egui::TextureOptions::LINEAR))
            }
            Err(err) => {
                warn!(slot, error = %err, "Image cannot be displayed, using placeholder");
                None
            }
        };
        self.slots.insert(
            slot.to_string(),
            CachedTexture { fingerprint: print, texture: texture.clone() },
        );
        texture
    }

    /// Forget every cached texture, e.g. after a config reset
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

fn load_image(data_uri: &str) -> Result<egui::ColorImage> {
    let (mime, bytes) = upload::decode_data_uri(data_uri).ok_or_else(|| anyhow!("Not a base64 data URI"))?;
    if mime != "image/png" {
        bail!("Preview decoding supports PNG only (got {mime})");
    }
    decode_png(&bytes)
}

/// Decode PNG bytes into an RGBA image
pub fn decode_png(bytes: &[u8]) -> Result<egui::ColorImage> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info().context("Failed to read PNG header")?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    if width == 0 || height == 0 || width > MAX_TEXTURE_SIDE || height > MAX_TEXTURE_SIDE {
        bail!("Unsupported PNG size {width}x{height}");
    }

    // Large enough for the widest 8-bit layout
    let mut buf = vec![0; width as usize * height as usize * 4];
    let info = reader.next_frame(&mut buf).context("Failed to decode PNG data")?;
    let pixels = &buf[..info.buffer_size()];

    let rgba = match info.color_type {
        png::ColorType::Rgba => pixels.to_vec(),
        png::ColorType::Rgb => {
            let mut rgba = Vec::with_capacity(pixels.len() / 3 * 4);
            for chunk in pixels.chunks_exact(3) {
                rgba.extend_from_slice(chunk);
                rgba.push(0xFF);
            }
            rgba
        }
        png::ColorType::Grayscale => pixels.iter().flat_map(|&v| [v, v, v, 0xFF]).collect(),
        png::ColorType::GrayscaleAlpha => pixels
            .chunks_exact(2)
            .flat_map(|chunk| [chunk[0], chunk[0], chunk[0], chunk[1]])
            .collect(),
        other => bail!("Unsupported PNG color type {other:?}"),
    };

    Ok(egui::ColorImage::from_rgba_unmultiplied(
        [info.width as usize, info.height as usize],
        &rgba,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().expect("header");
            writer.write_image_data(data).expect("data");
            writer.finish().expect("finish");
        }
        out
    }

    #[test]
    fn test_rgb_png_gets_opaque_alpha() {
        let bytes = encode(2, 1, png::ColorType::Rgb, &[255, 0, 0, 0, 0, 255]);
        let image = decode_png(&bytes).expect("decodes");
        assert_eq!(image.size, [2, 1]);
        assert_eq!(image.pixels[0], egui::Color32::from_rgb(255, 0, 0));
        assert_eq!(image.pixels[1], egui::Color32::from_rgb(0, 0, 255));
    }

    #[test]
    fn test_grayscale_png_expands() {
        let bytes = encode(1, 1, png::ColorType::Grayscale, &[128]);
        let image = decode_png(&bytes).expect("decodes");
        assert_eq!(image.pixels[0], egui::Color32::from_rgb(128, 128, 128));
    }

    #[test]
    fn test_non_png_data_uri_is_refused() {
        assert!(load_image("data:image/gif;base64,R0lGODlh").is_err());
        assert!(load_image("not a uri").is_err());
        assert!(decode_png(b"garbage").is_err());
    }

    #[test]
    fn test_png_data_uri_loads() {
        let bytes = encode(1, 1, png::ColorType::Rgba, &[1, 2, 3, 255]);
        let mime = "image/png".parse().expect("mime");
        let uri = upload::encode_data_uri(&mime, &bytes);
        let image = load_image(&uri).expect("decodes");
        assert_eq!(image.size, [1, 1]);
    }
}
