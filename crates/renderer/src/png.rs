//! PNG encoding for icon bitmaps.
//!
//! Icons use a handful of flat colors plus anti-aliased edges, so most fit
//! in a 256-entry palette. [`encode_png`] picks indexed color (type 3) when
//! they do and falls back to truecolor with alpha (type 6) otherwise.
//!
//! Encoding is deterministic: equal pixels always give equal bytes.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::io::Write;
use thiserror::Error;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];
const MAX_PALETTE_SIZE: usize = 256;

const COLOR_TYPE_INDEXED: u8 = 3;
const COLOR_TYPE_RGBA: u8 = 6;

#[derive(Debug, Error)]
pub enum PngError {
    #[error("Pixel buffer has {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("IDAT compression failed: {0}")]
    Compression(#[from] std::io::Error),
}

/// Encode straight-alpha RGBA pixels, choosing the smaller color type.
pub fn encode_png(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, PngError> {
    check_size(pixels, width, height)?;
    match build_palette(pixels) {
        Some((palette, indices)) => encode_indexed(width, height, &palette, &indices),
        None => encode_rgba(pixels, width, height),
    }
}

fn check_size(pixels: &[u8], width: usize, height: usize) -> Result<(), PngError> {
    let expected = width * height * 4;
    if pixels.len() != expected {
        return Err(PngError::BufferSize {
            width,
            height,
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// Palette in first-seen order and one index per pixel, or `None` when the
/// image has more than 256 colors.
pub fn build_palette(pixels: &[u8]) -> Option<(Vec<[u8; 4]>, Vec<u8>)> {
    let mut lookup: HashMap<[u8; 4], u8> = HashMap::new();
    let mut palette: Vec<[u8; 4]> = Vec::new();
    let mut indices = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let color = [px[0], px[1], px[2], px[3]];
        let index = match lookup.get(&color) {
            Some(&i) => i,
            None => {
                if palette.len() == MAX_PALETTE_SIZE {
                    return None;
                }
                let i = palette.len() as u8;
                palette.push(color);
                lookup.insert(color, i);
                i
            }
        };
        indices.push(index);
    }
    Some((palette, indices))
}

/// Encode palette indices (one byte per pixel) as an indexed PNG.
pub fn encode_indexed(
    width: usize,
    height: usize,
    palette: &[[u8; 4]],
    indices: &[u8],
) -> Result<Vec<u8>, PngError> {
    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &header(width, height, COLOR_TYPE_INDEXED));

    let plte: Vec<u8> = palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.iter().any(|c| c[3] < 255) {
        let trns: Vec<u8> = palette.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    write_chunk(&mut png, b"IDAT", &deflate_rows(indices, width, height)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Encode straight-alpha RGBA pixels as a truecolor PNG.
pub fn encode_rgba(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, PngError> {
    check_size(pixels, width, height)?;

    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &header(width, height, COLOR_TYPE_RGBA));
    write_chunk(&mut png, b"IDAT", &deflate_rows(pixels, width * 4, height)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn header(width: usize, height: usize, color_type: u8) -> [u8; 13] {
    let mut ihdr = [0u8; 13];
    ihdr[0..4].copy_from_slice(&(width as u32).to_be_bytes());
    ihdr[4..8].copy_from_slice(&(height as u32).to_be_bytes());
    ihdr[8] = 8; // bit depth
    ihdr[9] = color_type;
    // compression, filter and interlace methods stay 0
    ihdr
}

/// Zlib-compress `height` rows of `row_bytes` each, every row prefixed with
/// filter type 0.
fn deflate_rows(data: &[u8], row_bytes: usize, height: usize) -> Result<Vec<u8>, std::io::Error> {
    let mut raw = Vec::with_capacity(height * (row_bytes + 1));
    if row_bytes > 0 {
        for row in data.chunks_exact(row_bytes).take(height) {
            raw.push(0);
            raw.extend_from_slice(row);
        }
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(&raw)?;
    encoder.finish()
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_types(png: &[u8]) -> Vec<String> {
        let mut types = Vec::new();
        let mut pos = SIGNATURE.len();
        while pos + 8 <= png.len() {
            let len = u32::from_be_bytes(png[pos..pos + 4].try_into().unwrap()) as usize;
            types.push(String::from_utf8_lossy(&png[pos + 4..pos + 8]).into_owned());
            pos += 12 + len;
        }
        types
    }

    #[test]
    fn test_flat_image_is_indexed() {
        let pixels = [255u8, 0, 0, 255].repeat(4 * 4);
        let png = encode_png(&pixels, 4, 4).unwrap();
        assert_eq!(&png[..8], &SIGNATURE);
        assert_eq!(png[8 + 8 + 9], COLOR_TYPE_INDEXED);
        assert_eq!(chunk_types(&png), vec!["IHDR", "PLTE", "IDAT", "IEND"]);
    }

    #[test]
    fn test_transparency_adds_trns() {
        let mut pixels = [0u8, 0, 0, 0].repeat(4);
        pixels[0..4].copy_from_slice(&[255, 255, 255, 255]);
        let png = encode_png(&pixels, 2, 2).unwrap();
        assert_eq!(chunk_types(&png), vec!["IHDR", "PLTE", "tRNS", "IDAT", "IEND"]);
    }

    #[test]
    fn test_many_colors_fall_back_to_rgba() {
        let pixels: Vec<u8> = (0..300u32)
            .flat_map(|i| [(i % 256) as u8, (i / 256) as u8, 7, 255])
            .collect();
        assert!(build_palette(&pixels).is_none());
        let png = encode_png(&pixels, 300, 1).unwrap();
        assert_eq!(png[8 + 8 + 9], COLOR_TYPE_RGBA);
    }

    #[test]
    fn test_buffer_size_checked() {
        let err = encode_png(&[0u8; 12], 2, 2).unwrap_err();
        assert!(matches!(err, PngError::BufferSize { expected: 16, actual: 12, .. }));
    }

    #[test]
    fn test_crc_matches_reference() {
        // IEND with no data always carries CRC 0xAE426082
        let pixels = [0u8; 4];
        let png = encode_png(&pixels, 1, 1).unwrap();
        assert_eq!(&png[png.len() - 4..], &[0xAE, 0x42, 0x60, 0x82]);
    }
}
