//! Tray icon rendering

use anyhow::Result;

/// Embedded "system software update" icon
const UPDATE_ICON_DATA: &[u8] = include_bytes!("../../assets/icons/system-software-update.png");

/// Decoded RGBA pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbaImage {
    /// Fully transparent `size` x `size` square
    pub fn transparent(size: u32) -> RgbaImage {
        RgbaImage {
            width: size,
            height: size,
            data: vec![0; (size * size * 4) as usize],
        }
    }

    /// Nearest-neighbour resample to a `size` x `size` square
    pub fn scaled(&self, size: u32) -> RgbaImage {
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            let src_y = (y as u64 * self.height as u64 / size as u64) as u32;
            for x in 0..size {
                let src_x = (x as u64 * self.width as u64 / size as u64) as u32;
                let offset = ((src_y * self.width + src_x) * 4) as usize;
                data.extend_from_slice(&self.data[offset..offset + 4]);
            }
        }

        RgbaImage {
            width: size,
            height: size,
            data,
        }
    }
}

/// The indicator icon, decoded once and rendered at any pixel size
pub struct IndicatorIcon {
    base: RgbaImage,
}

impl IndicatorIcon {
    /// Load the embedded icon
    pub fn new() -> Result<Self> {
        Ok(Self {
            base: decode_png(UPDATE_ICON_DATA)?,
        })
    }

    /// Render at `size` pixels; size 0 means no icon
    pub fn image(&self, size: u8) -> Option<RgbaImage> {
        (size > 0).then(|| self.base.scaled(size as u32))
    }
}

/// Decode PNG data to RGBA
pub fn decode_png(data: &[u8]) -> Result<RgbaImage> {
    let decoder = png::Decoder::new(std::io::Cursor::new(data));
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;

    // Truncate buffer to actual size
    buf.truncate(info.buffer_size());

    let data = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => {
            let mut rgba = Vec::with_capacity(buf.len() * 4 / 3);
            for chunk in buf.chunks(3) {
                rgba.extend_from_slice(chunk);
                rgba.push(255);
            }
            rgba
        }
        png::ColorType::GrayscaleAlpha => {
            let mut rgba = Vec::with_capacity(buf.len() * 2);
            for chunk in buf.chunks(2) {
                rgba.extend_from_slice(&[chunk[0], chunk[0], chunk[0], chunk[1]]);
            }
            rgba
        }
        png::ColorType::Grayscale => {
            let mut rgba = Vec::with_capacity(buf.len() * 4);
            for &gray in &buf {
                rgba.extend_from_slice(&[gray, gray, gray, 255]);
            }
            rgba
        }
        png::ColorType::Indexed => {
            anyhow::bail!("Indexed color not supported");
        }
    };

    Ok(RgbaImage {
        width: info.width,
        height: info.height,
        data,
    })
}
