// image_io.rs

use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::{FeError, Result};
use crate::tensor::tensor::Tensor;

/// Decode an image file into an 8-bit RGBA tensor.
pub fn read_tensor(path: &Path) -> Result<Tensor> {
    let img = image::open(path)?.to_rgba8();
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(FeError::EmptyImage(path.to_path_buf()));
    }
    let mut t = Tensor::zeros(w as usize, h as usize);
    for row in 0..h {
        for col in 0..w {
            let px = img.get_pixel(col, row).0;
            let idx = t.idx(row as usize, col as usize);
            t.r[idx] = px[0] as u32;
            t.g[idx] = px[1] as u32;
            t.b[idx] = px[2] as u32;
            t.a[idx] = px[3] as u32;
        }
    }
    Ok(t)
}

/// Write a tensor as PNG. Channel values keep only their low 8 bits; the
/// unnormalized inner products of blur kernels overflow by design.
pub fn write_tensor(path: &Path, t: &Tensor) -> Result<()> {
    let mut img = RgbaImage::new(t.w as u32, t.h as u32);
    for row in 0..t.h {
        for col in 0..t.w {
            let idx = t.idx(row, col);
            img.put_pixel(
                col as u32,
                row as u32,
                Rgba([
                    t.r[idx] as u8,
                    t.g[idx] as u8,
                    t.b[idx] as u8,
                    t.a[idx] as u8,
                ]),
            );
        }
    }
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
