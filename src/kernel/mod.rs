//! Integer masks for the supported convolution kernels.
//!
//! Each constructor returns `(mask, divisor)`. The divisor is reported for
//! the caller's reference only; it is never divided into the decrypted
//! inner products, which the raster writer truncates to 8 bits.

use crate::error::{FeError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KernelKind {
    Identity,
    GaussianBlur,
    BoxBlur,
    DownsizePartial,
    DownsizeFull,
}

impl KernelKind {
    pub fn parse(name: &str) -> Result<KernelKind> {
        match name {
            "identity" => Ok(KernelKind::Identity),
            "gaussian_blur" => Ok(KernelKind::GaussianBlur),
            "box_blur" => Ok(KernelKind::BoxBlur),
            "downsize_partial" => Ok(KernelKind::DownsizePartial),
            "downsize_full" => Ok(KernelKind::DownsizeFull),
            _ => Err(FeError::UnknownKernel(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            KernelKind::Identity => "identity",
            KernelKind::GaussianBlur => "gaussian_blur",
            KernelKind::BoxBlur => "box_blur",
            KernelKind::DownsizePartial => "downsize_partial",
            KernelKind::DownsizeFull => "downsize_full",
        }
    }

    /// Centred kernels span 2 * offset + 1, downsample grids offset + 1.
    pub fn kernel_size(self, offset: usize) -> usize {
        if self.is_centered() {
            2 * offset + 1
        } else {
            offset + 1
        }
    }

    pub fn is_centered(self) -> bool {
        matches!(
            self,
            KernelKind::Identity | KernelKind::GaussianBlur | KernelKind::BoxBlur
        )
    }
}

/// 1 at the centre, 0 elsewhere. Any odd size.
pub fn identity(size: usize) -> Result<(Vec<u32>, u32)> {
    if size % 2 == 0 {
        return Err(FeError::UnsupportedKernelSize {
            kernel: "identity",
            size,
        });
    }
    let mut mask = vec![0; size * size];
    mask[(size * size - 1) / 2] = 1;
    Ok((mask, 1))
}

pub fn gaussian_blur(size: usize) -> Result<(Vec<u32>, u32)> {
    match size {
        3 => Ok((vec![1, 2, 1, 2, 4, 2, 1, 2, 1], 16)),
        5 => Ok((
            vec![
                1, 4, 6, 4, 1, //
                4, 16, 24, 16, 4, //
                6, 24, 36, 24, 6, //
                4, 16, 24, 16, 4, //
                1, 4, 6, 4, 1,
            ],
            256,
        )),
        _ => Err(FeError::UnsupportedKernelSize {
            kernel: "gaussian_blur",
            size,
        }),
    }
}

pub fn box_blur(size: usize) -> Result<(Vec<u32>, u32)> {
    match size {
        3 | 5 => Ok((vec![1; size * size], (size * size) as u32)),
        _ => Err(FeError::UnsupportedKernelSize {
            kernel: "box_blur",
            size,
        }),
    }
}

/// One-hot mask selecting the grid offset `idx` of a size x size tile.
pub fn downsize_partial(size: usize, idx: usize) -> Result<(Vec<u32>, u32)> {
    if idx >= size * size {
        return Err(FeError::IndexOutOfRange {
            idx,
            max: size * size - 1,
        });
    }
    let mut mask = vec![0; size * size];
    mask[idx] = 1;
    Ok((mask, 1))
}

/// The full one-hot set, one mask per grid offset; decryptions under these
/// keys reassemble the whole image via the tile merge.
pub fn downsize_full(size: usize) -> Vec<(Vec<u32>, u32)> {
    (0..size * size)
        .map(|idx| {
            let mut mask = vec![0; size * size];
            mask[idx] = 1;
            (mask, 1)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_any_odd_size() {
        let (mask, divisor) = identity(3).unwrap();
        assert_eq!(mask, vec![0, 0, 0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(divisor, 1);

        let (mask, _) = identity(5).unwrap();
        assert_eq!(mask.iter().sum::<u32>(), 1);
        assert_eq!(mask[12], 1);

        assert!(identity(4).is_err());
    }

    #[test]
    fn test_gaussian_blur_masks() {
        let (mask, divisor) = gaussian_blur(3).unwrap();
        assert_eq!(divisor, 16);
        assert_eq!(mask.iter().sum::<u32>(), 16);
        assert_eq!(mask[4], 4);

        let (mask, divisor) = gaussian_blur(5).unwrap();
        assert_eq!(divisor, 256);
        assert_eq!(mask.iter().sum::<u32>(), 256);
        assert_eq!(mask[12], 36);

        assert!(gaussian_blur(7).is_err());
    }

    #[test]
    fn test_box_blur_masks() {
        let (mask, divisor) = box_blur(3).unwrap();
        assert_eq!(mask, vec![1; 9]);
        assert_eq!(divisor, 9);

        let (mask, divisor) = box_blur(5).unwrap();
        assert_eq!(mask.len(), 25);
        assert_eq!(divisor, 25);

        assert!(box_blur(2).is_err());
    }

    #[test]
    fn test_downsize_partial() {
        let (mask, divisor) = downsize_partial(2, 2).unwrap();
        assert_eq!(mask, vec![0, 0, 1, 0]);
        assert_eq!(divisor, 1);

        assert!(matches!(
            downsize_partial(2, 4),
            Err(FeError::IndexOutOfRange { idx: 4, max: 3 })
        ));
    }

    #[test]
    fn test_downsize_full_covers_every_offset() {
        let masks = downsize_full(2);
        assert_eq!(masks.len(), 4);
        for (idx, (mask, divisor)) in masks.iter().enumerate() {
            assert_eq!(mask.iter().sum::<u32>(), 1);
            assert_eq!(mask[idx], 1);
            assert_eq!(*divisor, 1);
        }
    }

    #[test]
    fn test_kind_parse_and_geometry() {
        let kind = KernelKind::parse("gaussian_blur").unwrap();
        assert_eq!(kind, KernelKind::GaussianBlur);
        assert!(kind.is_centered());
        assert_eq!(kind.kernel_size(1), 3);
        assert_eq!(kind.kernel_size(2), 5);

        let kind = KernelKind::parse("downsize_full").unwrap();
        assert!(!kind.is_centered());
        assert_eq!(kind.kernel_size(1), 2);
        assert_eq!(kind.name(), "downsize_full");

        assert!(matches!(
            KernelKind::parse("sharpen"),
            Err(FeError::UnknownKernel(_))
        ));
    }
}
