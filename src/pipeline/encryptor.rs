// encryptor.rs

use rug::Integer;

use crate::error::{FeError, Result};
use crate::ipfe::keys::{DdhParams, MasterKeys};
use crate::ipfe::scheme::Ddh;
use crate::tensor::tensor::Tensor;

/// Per-coordinate bound on plaintexts and mask entries, well above any
/// 8-bit channel value or kernel weight.
pub const PLAINTEXT_BOUND: u32 = 4096;

/// One ciphertext per surviving window per channel, in row-major window
/// order. Mirrors the shape of a [`Tensor`], with vectors of group
/// elements in place of pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct EncryptTensor {
    pub w: usize,
    pub h: usize,
    pub r: Vec<Vec<Integer>>,
    pub g: Vec<Vec<Integer>>,
    pub b: Vec<Vec<Integer>>,
    pub a: Vec<Vec<Integer>>,
}

impl EncryptTensor {
    pub fn new(w: usize, h: usize) -> EncryptTensor {
        EncryptTensor {
            w,
            h,
            r: Vec::with_capacity(w * h),
            g: Vec::with_capacity(w * h),
            b: Vec::with_capacity(w * h),
            a: Vec::with_capacity(w * h),
        }
    }
}

/// Owner side of the pipeline: holds the scheme, the master keys and an
/// append-only log of derived (mask, function key) pairs.
pub struct EncryptScheme {
    scheme: Ddh,
    keys: MasterKeys,
    masks: Vec<Vec<Integer>>,
    func_keys: Vec<Integer>,
}

impl EncryptScheme {
    pub fn new(l: usize, key_length: u32) -> Result<EncryptScheme> {
        EncryptScheme::from_scheme(Ddh::new(l, key_length, PLAINTEXT_BOUND)?)
    }

    /// Scheme over the deterministic precomputed group for `key_length`.
    pub fn new_precomp(l: usize, key_length: u32) -> Result<EncryptScheme> {
        EncryptScheme::from_scheme(Ddh::new_precomp(l, key_length, PLAINTEXT_BOUND)?)
    }

    fn from_scheme(scheme: Ddh) -> Result<EncryptScheme> {
        let keys = scheme.generate_master_keys()?;
        Ok(EncryptScheme {
            scheme,
            keys,
            masks: Vec::new(),
            func_keys: Vec::new(),
        })
    }

    pub fn params(&self) -> &DdhParams {
        &self.scheme.params
    }

    /// Derived masks, in derivation order.
    pub fn masks(&self) -> &[Vec<Integer>] {
        &self.masks
    }

    /// Derived function keys, in derivation order.
    pub fn func_keys(&self) -> &[Integer] {
        &self.func_keys
    }

    /// Derive the function key for a mask and append both to the log.
    pub fn derive_function_key(&mut self, mask: &[u32]) -> Result<()> {
        let y: Vec<Integer> = mask.iter().map(|&v| Integer::from(v)).collect();
        let func_key = self.scheme.derive_key(&self.keys.msk, &y)?;
        self.masks.push(y);
        self.func_keys.push(func_key);
        Ok(())
    }

    /// Encrypt every fully interior (2 dist + 1) window of a padded
    /// tensor. The output grid has the pre-padding dimensions.
    pub fn encrypt_center(&self, dist: usize, t: &Tensor) -> Result<EncryptTensor> {
        let mut et = EncryptTensor::new(t.w - 2 * dist, t.h - 2 * dist);
        for row in 0..t.h {
            for col in 0..t.w {
                if !t.is_non_edge_center(dist, t.idx(row, col)) {
                    continue;
                }
                let sub = t.sub_tensor_center(dist, row, col)?;
                self.encrypt_window(&sub, &mut et, row, col)?;
            }
        }
        Ok(et)
    }

    /// Encrypt every k x k tile of a cropped tensor, anchored at the
    /// top-left stride grid. The output grid is (w/k) x (h/k).
    pub fn encrypt_top_left(&self, k: usize, t: &Tensor) -> Result<EncryptTensor> {
        let mut et = EncryptTensor::new(t.w / k, t.h / k);
        for row in 0..t.h {
            for col in 0..t.w {
                if !t.is_top_left(k, t.idx(row, col)) {
                    continue;
                }
                let sub = t.sub_tensor_top_left(k, row, col)?;
                self.encrypt_window(&sub, &mut et, row, col)?;
            }
        }
        Ok(et)
    }

    fn encrypt_window(&self, sub: &Tensor, et: &mut EncryptTensor, row: usize, col: usize) -> Result<()> {
        et.r.push(self.encrypt_channel(&sub.r, 'R', row, col)?);
        et.g.push(self.encrypt_channel(&sub.g, 'G', row, col)?);
        et.b.push(self.encrypt_channel(&sub.b, 'B', row, col)?);
        et.a.push(self.encrypt_channel(&sub.a, 'A', row, col)?);
        Ok(())
    }

    fn encrypt_channel(
        &self,
        channel: &[u32],
        tag: char,
        row: usize,
        col: usize,
    ) -> Result<Vec<Integer>> {
        let x: Vec<Integer> = channel.iter().map(|&v| Integer::from(v)).collect();
        self.scheme
            .encrypt(&x, &self.keys.mpk)
            .map_err(|e| FeError::Window {
                channel: tag,
                row,
                col,
                source: Box::new(e),
            })
    }
}
