// decryptor.rs

use rug::Integer;

use crate::error::{FeError, Result};
use crate::ipfe::keys::DdhParams;
use crate::ipfe::scheme::Ddh;
use crate::pipeline::encryptor::EncryptTensor;
use crate::tensor::tensor::{merge_multiple_tensors, Tensor};

/// Size of the giant-step table bound to the decryptor: 2^10 entries.
const PRECOMPUTED_BITS: u32 = 10;

/// Key-holder side of the pipeline: scheme parameters plus the persisted
/// (mask, function key) pairs. Decrypting a tensor walks every ciphertext
/// and writes the recovered inner products in row-major order.
pub struct DecryptScheme {
    scheme: Ddh,
    ymasks: Vec<Vec<Integer>>,
    func_keys: Vec<Integer>,
}

impl DecryptScheme {
    /// Decryptor with the dlog table precomputed up front; worthwhile
    /// because every window of every channel runs a search.
    pub fn new_precomp(
        params: DdhParams,
        ymasks: Vec<Vec<Integer>>,
        func_keys: Vec<Integer>,
        verbose: u32,
    ) -> Result<DecryptScheme> {
        let mut scheme = Ddh::from_params(params);
        if verbose >= 1 {
            println!("***Precomputation started.");
            println!("***Precomputed bits: {}", PRECOMPUTED_BITS);
        }
        scheme.precompute_dlog(PRECOMPUTED_BITS)?;
        if verbose >= 1 {
            println!("***Precomputation finished.");
        }
        Ok(DecryptScheme {
            scheme,
            ymasks,
            func_keys,
        })
    }

    /// Decrypt every window with one (mask, key) pair.
    pub fn decrypt_single(&self, et: &EncryptTensor, key_idx: usize) -> Result<Tensor> {
        if key_idx >= self.func_keys.len() {
            return Err(FeError::IndexOutOfRange {
                idx: key_idx,
                max: self.func_keys.len().saturating_sub(1),
            });
        }
        let mut out = Tensor::zeros(et.w, et.h);
        for row in 0..et.h {
            for col in 0..et.w {
                let idx = out.idx(row, col);
                out.r[idx] = self.decrypt_cell(&et.r[idx], key_idx, 'R', row, col)?;
                out.g[idx] = self.decrypt_cell(&et.g[idx], key_idx, 'G', row, col)?;
                out.b[idx] = self.decrypt_cell(&et.b[idx], key_idx, 'B', row, col)?;
                out.a[idx] = self.decrypt_cell(&et.a[idx], key_idx, 'A', row, col)?;
            }
        }
        Ok(out)
    }

    /// Decrypt once per grid-offset key and interleave the tiles back into
    /// the full-size image.
    pub fn decrypt_full(
        &self,
        et: &EncryptTensor,
        num_kernels: usize,
        kernel_size: usize,
        verbose: u32,
    ) -> Result<Tensor> {
        let mut tiles = Vec::with_capacity(num_kernels);
        for key_idx in 0..num_kernels {
            if verbose >= 1 {
                println!("***Decrypt with kernel {}", key_idx);
            }
            tiles.push(self.decrypt_single(et, key_idx)?);
        }
        merge_multiple_tensors(&tiles, kernel_size)
    }

    fn decrypt_cell(
        &self,
        cipher: &[Integer],
        key_idx: usize,
        tag: char,
        row: usize,
        col: usize,
    ) -> Result<u32> {
        let xy = self
            .scheme
            .decrypt(cipher, &self.func_keys[key_idx], &self.ymasks[key_idx])
            .map_err(|e| FeError::Window {
                channel: tag,
                row,
                col,
                source: Box::new(e),
            })?;
        Ok(xy.to_u32_wrapping())
    }
}
