// file_io.rs

use std::fs;
use std::path::{Path, PathBuf};

use rug::Integer;
use serde::{Deserialize, Serialize};

use crate::error::{FeError, Result};
use crate::parse::suffixed_path;
use crate::pipeline::encryptor::{EncryptScheme, EncryptTensor};

/// Persisted key material for one kernel group. All big integers are
/// decimal strings.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EncryptCredentials {
    #[serde(rename = "Num_kernels")]
    pub num_kernels: usize,
    #[serde(rename = "Kernel_size")]
    pub kernel_size: usize,
    #[serde(rename = "Kernel_type")]
    pub kernel_type: String,
    #[serde(rename = "Key_length")]
    pub key_length: u32,
    #[serde(rename = "Y_mask")]
    pub y_mask: Vec<Vec<String>>,
    #[serde(rename = "Func_key")]
    pub func_key: Vec<String>,
}

impl EncryptCredentials {
    /// Credentials for the most recently derived key.
    pub fn last(
        es: &EncryptScheme,
        kernel_size: usize,
        kernel_type: &str,
        key_length: u32,
    ) -> EncryptCredentials {
        EncryptCredentials::last_n(es, kernel_size, kernel_type, key_length, 1)
    }

    /// Credentials for the trailing n keys (one per downsample offset).
    pub fn last_n(
        es: &EncryptScheme,
        kernel_size: usize,
        kernel_type: &str,
        key_length: u32,
        n: usize,
    ) -> EncryptCredentials {
        let masks = es.masks();
        let keys = es.func_keys();
        let start = masks.len() - n;
        EncryptCredentials {
            num_kernels: n,
            kernel_size,
            kernel_type: kernel_type.to_string(),
            key_length,
            y_mask: masks[start..]
                .iter()
                .map(|m| m.iter().map(int_to_string).collect())
                .collect(),
            func_key: keys[start..].iter().map(int_to_string).collect(),
        }
    }
}

/// Persisted ciphertext tensor: per channel, a list of length-(l + 1)
/// ciphertext vectors in canonical window order.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EncryptTensorString {
    #[serde(rename = "W")]
    pub w: usize,
    #[serde(rename = "H")]
    pub h: usize,
    #[serde(rename = "R")]
    pub r: Vec<Vec<String>>,
    #[serde(rename = "G")]
    pub g: Vec<Vec<String>>,
    #[serde(rename = "B")]
    pub b: Vec<Vec<String>>,
    #[serde(rename = "A")]
    pub a: Vec<Vec<String>>,
}

fn int_to_string(v: &Integer) -> String {
    v.to_string_radix(10)
}

fn int_from_string(s: &str) -> Result<Integer> {
    Integer::from_str_radix(s, 10).map_err(|_| FeError::MalformedNumber(s.to_string()))
}

fn vecs_to_strings(vecs: &[Vec<Integer>]) -> Vec<Vec<String>> {
    vecs.iter()
        .map(|v| v.iter().map(int_to_string).collect())
        .collect()
}

fn vecs_from_strings(vecs: &[Vec<String>]) -> Result<Vec<Vec<Integer>>> {
    vecs.iter()
        .map(|v| v.iter().map(|s| int_from_string(s)).collect())
        .collect()
}

pub fn masks_from_strings(masks: &[Vec<String>]) -> Result<Vec<Vec<Integer>>> {
    vecs_from_strings(masks)
}

pub fn keys_to_strings(keys: &[Integer]) -> Vec<String> {
    keys.iter().map(int_to_string).collect()
}

pub fn keys_from_strings(keys: &[String]) -> Result<Vec<Integer>> {
    keys.iter().map(|s| int_from_string(s)).collect()
}

pub fn tensor_to_string(et: &EncryptTensor) -> EncryptTensorString {
    EncryptTensorString {
        w: et.w,
        h: et.h,
        r: vecs_to_strings(&et.r),
        g: vecs_to_strings(&et.g),
        b: vecs_to_strings(&et.b),
        a: vecs_to_strings(&et.a),
    }
}

pub fn tensor_from_string(ets: &EncryptTensorString) -> Result<EncryptTensor> {
    Ok(EncryptTensor {
        w: ets.w,
        h: ets.h,
        r: vecs_from_strings(&ets.r)?,
        g: vecs_from_strings(&ets.g)?,
        b: vecs_from_strings(&ets.b)?,
        a: vecs_from_strings(&ets.a)?,
    })
}

/// Credentials file for one kernel: `_<kernel_type>` before the extension.
pub fn credential_path(key_file: &Path, kernel_type: &str) -> PathBuf {
    suffixed_path(key_file, kernel_type)
}

pub fn write_credentials(path: &Path, ec: &EncryptCredentials) -> Result<()> {
    fs::write(path, serde_json::to_vec(ec)?)?;
    Ok(())
}

pub fn read_credentials(path: &Path) -> Result<EncryptCredentials> {
    Ok(serde_json::from_slice(&fs::read(path)?)?)
}

pub fn write_cipher(path: &Path, ets: &EncryptTensorString) -> Result<()> {
    fs::write(path, serde_json::to_vec(ets)?)?;
    Ok(())
}

pub fn read_cipher(path: &Path) -> Result<EncryptTensorString> {
    Ok(serde_json::from_slice(&fs::read(path)?)?)
}
