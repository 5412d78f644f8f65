pub mod file_io;
pub mod image_io;

use std::path::{Path, PathBuf};

/// foo.png + "padding" -> foo_padding.png; used for credential files and
/// the verbose intermediate-image dumps.
pub fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}_{}", stem, suffix),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use rug::Integer;
    use std::path::Path;

    use super::file_io::{self, EncryptCredentials, EncryptTensorString};
    use super::image_io;
    use super::suffixed_path;
    use crate::error::FeError;
    use crate::pipeline::encryptor::EncryptTensor;
    use crate::tensor::tensor::Tensor;

    #[test]
    fn test_suffixed_path() {
        assert_eq!(
            suffixed_path(Path::new("workspace/cart.png"), "padding"),
            Path::new("workspace/cart_padding.png")
        );
        assert_eq!(
            suffixed_path(Path::new("func_key.json"), "identity"),
            Path::new("func_key_identity.json")
        );
        assert_eq!(
            suffixed_path(Path::new("func_key"), "box_blur"),
            Path::new("func_key_box_blur")
        );
    }

    #[test]
    fn test_credentials_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_io::credential_path(&dir.path().join("func_key.json"), "identity");

        let ec = EncryptCredentials {
            num_kernels: 1,
            kernel_size: 3,
            kernel_type: "identity".to_string(),
            key_length: 256,
            y_mask: vec![vec!["0".to_string(), "1".to_string(), "0".to_string()]],
            func_key: vec!["123456789012345678901234567890".to_string()],
        };
        file_io::write_credentials(&path, &ec).unwrap();

        // persisted field names are part of the format
        let raw = std::fs::read_to_string(&path).unwrap();
        for field in ["Num_kernels", "Kernel_size", "Kernel_type", "Key_length", "Y_mask", "Func_key"] {
            assert!(raw.contains(field), "missing field {field}");
        }

        let back = file_io::read_credentials(&path).unwrap();
        assert_eq!(back.num_kernels, 1);
        assert_eq!(back.kernel_type, "identity");
        assert_eq!(back.y_mask, ec.y_mask);
        assert_eq!(back.func_key, ec.func_key);

        let keys = file_io::keys_from_strings(&back.func_key).unwrap();
        assert_eq!(
            keys[0],
            Integer::from_str_radix("123456789012345678901234567890", 10).unwrap()
        );
    }

    #[test]
    fn test_cipher_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cipher.json");

        let cell = |v: u32| vec![Integer::from(v), Integer::from(v + 1)];
        let et = EncryptTensor {
            w: 2,
            h: 1,
            r: vec![cell(1), cell(10)],
            g: vec![cell(2), cell(20)],
            b: vec![cell(3), cell(30)],
            a: vec![cell(4), cell(40)],
        };

        file_io::write_cipher(&path, &file_io::tensor_to_string(&et)).unwrap();
        let ets = file_io::read_cipher(&path).unwrap();
        assert_eq!((ets.w, ets.h), (2, 1));
        assert_eq!(file_io::tensor_from_string(&ets).unwrap(), et);
    }

    #[test]
    fn test_malformed_number_is_rejected() {
        let ets = EncryptTensorString {
            w: 1,
            h: 1,
            r: vec![vec!["12x".to_string()]],
            g: vec![],
            b: vec![],
            a: vec![],
        };
        assert!(matches!(
            file_io::tensor_from_string(&ets),
            Err(FeError::MalformedNumber(_))
        ));
    }

    #[test]
    fn test_png_roundtrip_truncates_to_u8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let mut t = Tensor::zeros(2, 3);
        for idx in 0..6 {
            t.r[idx] = idx as u32;
            t.g[idx] = 900; // truncates to 132
            t.b[idx] = 7;
            t.a[idx] = 255;
        }
        image_io::write_tensor(&path, &t).unwrap();

        let back = image_io::read_tensor(&path).unwrap();
        assert_eq!((back.w, back.h), (2, 3));
        assert_eq!(back.r, t.r);
        assert_eq!(back.g, vec![132; 6]);
        assert_eq!(back.a, vec![255; 6]);
    }
}
