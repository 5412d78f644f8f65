use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use convfe::error::{FeError, Result};
use convfe::ipfe::scheme::Ddh;
use convfe::kernel::{self, KernelKind};
use convfe::parse::{file_io, image_io, suffixed_path};
use convfe::pipeline::decryptor::DecryptScheme;
use convfe::pipeline::encryptor::{EncryptScheme, PLAINTEXT_BOUND};
use convfe::util::arguments::{Cli, Command};
use convfe::util::group;

// grid offset selected by the single-key downsample kernel
const DOWNSIZE_PARTIAL_IDX: usize = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Enc {
            image_file,
            cipher_file,
            key_file,
            key_length,
            kernel_type,
            kernel_offset,
            verbose,
        } => run_enc(
            &image_file,
            &cipher_file,
            &key_file,
            key_length,
            &kernel_type,
            kernel_offset,
            verbose,
        ),
        Command::Dec {
            image_file,
            cipher_file,
            key_file,
            verbose,
        } => run_dec(&image_file, &cipher_file, &key_file, verbose),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_enc(
    image_file: &Path,
    cipher_file: &Path,
    key_file: &Path,
    key_length: u32,
    kernel_types: &str,
    kernel_offset: usize,
    verbose: u32,
) -> Result<()> {
    if !group::SUPPORTED_BIT_LENGTHS.contains(&key_length) {
        return Err(FeError::UnsupportedKeyLength(key_length));
    }
    if kernel_offset != 1 && kernel_offset != 2 {
        return Err(FeError::InvalidKernelOffset(kernel_offset));
    }

    let kinds = kernel_types
        .split(',')
        .map(str::trim)
        .map(KernelKind::parse)
        .collect::<Result<Vec<_>>>()?;
    // the first kernel in the list fixes the window geometry
    let lead = kinds[0];
    let kernel_size = lead.kernel_size(kernel_offset);

    let t = image_io::read_tensor(image_file)?;
    if verbose >= 2 {
        let dump = suffixed_path(image_file, "tensor");
        image_io::write_tensor(&dump, &t)?;
        println!("***Print the tensor of the original image: {}", dump.display());
    }

    let mut es = EncryptScheme::new_precomp(kernel_size * kernel_size, key_length)?;

    for kind in &kinds {
        match kind {
            KernelKind::DownsizeFull => {
                for (mask, divisor) in kernel::downsize_full(kernel_size) {
                    es.derive_function_key(&mask)?;
                    print_mask(*kind, &mask, divisor, verbose);
                }
                let ec = file_io::EncryptCredentials::last_n(
                    &es,
                    kernel_size,
                    kind.name(),
                    key_length,
                    kernel_size * kernel_size,
                );
                write_credential_file(&ec, key_file, kind.name(), verbose)?;
            }
            _ => {
                let (mask, divisor) = match kind {
                    KernelKind::Identity => kernel::identity(kernel_size)?,
                    KernelKind::GaussianBlur => kernel::gaussian_blur(kernel_size)?,
                    KernelKind::BoxBlur => kernel::box_blur(kernel_size)?,
                    KernelKind::DownsizePartial => {
                        kernel::downsize_partial(kernel_size, DOWNSIZE_PARTIAL_IDX)?
                    }
                    KernelKind::DownsizeFull => unreachable!(),
                };
                es.derive_function_key(&mask)?;
                print_mask(*kind, &mask, divisor, verbose);
                let ec =
                    file_io::EncryptCredentials::last(&es, kernel_size, kind.name(), key_length);
                write_credential_file(&ec, key_file, kind.name(), verbose)?;
            }
        }
    }

    if verbose >= 1 {
        println!("***Function keys:");
        println!("{:?}", file_io::keys_to_strings(es.func_keys()));
    }

    let pt = if lead.is_centered() {
        let pt = t.padding_center(kernel_offset, 0);
        if verbose >= 2 {
            let dump = suffixed_path(image_file, "padding");
            image_io::write_tensor(&dump, &pt)?;
            println!("***Print the tensor of the padding image: {}", dump.display());
        }
        pt
    } else {
        let pt = t.cropping_top_left(kernel_size);
        if verbose >= 2 {
            let dump = suffixed_path(image_file, "cropping");
            image_io::write_tensor(&dump, &pt)?;
            println!("***Print the tensor of the cropping image: {}", dump.display());
        }
        pt
    };

    if verbose >= 1 {
        println!("***Encryption started.");
    }
    let et = if lead.is_centered() {
        es.encrypt_center(kernel_offset, &pt)?
    } else {
        es.encrypt_top_left(kernel_size, &pt)?
    };
    if verbose >= 1 {
        println!("***Encryption finished.");
        println!("***Write cipher to file: {}", cipher_file.display());
    }
    file_io::write_cipher(cipher_file, &file_io::tensor_to_string(&et))?;
    Ok(())
}

fn run_dec(image_file: &Path, cipher_file: &Path, key_file: &Path, verbose: u32) -> Result<()> {
    if verbose >= 1 {
        println!("***Read credentials from file: {}", key_file.display());
    }
    let ec = file_io::read_credentials(key_file)?;
    let kind = KernelKind::parse(&ec.kernel_type)?;

    // re-derive the parameters the encryptor used for this key length
    let l = ec.kernel_size * ec.kernel_size;
    let params = Ddh::new_precomp(l, ec.key_length, PLAINTEXT_BOUND)?.params;
    let ymasks = file_io::masks_from_strings(&ec.y_mask)?;
    let func_keys = file_io::keys_from_strings(&ec.func_key)?;
    let ds = DecryptScheme::new_precomp(params, ymasks, func_keys, verbose)?;

    if verbose >= 1 {
        println!("***Read cipher from file: {}", cipher_file.display());
    }
    let et = file_io::tensor_from_string(&file_io::read_cipher(cipher_file)?)?;

    if verbose >= 1 {
        println!("***Decryption started.");
    }
    let t = match kind {
        KernelKind::DownsizeFull => ds.decrypt_full(&et, ec.num_kernels, ec.kernel_size, verbose)?,
        _ => ds.decrypt_single(&et, 0)?,
    };
    if verbose >= 1 {
        println!("***Decryption finished.");
        println!("***Write image to file: {}", image_file.display());
    }
    image_io::write_tensor(image_file, &t)?;
    Ok(())
}

fn print_mask(kind: KernelKind, mask: &[u32], divisor: u32, verbose: u32) {
    if verbose >= 2 {
        println!("***Mask and divisor of kernel: {}", kind.name());
        println!("{:?}", mask);
        println!("{}", divisor);
    }
}

fn write_credential_file(
    ec: &file_io::EncryptCredentials,
    key_file: &Path,
    kernel_name: &str,
    verbose: u32,
) -> Result<()> {
    let path = file_io::credential_path(key_file, kernel_name);
    if verbose >= 1 {
        println!("***Write credentials to file: {}", path.display());
    }
    file_io::write_credentials(&path, ec)
}
