use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "convfe", version, about = "Functional encryption of images for linear convolution kernels", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encrypt an image and derive function keys for the given kernels
    Enc {
        /// path to the input image
        #[arg(long = "image_file")]
        image_file: PathBuf,

        /// path to the output cipher
        #[arg(long = "cipher_file")]
        cipher_file: PathBuf,

        /// path to the output functional key file
        #[arg(long = "key_file")]
        key_file: PathBuf,

        /// length of the prime modulus in bits
        /// (128/256/512/1024/1536/2048/2560/3072/4096)
        #[arg(long = "key_length", default_value_t = 256)]
        key_length: u32,

        /// comma separated kernels,
        /// [identity/gaussian_blur/box_blur], [downsize_full/downsize_partial]
        #[arg(long = "kernel_type", default_value = "identity,gaussian_blur,box_blur")]
        kernel_type: String,

        /// offset of the kernel (1/2)
        #[arg(long = "kernel_offset", default_value_t = 1)]
        kernel_offset: usize,

        /// verbosity (0/1/2)
        #[arg(long, default_value_t = 1)]
        verbose: u32,
    },

    /// Decrypt a cipher with a functional key
    Dec {
        /// path to the output image
        #[arg(long = "image_file")]
        image_file: PathBuf,

        /// path to the input cipher
        #[arg(long = "cipher_file")]
        cipher_file: PathBuf,

        /// path to the input functional key file
        #[arg(long = "key_file")]
        key_file: PathBuf,

        /// verbosity (0/1/2)
        #[arg(long, default_value_t = 1)]
        verbose: u32,
    },
}
