// sampler.rs

use rand::rngs::OsRng;
use rand::RngCore;
use rug::{integer::Order, Integer};

/// Uniform integer in [0, 2^bits), read from the OS entropy source.
pub fn sample_bits(bits: u32) -> Integer {
    if bits == 0 {
        return Integer::new();
    }
    let nbytes = ((bits + 7) / 8) as usize;
    let mut buf = vec![0u8; nbytes];
    OsRng.fill_bytes(&mut buf);
    let mut n = Integer::from_digits(&buf, Order::Msf);
    n >>= nbytes as u32 * 8 - bits;
    n
}

/// Uniform integer in [0, bound) by rejection sampling.
pub fn sample_below(bound: &Integer) -> Integer {
    assert!(*bound > 0, "sampling bound must be positive");
    let bits = bound.significant_bits();
    loop {
        let n = sample_bits(bits);
        if n < *bound {
            return n;
        }
    }
}

/// Uniform integer in [low, high).
pub fn sample_range(low: &Integer, high: &Integer) -> Integer {
    assert!(low < high, "empty sampling range");
    let width = Integer::from(high - low);
    sample_below(&width) + low
}
