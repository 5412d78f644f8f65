use rug::Integer;

use crate::error::{FeError, Result};
use crate::util::sampler;

/// Random vector with entries uniform in [0, bound).
pub fn gen_random_vector(dim: usize, bound: &Integer) -> Vec<Integer> {
    (0..dim).map(|_| sampler::sample_below(bound)).collect()
}

pub fn vec_mod(vec: &mut [Integer], modulus: &Integer) {
    for v in vec.iter_mut() {
        *v = v.clone().div_rem_euc(modulus.clone()).1;
    }
}

/// Sum of a[i] * b[i] mod m.
pub fn vec_dot_mod(a: &[Integer], b: &[Integer], m: &Integer) -> Result<Integer> {
    if a.len() != b.len() {
        return Err(FeError::LengthMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }
    let mut acc = Integer::new();
    for (x, y) in a.iter().zip(b) {
        acc += Integer::from(x * y);
        acc = acc.div_rem_euc(m.clone()).1;
    }
    Ok(acc)
}

/// Product of base[i] ^ exp[i] mod p.
pub fn vec_inner_pow(bases: &[Integer], exps: &[Integer], p: &Integer) -> Result<Integer> {
    if bases.len() != exps.len() {
        return Err(FeError::LengthMismatch {
            expected: bases.len(),
            got: exps.len(),
        });
    }
    let mut out = Integer::from(1);
    for (b, e) in bases.iter().zip(exps) {
        let val = b.clone().pow_mod(e, p).map_err(|_| FeError::NoInverse)?;
        out = out * val % p;
    }
    Ok(out)
}
