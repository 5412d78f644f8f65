// scheme.rs

use std::cmp::Ordering;

use rug::Integer;

use crate::dlog::solver::DlogSolver;
use crate::error::{FeError, Result};
use crate::ipfe::keys::{DdhParams, MasterKeys};
use crate::util::group::Group;
use crate::util::sampler;
use crate::util::vector::{vec_dot_mod, vec_inner_pow};

/// DDH-based inner-product functional encryption over the order-q subgroup
/// of Z_p^*. One instance serves both ends: key generation, encryption and
/// function-key derivation on the owner side, decryption on the holder
/// side.
pub struct Ddh {
    pub params: DdhParams,
    solver: Option<DlogSolver>,
}

impl Ddh {
    /// Fresh parameters: a new safe-prime group of `bits` bits.
    pub fn new(l: usize, bits: u32, bound: u32) -> Result<Ddh> {
        Ddh::from_group(l, Group::random(bits)?, bound)
    }

    /// Deterministic precomputed parameters for `bits`, so that separate
    /// runs (encrypt, then decrypt) operate in the same group.
    pub fn new_precomp(l: usize, bits: u32, bound: u32) -> Result<Ddh> {
        Ddh::from_group(l, Group::precomputed(bits)?, bound)
    }

    pub fn from_params(params: DdhParams) -> Ddh {
        Ddh {
            params,
            solver: None,
        }
    }

    fn from_group(l: usize, grp: Group, bound: u32) -> Result<Ddh> {
        let bound = Integer::from(bound);
        // inner products must stay inside the dlog search space
        if Integer::from(l) * bound.clone().square() >= grp.q {
            return Err(FeError::InvalidParams(
                "l * bound^2 must be smaller than the subgroup order".into(),
            ));
        }
        Ok(Ddh {
            params: DdhParams {
                l,
                bound,
                g: grp.g,
                p: grp.p,
                q: grp.q,
            },
            solver: None,
        })
    }

    pub fn generate_master_keys(&self) -> Result<MasterKeys> {
        let mut msk = Vec::with_capacity(self.params.l);
        let mut mpk = Vec::with_capacity(self.params.l);
        for _ in 0..self.params.l {
            let s = sampler::sample_below(&self.params.q);
            mpk.push(self.pow_p(&self.params.g, &s)?);
            msk.push(s);
        }
        Ok(MasterKeys { msk, mpk })
    }

    /// Function key for the mask y: <msk, y> mod q.
    pub fn derive_key(&self, msk: &[Integer], y: &[Integer]) -> Result<Integer> {
        self.check_vector(y)?;
        if msk.len() != self.params.l {
            return Err(FeError::LengthMismatch {
                expected: self.params.l,
                got: msk.len(),
            });
        }
        vec_dot_mod(msk, y, &self.params.q)
    }

    /// Encrypt x under mpk: C[0] = g^r, C[i+1] = mpk[i]^r * g^x[i] mod p.
    pub fn encrypt(&self, x: &[Integer], mpk: &[Integer]) -> Result<Vec<Integer>> {
        self.check_vector(x)?;
        if mpk.len() != self.params.l {
            return Err(FeError::LengthMismatch {
                expected: self.params.l,
                got: mpk.len(),
            });
        }
        let r = sampler::sample_below(&self.params.q);
        let mut cipher = Vec::with_capacity(self.params.l + 1);
        cipher.push(self.pow_p(&self.params.g, &r)?);
        for (xi, pki) in x.iter().zip(mpk) {
            let masked = self.pow_p(pki, &r)? * self.pow_p(&self.params.g, xi)?;
            cipher.push(masked % &self.params.p);
        }
        Ok(cipher)
    }

    /// Bind a giant-step table of 2^max_bits entries to this instance;
    /// worthwhile when many ciphertexts will be decrypted.
    pub fn precompute_dlog(&mut self, max_bits: u32) -> Result<()> {
        let mut solver = DlogSolver::new(&self.params.p, Some(&self.params.q))?
            .with_bound(&self.dec_bound());
        solver.precompute(max_bits, &self.params.g)?;
        self.solver = Some(solver);
        Ok(())
    }

    /// Recover <x, y> from a ciphertext of x and the function key of y.
    ///
    /// prod C[i+1]^y[i] = g^(r<msk,y> + <x,y>) and C[0]^fk = g^(r<msk,y>),
    /// so the quotient is g^<x,y> with the exponent bounded by l * bound^2.
    pub fn decrypt(&self, cipher: &[Integer], func_key: &Integer, y: &[Integer]) -> Result<Integer> {
        self.check_vector(y)?;
        if cipher.len() != self.params.l + 1 {
            return Err(FeError::LengthMismatch {
                expected: self.params.l + 1,
                got: cipher.len(),
            });
        }
        let num = vec_inner_pow(&cipher[1..], y, &self.params.p)?;
        let den = self.pow_p(&cipher[0], func_key)?;
        let den_inv = den.invert(&self.params.p).map_err(|_| FeError::NoInverse)?;
        let target = num * den_inv % &self.params.p;

        match &self.solver {
            Some(solver) => solver.solve(&target, &self.params.g),
            None => DlogSolver::new(&self.params.p, Some(&self.params.q))?
                .with_bound(&self.dec_bound())
                .solve(&target, &self.params.g),
        }
    }

    fn dec_bound(&self) -> Integer {
        Integer::from(self.params.l) * self.params.bound.clone().square()
    }

    fn pow_p(&self, base: &Integer, e: &Integer) -> Result<Integer> {
        base.clone()
            .pow_mod(e, &self.params.p)
            .map_err(|_| FeError::NoInverse)
    }

    fn check_vector(&self, v: &[Integer]) -> Result<()> {
        if v.len() != self.params.l {
            return Err(FeError::LengthMismatch {
                expected: self.params.l,
                got: v.len(),
            });
        }
        for (idx, entry) in v.iter().enumerate() {
            if entry.cmp_abs(&self.params.bound) != Ordering::Less {
                return Err(FeError::EntryOutOfBound { idx });
            }
        }
        Ok(())
    }
}
