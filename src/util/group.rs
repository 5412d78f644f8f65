// group.rs

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, OnceLock};

use rug::integer::IsPrime;
use rug::rand::RandState;
use rug::Integer;

use crate::error::{FeError, Result};
use crate::util::sampler;

/// Prime bit lengths the scheme accepts.
pub const SUPPORTED_BIT_LENGTHS: [u32; 9] = [128, 256, 512, 1024, 1536, 2048, 2560, 3072, 4096];

const MILLER_RABIN_ROUNDS: u32 = 20;

// Seed of the deterministic parameter derivation; the bit length is mixed
// in so every key length gets its own candidate stream.
const PRECOMP_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

pub fn is_prime(n: &Integer) -> bool {
    n.is_probably_prime(MILLER_RABIN_ROUNDS) != IsPrime::No
}

/// Candidate source for the safe-prime and generator search: either the OS
/// entropy pool, or a seeded state for reproducible parameters.
enum Source<'a> {
    Os,
    Seeded(RandState<'a>),
}

impl Source<'_> {
    fn bits(&mut self, bits: u32) -> Integer {
        match self {
            Source::Os => sampler::sample_bits(bits),
            Source::Seeded(rng) => Integer::from(Integer::random_bits(bits, rng)),
        }
    }

    fn below(&mut self, bound: &Integer) -> Integer {
        match self {
            Source::Os => sampler::sample_below(bound),
            Source::Seeded(rng) => bound.clone().random_below(rng),
        }
    }
}

/// A prime-order subgroup of Z_p^*: p = 2q + 1 with p, q prime and g a
/// generator of the order-q subgroup. Immutable once generated.
#[derive(Clone, Debug)]
pub struct Group {
    pub p: Integer,
    pub q: Integer,
    pub g: Integer,
}

impl Group {
    /// Fresh parameters from OS entropy.
    pub fn random(bits: u32) -> Result<Group> {
        Group::build(bits, &mut Source::Os)
    }

    /// Deterministic parameters for a bit length, identical in every run,
    /// so that separate encrypt and decrypt invocations agree without the
    /// parameters ever being persisted. Validated, then cached per process.
    pub fn precomputed(bits: u32) -> Result<Group> {
        static CACHE: OnceLock<Mutex<HashMap<u32, Group>>> = OnceLock::new();
        let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
        if let Some(grp) = cache.lock().unwrap().get(&bits) {
            return Ok(grp.clone());
        }
        let mut rng = RandState::new();
        rng.seed(&(Integer::from(PRECOMP_SEED) + bits));
        let grp = Group::build(bits, &mut Source::Seeded(rng))?;
        grp.validate()?;
        cache.lock().unwrap().insert(bits, grp.clone());
        Ok(grp)
    }

    fn build(bits: u32, src: &mut Source) -> Result<Group> {
        if !SUPPORTED_BIT_LENGTHS.contains(&bits) {
            return Err(FeError::UnsupportedKeyLength(bits));
        }
        let (p, q) = generate_safe_prime(bits, src)?;
        let g = find_generator(&p, src);
        Ok(Group { p, q, g })
    }

    /// p = 2q + 1 with both prime, g != 1 and g^q = 1 mod p.
    pub fn validate(&self) -> Result<()> {
        if !is_prime(&self.p) {
            return Err(FeError::InvalidParams("p is not prime".into()));
        }
        if self.q != Integer::from(&self.p - 1) / 2 || !is_prime(&self.q) {
            return Err(FeError::InvalidParams("q is not a prime (p - 1) / 2".into()));
        }
        if self.g <= 1 || self.g >= self.p {
            return Err(FeError::InvalidParams("g is outside the group".into()));
        }
        let pow = self
            .g
            .clone()
            .pow_mod(&self.q, &self.p)
            .map_err(|_| FeError::NoInverse)?;
        if pow != 1 {
            return Err(FeError::InvalidParams("g does not have order q".into()));
        }
        Ok(())
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Group:")?;
        writeln!(f, "    p: {}", self.p)?;
        writeln!(f, "    q: {}", self.q)?;
        writeln!(f, "    g: {}", self.g)?;
        Ok(())
    }
}

/// Search for a safe prime p = 2q + 1 of exactly `bits` bits: sample odd
/// q-candidates of bits - 1 bits until both q and 2q + 1 pass Miller-Rabin.
fn generate_safe_prime(bits: u32, src: &mut Source) -> Result<(Integer, Integer)> {
    let budget = 100u64 * bits as u64 * bits as u64;
    for _ in 0..budget {
        let mut q = src.bits(bits - 1);
        q.set_bit(bits - 2, true);
        q.set_bit(0, true);
        if !is_prime(&q) {
            continue;
        }
        let p = Integer::from(&q * 2) + 1;
        if is_prime(&p) {
            return Ok((p, q));
        }
    }
    Err(FeError::SafePrimeGeneration { bits })
}

/// Any quadratic residue other than 1 generates the order-q subgroup, since
/// (p - 1) / q = 2. Square a random h in [2, p - 1) and reject g = 1.
fn find_generator(p: &Integer, src: &mut Source) -> Integer {
    let width = Integer::from(p - 3);
    loop {
        let h = src.below(&width) + 2u32;
        let g = h.square() % p;
        if g != 1 {
            return g;
        }
    }
}
