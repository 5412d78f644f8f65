// keys.rs

use std::fmt;

use rug::Integer;

/// Public parameters of the DDH inner-product scheme. Immutable once
/// generated; pass by reference, clone only at persistence boundaries.
#[derive(Clone, Debug)]
pub struct DdhParams {
    /// vector length (window area)
    pub l: usize,
    /// per-coordinate magnitude bound on plaintexts and mask entries
    pub bound: Integer,
    /// generator of the order-q subgroup of Z_p^*
    pub g: Integer,
    /// safe prime, p = 2q + 1
    pub p: Integer,
    /// prime order of the working subgroup
    pub q: Integer,
}

impl fmt::Display for DdhParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DdhParams:")?;
        writeln!(f, "    l: {}", self.l)?;
        writeln!(f, "    bound: {}", self.bound)?;
        writeln!(f, "    p: {}", self.p)?;
        writeln!(f, "    q: {}", self.q)?;
        writeln!(f, "    g: {}", self.g)?;
        Ok(())
    }
}

/// Master key pair: msk[i] uniform in [0, q), mpk[i] = g^msk[i] mod p.
#[derive(Clone, Debug)]
pub struct MasterKeys {
    pub msk: Vec<Integer>,
    pub mpk: Vec<Integer>,
}
