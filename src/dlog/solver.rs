// solver.rs

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

use rug::integer::Order;
use rug::Integer;
use sha2::{Digest, Sha256};

use crate::error::{FeError, Result};
use crate::util::group;

/// Hard cap on the searched interval; larger requests are clamped.
pub fn max_bound() -> Integer {
    Integer::from(1u64 << 48)
}

const FINGERPRINT_BYTES: usize = 10;

type Fingerprint = [u8; FINGERPRINT_BYTES];

/// Short digest of the minimal big-endian byte form of a group element.
/// Collisions on honest inputs are vanishingly rare at this length, and
/// every table hit is re-verified before it is returned.
fn fingerprint(x: &Integer) -> Fingerprint {
    let digest = Sha256::digest(x.to_digits::<u8>(Order::Msf));
    let mut tag = [0u8; FINGERPRINT_BYTES];
    tag.copy_from_slice(&digest[..FINGERPRINT_BYTES]);
    tag
}

struct Precomp {
    table: HashMap<Fingerprint, Integer>,
    bits: u32,
}

/// Bounded baby-step giant-step calculator for h = g^x mod p.
///
/// Without a precomputation table the search proceeds iteratively, in
/// phases of doubling stride, so small answers are found quickly. With a
/// table bound to the instance, giant steps of a fixed stride walk the
/// interval. When negatives are admitted two workers race, one on h and
/// one on h^-1, and the first verified answer wins.
pub struct DlogSolver {
    p: Integer,
    bound: Integer,
    m: Integer,
    neg: bool,
    precomp: Option<Precomp>,
}

fn step_count(bound: &Integer) -> Integer {
    bound.clone().sqrt() + 1
}

impl DlogSolver {
    /// Calculator over Z_p^*. With `order` the interval defaults to
    /// [0, order]; without it p must be prime and the interval is [0, p-1].
    pub fn new(p: &Integer, order: Option<&Integer>) -> Result<DlogSolver> {
        let bound = match order {
            Some(ord) => ord.clone(),
            None => {
                if !group::is_prime(p) {
                    return Err(FeError::InvalidParams("dlog modulus must be prime".into()));
                }
                Integer::from(p - 1)
            }
        };
        Ok(DlogSolver {
            p: p.clone(),
            m: step_count(&bound),
            bound,
            neg: false,
            precomp: None,
        })
    }

    /// Narrow the searched interval. Ignored unless 0 < bound < 2^48.
    pub fn with_bound(mut self, bound: &Integer) -> DlogSolver {
        if *bound > 0 && *bound < max_bound() {
            self.bound = bound.clone();
            self.m = step_count(bound);
        }
        self
    }

    /// Also search among negative answers, in [-bound, bound].
    pub fn with_neg(mut self) -> DlogSolver {
        self.neg = true;
        self
    }

    /// Bind a table of fingerprint(g^i) -> i for i in [0, 2^max_bits) to
    /// this instance; subsequent solves take giant steps of stride
    /// 2^max_bits against it.
    pub fn precompute(&mut self, max_bits: u32, g: &Integer) -> Result<()> {
        if max_bits < 2 {
            return Err(FeError::PrecomputeTooSmall(max_bits));
        }
        let count = 1u64 << max_bits;
        let mut table = HashMap::with_capacity(count as usize);
        let mut x = Integer::from(1);
        for i in 0..count {
            table.insert(fingerprint(&x), Integer::from(i));
            x = x * g % &self.p;
        }
        self.precomp = Some(Precomp {
            table,
            bits: max_bits,
        });
        Ok(())
    }

    /// Find x with g^x = h mod p inside the configured interval.
    pub fn solve(&self, h: &Integer, g: &Integer) -> Result<Integer> {
        let h_inv = if self.neg {
            Some(h.clone().invert(&self.p).map_err(|_| FeError::NoInverse)?)
        } else {
            None
        };

        let stop = AtomicBool::new(false);
        let (tx, rx) = mpsc::channel::<Option<(Integer, bool)>>();

        let found = thread::scope(|s| {
            {
                let tx = tx.clone();
                let stop = &stop;
                s.spawn(move || {
                    let res = self.run(h, g, stop);
                    let _ = tx.send(res.map(|x| (x, false)));
                });
            }
            if let Some(inv) = h_inv {
                let tx = tx.clone();
                let stop = &stop;
                s.spawn(move || {
                    let res = self.run(&inv, g, stop);
                    let _ = tx.send(res.map(|x| (x, true)));
                });
            }
            drop(tx);

            // first verified answer wins; the loser polls the stop flag
            let mut winner = None;
            while let Ok(msg) = rx.recv() {
                if let Some(hit) = msg {
                    stop.store(true, Ordering::Relaxed);
                    winner = Some(hit);
                    break;
                }
            }
            winner
        });

        match found {
            Some((x, false)) => Ok(x),
            Some((x, true)) => Ok(-x),
            None => Err(FeError::BoundExhausted {
                bound: self.bound.clone(),
            }),
        }
    }

    fn run(&self, target: &Integer, g: &Integer, stop: &AtomicBool) -> Option<Integer> {
        match &self.precomp {
            Some(pre) => self.run_precomputed(target, g, pre, stop),
            None => self.run_iterative(target, g, stop),
        }
    }

    fn verified(&self, x: &Integer, g: &Integer, target: &Integer) -> bool {
        match g.clone().pow_mod(x, &self.p) {
            Ok(v) => v == *target,
            Err(_) => false,
        }
    }

    /// Giant steps of stride 2^bits against the bound table, until the
    /// interval is exhausted.
    fn run_precomputed(
        &self,
        target: &Integer,
        g: &Integer,
        pre: &Precomp,
        stop: &AtomicBool,
    ) -> Option<Integer> {
        let step = Integer::from(1u32) << pre.bits;
        let g_inv = g.clone().invert(&self.p).ok()?;
        let z = g_inv.pow_mod(&step, &self.p).ok()?;

        let mut y = target.clone();
        let mut j = Integer::new();
        while j <= self.bound {
            if stop.load(Ordering::Relaxed) {
                return None;
            }
            if let Some(e) = pre.table.get(&fingerprint(&y)) {
                let cand = Integer::from(&j + e);
                if self.verified(&cand, g, target) {
                    return Some(cand);
                }
            }
            y = y * &z % &self.p;
            j += &step;
        }
        None
    }

    /// Grow the baby-step table and the giant-step stride in phases of
    /// sizes 2^1, 2^2, ... up to m; after phase i the interval [0, 2^2i]
    /// has been covered, so small answers terminate early.
    fn run_iterative(&self, target: &Integer, g: &Integer, stop: &AtomicBool) -> Option<Integer> {
        let g_inv = g.clone().invert(&self.p).ok()?;

        let mut table: HashMap<Fingerprint, Integer> = HashMap::new();
        let mut x = Integer::from(1);
        let mut y = target.clone();
        let mut z = g_inv.clone().square() % &self.p;

        table.insert(fingerprint(&x), Integer::new());
        x = x * g % &self.p;

        let mut j = Integer::new();
        let phases = self.m.significant_bits();
        for i in 0..phases {
            if stop.load(Ordering::Relaxed) {
                return None;
            }
            let mut giant_step = Integer::from(1u32) << (i + 1);
            if giant_step > self.m {
                giant_step = self.m.clone();
                z = g_inv.clone().pow_mod(&self.m, &self.p).ok()?;
            }

            // extend the small steps needed for this phase
            let mut k = Integer::from(1u32) << i;
            while k < giant_step {
                table.insert(fingerprint(&x), k.clone());
                x = x * g % &self.p;
                k += 1;
            }

            // giant steps over the enlarged interval
            let phase_bound = giant_step.clone().square();
            while j < phase_bound {
                if stop.load(Ordering::Relaxed) {
                    return None;
                }
                if let Some(e) = table.get(&fingerprint(&y)) {
                    let cand = Integer::from(&j + e);
                    if self.verified(&cand, g, target) {
                        return Some(cand);
                    }
                }
                y = y * &z % &self.p;
                j += &giant_step;
            }
            z = z.square() % &self.p;
        }
        None
    }
}
