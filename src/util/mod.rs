pub mod arguments;
pub mod group;
pub mod sampler;
pub mod vector;

#[cfg(test)]
mod tests {
    use rug::Integer;

    use super::group::Group;
    use super::sampler;
    use super::vector::{vec_dot_mod, vec_inner_pow, vec_mod};
    use crate::error::FeError;

    #[test]
    fn test_sample_below_stays_under_bound() {
        let bound = Integer::from(1000);
        for _ in 0..200 {
            let n = sampler::sample_below(&bound);
            assert!(n >= 0 && n < bound);
        }
    }

    #[test]
    fn test_sample_range_bounds() {
        let low = Integer::from(50);
        let high = Integer::from(60);
        for _ in 0..100 {
            let n = sampler::sample_range(&low, &high);
            assert!(n >= low && n < high);
        }
    }

    #[test]
    fn test_sample_bits_width() {
        for _ in 0..50 {
            let n = sampler::sample_bits(33);
            assert!(n.significant_bits() <= 33);
        }
        assert_eq!(sampler::sample_bits(0), 0);
    }

    #[test]
    fn test_vec_dot_mod() {
        let a = vec![Integer::from(2), Integer::from(3)];
        let b = vec![Integer::from(5), Integer::from(7)];
        let m = Integer::from(10);
        // 2*5 + 3*7 = 31
        assert_eq!(vec_dot_mod(&a, &b, &m).unwrap(), 1);
    }

    #[test]
    fn test_vec_dot_mod_length_mismatch() {
        let a = vec![Integer::from(1)];
        let b = vec![Integer::from(1), Integer::from(2)];
        let res = vec_dot_mod(&a, &b, &Integer::from(5));
        assert!(matches!(res, Err(FeError::LengthMismatch { .. })));
    }

    #[test]
    fn test_vec_inner_pow() {
        let p = Integer::from(101);
        let bases = vec![Integer::from(2), Integer::from(3)];
        let exps = vec![Integer::from(5), Integer::from(2)];
        // 2^5 * 3^2 = 288 = 2 * 101 + 86
        assert_eq!(vec_inner_pow(&bases, &exps, &p).unwrap(), 86);
    }

    #[test]
    fn test_vec_mod() {
        let mut v = vec![Integer::from(-3), Integer::from(12)];
        vec_mod(&mut v, &Integer::from(5));
        assert_eq!(v, vec![Integer::from(2), Integer::from(2)]);
    }

    #[test]
    fn test_random_group_is_valid() {
        let grp = Group::random(128).unwrap();
        grp.validate().unwrap();
        assert_eq!(grp.p.significant_bits(), 128);
        assert_eq!(Integer::from(&grp.q * 2) + 1, grp.p);
    }

    #[test]
    fn test_precomputed_group_is_deterministic() {
        let a = Group::precomputed(128).unwrap();
        let b = Group::precomputed(128).unwrap();
        assert_eq!(a.p, b.p);
        assert_eq!(a.q, b.q);
        assert_eq!(a.g, b.g);
        a.validate().unwrap();
    }

    #[test]
    fn test_unsupported_bit_length() {
        let res = Group::random(100);
        assert!(matches!(res, Err(FeError::UnsupportedKeyLength(100))));
    }

    #[test]
    fn test_validate_rejects_bad_generator() {
        let mut grp = Group::precomputed(128).unwrap();
        grp.g = Integer::from(1);
        assert!(grp.validate().is_err());
    }
}
