// Primality Testing
// Trial division by small primes followed by Miller-Rabin

use log::{debug, trace, warn};
use num_bigint::RandBigInt;
use num_traits::{One, ToPrimitive, Zero};
use rand::{CryptoRng, RngCore};

use super::bigint::RsaBigInt;

/// Fewest Miller-Rabin rounds accepted for random witnesses
pub const MIN_ROUNDS: u32 = 5;

/// Every prime below 1000
pub const SMALL_PRIMES: [u32; 168] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43,
    47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97, 101, 103, 107,
    109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181,
    191, 193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263,
    269, 271, 277, 281, 283, 293, 307, 311, 313, 317, 331, 337, 347, 349,
    353, 359, 367, 373, 379, 383, 389, 397, 401, 409, 419, 421, 431, 433,
    439, 443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503, 509, 521,
    523, 541, 547, 557, 563, 569, 571, 577, 587, 593, 599, 601, 607, 613,
    617, 619, 631, 641, 643, 647, 653, 659, 661, 673, 677, 683, 691, 701,
    709, 719, 727, 733, 739, 743, 751, 757, 761, 769, 773, 787, 797, 809,
    811, 821, 823, 827, 829, 839, 853, 857, 859, 863, 877, 881, 883, 887,
    907, 911, 919, 929, 937, 941, 947, 953, 967, 971, 977, 983, 991, 997,
];

// (bound, k): testing with the first k primes as bases is exact for n < bound
const DETERMINISTIC_BOUNDS: [(u128, usize); 10] = [
    (2_047, 1),
    (1_373_653, 2),
    (25_326_001, 3),
    (3_215_031_751, 4),
    (2_152_302_898_747, 5),
    (3_474_749_660_383, 6),
    (341_550_071_728_321, 7),
    (3_825_123_056_546_413_051, 9),
    (318_665_857_834_031_151_167_461, 12),
    (3_317_044_064_679_887_385_961_981, 13),
];

/// Probabilistic primality tester.
///
/// A `false` answer is always correct. A `true` answer for numbers above the
/// deterministic bounds is wrong with probability at most `4^-rounds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimalityTester {
    rounds: u32,
}

impl Default for PrimalityTester {
    fn default() -> Self {
        Self { rounds: MIN_ROUNDS }
    }
}

impl PrimalityTester {
    /// Tester running `rounds` random witnesses, never fewer than [`MIN_ROUNDS`]
    pub fn new(rounds: u32) -> Self {
        if rounds < MIN_ROUNDS {
            warn!(
                "Miller-Rabin rounds {} below minimum, using {}",
                rounds, MIN_ROUNDS
            );
        }
        Self {
            rounds: rounds.max(MIN_ROUNDS),
        }
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Returns true if `n` is (probably) prime
    pub fn is_prime<R>(&self, n: &RsaBigInt, rng: &mut R) -> bool
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        if n < &RsaBigInt::from(2u8) {
            return false;
        }

        // Small primes are answered by the table
        if let Some(small) = n.to_u32() {
            if SMALL_PRIMES.binary_search(&small).is_ok() {
                return true;
            }
        }

        if SMALL_PRIMES.iter().any(|&p| (n % p).is_zero()) {
            return false;
        }

        self.miller_rabin(n, rng)
    }

    fn miller_rabin<R>(&self, n: &RsaBigInt, rng: &mut R) -> bool
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        // Write n - 1 as s * 2^t with s odd
        let n_minus_one = n - 1u8;
        let t = match n_minus_one.trailing_zeros() {
            Some(t) => t,
            None => return false,
        };
        let s = &n_minus_one >> t;

        if let Some(count) = deterministic_base_count(n) {
            return SMALL_PRIMES[..count].iter().all(|&base| {
                witness_passes(&RsaBigInt::from(base), &s, t, n, &n_minus_one)
            });
        }

        let two = RsaBigInt::from(2u8);
        // Every round runs; only a failing witness ends the loop early
        for round in 0..self.rounds {
            let a = rng.gen_biguint_range(&two, &n_minus_one);
            if !witness_passes(&a, &s, t, n, &n_minus_one) {
                trace!("witness failed in round {} of {}", round + 1, self.rounds);
                return false;
            }
        }

        true
    }

    /// Draw random odd integers of exactly `bits` bits until one is prime.
    ///
    /// Roughly `bits * ln(2)` candidates are expected before a hit; there is
    /// no upper bound on the number of draws.
    pub fn random_prime<R>(&self, bits: u32, rng: &mut R) -> RsaBigInt
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        let bits = bits.max(2);
        // Top bit fixes the length, low bit makes it odd
        let mask = (RsaBigInt::one() << (bits - 1)) | RsaBigInt::one();
        let mut trials = 0u64;

        loop {
            trials += 1;
            let mut candidate = rng.gen_biguint(u64::from(bits));
            candidate |= &mask;

            if self.is_prime(&candidate, rng) {
                debug!("found {}-bit prime after {} candidates", bits, trials);
                return candidate;
            }
        }
    }
}

/// Number of leading small primes that form an exact witness set for `n`
fn deterministic_base_count(n: &RsaBigInt) -> Option<usize> {
    let small = n.to_u128()?;
    DETERMINISTIC_BOUNDS
        .iter()
        .find(|(bound, _)| small < *bound)
        .map(|&(_, count)| count)
}

/// One Miller-Rabin round: false means `a` proves `n` composite
fn witness_passes(
    a: &RsaBigInt,
    s: &RsaBigInt,
    t: u64,
    n: &RsaBigInt,
    n_minus_one: &RsaBigInt,
) -> bool {
    let mut v = a.modpow(s, n);
    if v.is_one() || &v == n_minus_one {
        return true;
    }

    for _ in 1..t {
        v = (&v * &v) % n;
        if &v == n_minus_one {
            return true;
        }
        if v.is_one() {
            // Nontrivial square root of 1
            return false;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    fn mersenne(exp: u32) -> RsaBigInt {
        (RsaBigInt::one() << exp) - 1u8
    }

    #[test]
    fn test_small_numbers() {
        let tester = PrimalityTester::default();
        let mut rng = rng();
        let primes: Vec<u64> = SMALL_PRIMES.iter().map(|&p| p as u64).filter(|&p| p < 100).collect();

        for n in 0u64..100 {
            let expected = primes.contains(&n);
            assert_eq!(tester.is_prime(&from_u64(n), &mut rng), expected, "n = {}", n);
        }
    }

    #[test]
    fn test_beyond_table() {
        let tester = PrimalityTester::default();
        let mut rng = rng();

        for p in [1009u64, 7919, 104_729, 2_147_483_647] {
            assert!(tester.is_prime(&from_u64(p), &mut rng), "{} is prime", p);
        }
        // 1009 * 1013 survives trial division
        assert!(!tester.is_prime(&from_u64(1009 * 1013), &mut rng));
        // Strong pseudoprime to bases 2, 3, 5, 7 and 11
        assert!(!tester.is_prime(&from_u64(2_152_302_898_747), &mut rng));
    }

    #[test]
    fn test_carmichael_numbers() {
        let tester = PrimalityTester::default();
        let mut rng = rng();

        for n in [561u64, 41_041, 825_265, 321_197_185, 5_394_826_801] {
            assert!(!tester.is_prime(&from_u64(n), &mut rng), "{} is composite", n);
        }
    }

    #[test]
    fn test_large_mersenne_primes() {
        let tester = PrimalityTester::new(16);
        let mut rng = rng();

        for _ in 0..5 {
            assert!(tester.is_prime(&mersenne(127), &mut rng));
            assert!(tester.is_prime(&mersenne(521), &mut rng));
        }
    }

    #[test]
    fn test_large_composites() {
        let tester = PrimalityTester::default();
        let mut rng = rng();

        let semiprime = mersenne(61) * mersenne(89);
        assert!(!tester.is_prime(&semiprime, &mut rng));
        // 2^67 - 1 = 193707721 * 761838257287
        assert!(!tester.is_prime(&mersenne(67), &mut rng));
        assert!(!tester.is_prime(&mersenne(523), &mut rng));
    }

    #[test]
    fn test_rounds_clamped() {
        assert_eq!(PrimalityTester::new(1).rounds(), MIN_ROUNDS);
        assert_eq!(PrimalityTester::new(20).rounds(), 20);
    }

    #[test]
    fn test_random_prime_bit_length() {
        let tester = PrimalityTester::default();
        let mut rng = rng();

        for bits in [16u32, 64, 128] {
            let p = tester.random_prime(bits, &mut rng);
            assert_eq!(p.bits(), u64::from(bits));
            assert!(tester.is_prime(&p, &mut rng));
        }
    }

    #[test]
    fn test_random_prime_reproducible() {
        let tester = PrimalityTester::default();
        let a = tester.random_prime(96, &mut StdRng::seed_from_u64(7));
        let b = tester.random_prime(96, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
