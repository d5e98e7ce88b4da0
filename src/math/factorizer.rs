//! Memoizing factorizer over an incrementally extended prime table
//!
//! The prime table is complete up to `sqrt(bound) + 1`. Any number that is
//! not above the bound can therefore be factorized by trial division against
//! the table alone. When a larger number shows up, the bound is moved to ten
//! times that number and the table is extended from its last prime, so the
//! number of growth events stays logarithmic in the largest input seen.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::{BOUND_GROWTH_FACTOR, DEFAULT_FACTORIZER_BOUND};

/// Prime factor -> multiplicity
pub type Factorization = BTreeMap<u64, u32>;

const SEED_PRIMES: [u64; 4] = [2, 3, 5, 7];

/// Ascending list of known primes with a membership set and coverage bound
#[derive(Debug, Clone)]
pub struct PrimeTable {
    primes: Vec<u64>,
    members: HashSet<u64>,
    bound: u64,
}

impl PrimeTable {
    fn seeded() -> Self {
        Self {
            primes: SEED_PRIMES.to_vec(),
            members: SEED_PRIMES.into_iter().collect(),
            bound: 0,
        }
    }

    /// Known primes in ascending order
    pub fn primes(&self) -> &[u64] {
        &self.primes
    }

    /// Numbers up to this bound can be factorized without growing the table
    pub fn bound(&self) -> u64 {
        self.bound
    }

    pub fn len(&self) -> usize {
        self.primes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }

    pub fn contains(&self, num: u64) -> bool {
        self.members.contains(&num)
    }

    fn largest(&self) -> u64 {
        self.primes.last().copied().unwrap_or(1)
    }

    /// Trial division by the known primes not above `sqrt(candidate)`.
    ///
    /// Only meaningful when every prime below the candidate is already known.
    fn passes_trial_division(&self, candidate: u64) -> bool {
        let root = candidate.isqrt();
        self.primes
            .iter()
            .take_while(|&&p| p <= root)
            .all(|&p| candidate % p != 0)
    }

    /// Extend the table in ascending order up to `sqrt(new_bound) + 1`.
    ///
    /// Candidates already present in the membership set but not yet listed
    /// (loaded hints) are accepted without trial division.
    fn extend_to(&mut self, new_bound: u64) {
        let start = self.largest() + 1;
        let high = new_bound.isqrt().saturating_add(1);
        let before = self.primes.len();

        for candidate in start..=high {
            if self.members.contains(&candidate) || self.passes_trial_division(candidate) {
                self.primes.push(candidate);
                self.members.insert(candidate);
            }
        }

        debug!(
            old_bound = self.bound,
            new_bound,
            added = self.primes.len() - before,
            total = self.primes.len(),
            "extended prime table"
        );
        self.bound = new_bound;
    }
}

/// Factorizer with a per-number cache, meant for repeated factorizations
///
/// Not synchronized: share across threads behind a `Mutex`, or give each
/// thread its own instance.
#[derive(Debug, Clone)]
pub struct Factorizer {
    table: PrimeTable,
    cache: HashMap<u64, Factorization>,
}

impl Factorizer {
    /// Create a factorizer covering numbers up to [`DEFAULT_FACTORIZER_BOUND`]
    pub fn new() -> Self {
        Self::with_bound(DEFAULT_FACTORIZER_BOUND)
    }

    /// Create a factorizer with primes precomputed up to `sqrt(bound) + 1`
    pub fn with_bound(bound: u64) -> Self {
        let mut table = PrimeTable::seeded();
        table.extend_to(bound);
        Self {
            table,
            cache: HashMap::new(),
        }
    }

    /// Rebuild a factorizer from a previously saved prime list.
    ///
    /// Entries are trusted as prime. The table is completed up to the largest
    /// entry, with any gaps filled by trial division, and the bound is set to
    /// the square of that entry.
    pub fn from_primes(primes: Vec<u64>) -> Self {
        let mut table = PrimeTable::seeded();
        let largest_seed = table.largest();
        let mut largest = largest_seed;
        for p in primes.into_iter().filter(|&p| p > largest_seed) {
            largest = largest.max(p);
            table.members.insert(p);
        }
        table.extend_to(largest.saturating_mul(largest));
        Self {
            table,
            cache: HashMap::new(),
        }
    }

    /// Load a prime list written by [`Factorizer::save_primes`]
    pub fn load_primes(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let primes: Vec<u64> = serde_json::from_str(&data)?;
        Ok(Self::from_primes(primes))
    }

    /// Save the prime list as a JSON array
    pub fn save_primes(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string(self.table.primes())?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Known primes in ascending order
    pub fn list_primes(&self) -> &[u64] {
        self.table.primes()
    }

    pub fn prime_table(&self) -> &PrimeTable {
        &self.table
    }

    /// Current coverage bound
    pub fn bound(&self) -> u64 {
        self.table.bound()
    }

    /// Number of memoized factorizations
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    fn ensure_bound(&mut self, num: u64) {
        if num > self.table.bound {
            self.table.extend_to(num.saturating_mul(BOUND_GROWTH_FACTOR));
        }
    }

    /// Least prime divisor of `num` (itself when prime). Requires `num <= bound`.
    fn least_divisor(&self, num: u64) -> u64 {
        let root = num.isqrt();
        self.table
            .primes
            .iter()
            .copied()
            .take_while(|&p| p <= root)
            .find(|&p| num % p == 0)
            .unwrap_or(num)
    }

    /// Factorize a number into prime -> multiplicity.
    ///
    /// `0` and `1` give an empty factorization.
    ///
    /// # Example
    /// ```
    /// use credict::math::Factorizer;
    ///
    /// let mut factorizer = Factorizer::with_bound(1_000);
    /// let factors = factorizer.factorize(360);
    /// assert_eq!(factors.get(&2), Some(&3));
    /// assert_eq!(factors.get(&3), Some(&2));
    /// assert_eq!(factors.get(&5), Some(&1));
    /// ```
    pub fn factorize(&mut self, num: u64) -> Factorization {
        self.ensure_bound(num);

        if num < 2 {
            return Factorization::new();
        }

        if let Some(cached) = self.cache.get(&num) {
            return cached.clone();
        }

        if self.table.contains(num) {
            let factorization = Factorization::from([(num, 1)]);
            self.cache.insert(num, factorization.clone());
            return factorization;
        }

        let divisor = self.least_divisor(num);
        let mut factorization = self.factorize(num / divisor);
        *factorization.entry(divisor).or_insert(0) += 1;
        self.cache.insert(num, factorization.clone());
        factorization
    }

    /// True when `num` factorizes to exactly itself
    pub fn is_prime(&mut self, num: u64) -> bool {
        let factors = self.factorize(num);
        factors.len() == 1 && factors.get(&num) == Some(&1)
    }
}

impl Default for Factorizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn product(factors: &Factorization) -> u64 {
        factors.iter().map(|(&p, &m)| p.pow(m)).product()
    }

    #[test]
    fn test_trivial_inputs() {
        let mut factorizer = Factorizer::with_bound(100);
        assert!(factorizer.factorize(0).is_empty());
        assert!(factorizer.factorize(1).is_empty());
    }

    #[test]
    fn test_factorize_known_values() {
        let mut factorizer = Factorizer::with_bound(100);
        assert_eq!(factorizer.factorize(2), Factorization::from([(2, 1)]));
        assert_eq!(factorizer.factorize(161), Factorization::from([(7, 1), (23, 1)]));
        assert_eq!(factorizer.factorize(121), Factorization::from([(11, 2)]));
        assert_eq!(
            factorizer.factorize(1024),
            Factorization::from([(2, 10)])
        );
        assert_eq!(
            factorizer.factorize(10_008_601_225),
            Factorization::from([(5, 2), (7, 1), (23, 1), (41, 1), (60_649, 1)])
        );
    }

    #[test]
    fn test_product_invariant() {
        let mut factorizer = Factorizer::with_bound(0);
        for num in 2..5_000u64 {
            assert_eq!(product(&factorizer.factorize(num)), num, "product mismatch for {}", num);
        }
    }

    #[test]
    fn test_large_prime() {
        let mut factorizer = Factorizer::with_bound(100);
        assert!(factorizer.is_prime(100_003));
        assert!(!factorizer.is_prime(100_001));
        assert!(!factorizer.is_prime(1));
        assert!(!factorizer.is_prime(121));
    }

    #[test]
    fn test_cache_is_populated() {
        let mut factorizer = Factorizer::with_bound(100);
        assert_eq!(factorizer.cached_count(), 0);
        factorizer.factorize(360);
        // 360, 180, 90, 45, 15, 5
        assert_eq!(factorizer.cached_count(), 6);
        let again = factorizer.factorize(360);
        assert_eq!(factorizer.cached_count(), 6);
        assert_eq!(product(&again), 360);
    }

    #[test]
    fn test_initial_table() {
        let factorizer = Factorizer::with_bound(1_000_000);
        // primes up to 1001
        assert_eq!(factorizer.list_primes().len(), 168);
        assert_eq!(factorizer.list_primes().last(), Some(&997));
        assert_eq!(factorizer.bound(), 1_000_000);
    }

    #[test]
    fn test_table_is_sorted_and_prime() {
        let factorizer = Factorizer::with_bound(10_000_000);
        let primes = factorizer.list_primes();
        assert!(primes.windows(2).all(|w| w[0] < w[1]));
        for &p in primes {
            assert!((2..p).take_while(|d| d * d <= p).all(|d| p % d != 0), "{} is not prime", p);
        }
    }

    #[test]
    fn test_bound_grows_by_factor_of_ten() {
        let mut factorizer = Factorizer::with_bound(100);
        let before = factorizer.list_primes().len();

        factorizer.factorize(10_007);
        assert_eq!(factorizer.bound(), 100_070);
        // complete up to isqrt(100_070) + 1 = 317
        assert_eq!(factorizer.list_primes().last(), Some(&317));
        assert!(factorizer.list_primes().len() > before);

        // smaller numbers never shrink the table
        factorizer.factorize(50);
        assert_eq!(factorizer.bound(), 100_070);
        assert_eq!(factorizer.list_primes().last(), Some(&317));
    }

    #[test]
    fn test_extension_matches_fresh_table() {
        let mut grown = Factorizer::with_bound(100);
        grown.factorize(1_000);
        grown.factorize(123_456);
        grown.factorize(98_765_432);

        let fresh = Factorizer::with_bound(grown.bound());
        assert_eq!(grown.list_primes(), fresh.list_primes());
    }

    #[test]
    fn test_from_primes_fills_gaps() {
        let complete = Factorizer::with_bound(1_000_000);
        let partial: Vec<u64> = complete
            .list_primes()
            .iter()
            .copied()
            .enumerate()
            .filter(|(i, _)| i % 3 != 0)
            .map(|(_, p)| p)
            .collect();

        let rebuilt = Factorizer::from_primes(partial);
        assert_eq!(rebuilt.list_primes(), complete.list_primes());
        assert_eq!(rebuilt.bound(), 997 * 997);
    }

    #[test]
    fn test_save_and_load_primes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tables").join("primes.json");

        let original = Factorizer::with_bound(10_000_000);
        original.save_primes(&path).unwrap();

        let mut loaded = Factorizer::load_primes(&path).unwrap();
        assert_eq!(loaded.list_primes(), original.list_primes());
        assert_eq!(product(&loaded.factorize(9_999_991)), 9_999_991);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Factorizer::load_primes(&temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(crate::CredictError::IoError(_))));
    }

    #[test]
    fn test_load_garbage_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("primes.json");
        fs::write(&path, "{\"not\": \"a list\"}").unwrap();
        let result = Factorizer::load_primes(&path);
        assert!(matches!(result, Err(crate::CredictError::SerializationError(_))));
    }

    mod property_based_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: product of prime powers reconstructs the input
            #[test]
            fn prop_product_equals_input(num in 2u64..10_000_000) {
                let mut factorizer = Factorizer::with_bound(0);
                let factors = factorizer.factorize(num);
                prop_assert_eq!(product(&factors), num);
            }

            /// Property: every reported factor is prime
            #[test]
            fn prop_factors_are_prime(num in 2u64..1_000_000) {
                let mut factorizer = Factorizer::with_bound(0);
                let factors = factorizer.factorize(num);
                for &p in factors.keys() {
                    prop_assert!(factorizer.is_prime(p));
                }
            }
        }
    }
}
