use crate::error::{LambdaError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Zero-argument value producer.
pub trait Supplier<T> {
    fn get(&mut self) -> T;
}

impl<T, F> Supplier<T> for F
where
    F: FnMut() -> T,
{
    fn get(&mut self) -> T {
        self()
    }
}

/// Random source for suppliers: fixed seed for repeatable runs, entropy
/// otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Supplies integers in `[0, bound)`. An empty range is rejected up front.
pub fn random_below<R: Rng>(mut rng: R, bound: u32) -> Result<impl FnMut() -> u32> {
    if bound == 0 {
        return Err(LambdaError::invalid_config("bound", "must be greater than 0"));
    }
    Ok(move || rng.gen_range(0..bound))
}

pub fn take<T>(supplier: &mut impl Supplier<T>, count: usize) -> Vec<T> {
    (0..count).map(|_| supplier.get()).collect()
}
