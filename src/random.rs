use rand::SeedableRng;
use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;

use crate::error::CryptError;

/// Uniform random integer in `[0, max)` from an OS-seeded CSPRNG.
///
/// `max` must be positive.
pub fn random_int(max: i64) -> Result<i64, CryptError> {
    if max <= 0 {
        return Err(CryptError::RandomGeneration(format!(
            "upper bound must be positive, got {max}"
        )));
    }
    let mut rng =
        StdRng::try_from_os_rng().map_err(|e| CryptError::RandomGeneration(e.to_string()))?;
    let range = Uniform::new(0, max).map_err(|e| CryptError::RandomGeneration(e.to_string()))?;
    Ok(range.sample(&mut rng))
}
