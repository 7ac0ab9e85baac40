use crate::shared::constants::*;
use serde::{Deserialize, Serialize};

/// Argon2id parameters used to turn a keystore password into an AES key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_cost: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost: ARGON2_MEMORY_COST,
            iterations: ARGON2_TIME_COST,
            parallelism: ARGON2_PARALLELISM,
        }
    }
}

impl KdfParams {
    /// Minimal cost parameters for unit and integration tests
    pub fn insecure_fast() -> Self {
        Self {
            memory_cost: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kdf_params_default() {
        let params = KdfParams::default();
        assert_eq!(params.memory_cost, 65536);
        assert_eq!(params.iterations, 3);
        assert_eq!(params.parallelism, 1);
    }
}
