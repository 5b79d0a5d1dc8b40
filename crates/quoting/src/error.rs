//! Quoting error types.

use carrier_store::CarrierStoreError;
use thiserror::Error;

/// Errors that abort a whole quote request.
///
/// Individual carrier failures are never reported here; they become
/// per-carrier error records instead.
#[derive(Debug, Error)]
pub enum QuotingError {
    /// The carrier directory could not be read.
    #[error("Carrier directory error: {0}")]
    Store(#[from] CarrierStoreError),
}
