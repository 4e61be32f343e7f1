//! TRON address validation.
//!
//! TRON mainnet addresses are base58check encodings of a 21-byte payload: the `0x41` network prefix followed by the
//! 20-byte account hash. Everything that enters the address catalog is checked against this format, since a typo in
//! a receiving address means lost funds.
use thiserror::Error;

pub const TRON_ADDRESS_PREFIX: u8 = 0x41;
const TRON_PAYLOAD_LENGTH: usize = 21;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TronAddressError {
    #[error("Not a valid base58check string. {0}")]
    InvalidEncoding(String),
    #[error("Expected a {TRON_PAYLOAD_LENGTH}-byte payload, got {0} bytes")]
    InvalidLength(usize),
}

/// Checks that `address` is a well-formed TRON (TRC20) address.
pub fn validate_tron_address(address: &str) -> Result<(), TronAddressError> {
    let payload = bs58::decode(address)
        .with_check(Some(TRON_ADDRESS_PREFIX))
        .into_vec()
        .map_err(|e| TronAddressError::InvalidEncoding(e.to_string()))?;
    if payload.len() != TRON_PAYLOAD_LENGTH {
        return Err(TronAddressError::InvalidLength(payload.len()));
    }
    Ok(())
}
