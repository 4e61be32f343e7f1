mod tron_address;

pub use tron_address::{validate_tron_address, TronAddressError, TRON_ADDRESS_PREFIX};
