mod helpers;
mod secret;
mod usdt;

pub mod op;

pub use helpers::parse_boolean_flag;
pub use secret::Secret;
pub use usdt::{UsdtAmount, UsdtConversionError, USDT_CURRENCY_CODE, USDT_DECIMALS};
