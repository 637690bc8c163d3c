pub mod base58;
pub mod share_code;
pub mod time;

pub use share_code::{
    decode_share_code, generate_share_code, is_valid_share_code, ShareCode, ShareCodeError,
};
pub use time::format_relative;
