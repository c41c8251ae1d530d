pub mod conversion;
pub mod currency;
pub mod validate;
