pub mod attribute;
pub mod viewstate;

pub use attribute::*;
pub use viewstate::*;
