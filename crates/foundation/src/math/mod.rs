pub mod geodesy;
pub mod lnglat;
pub mod precision;
pub mod vec;

pub use geodesy::*;
pub use lnglat::*;
pub use precision::*;
pub use vec::*;
