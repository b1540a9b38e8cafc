//! Search-and-navigate core: free text to candidates, candidates to a camera
//! move, viewport to the nearest campus, and the detail panel that presents
//! whichever campus is active.

pub mod detail;
pub mod error;
pub mod label;
pub mod notice;
pub mod proximity;
pub mod search;
pub mod selection;
pub mod viewer;

pub use detail::*;
pub use error::*;
pub use label::*;
pub use notice::*;
pub use proximity::*;
pub use search::*;
pub use selection::*;
pub use viewer::*;
