//! Declarative descriptions of everything the viewer asks the map engine to
//! draw: style layers, controls, markers and popups.
//!
//! Nothing here talks to an engine; hosts translate these specs into engine
//! calls.

pub mod controls;
pub mod extrusion;
pub mod layer;
pub mod marker;
pub mod popup;
pub mod symbology;

pub use controls::*;
pub use extrusion::*;
pub use layer::*;
pub use marker::*;
pub use popup::*;
pub use symbology::*;
