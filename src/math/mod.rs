//! Mathematical utilities: weighted least squares, GLM fitting, and
//! circular statistics.

pub mod circular;
pub mod glm;
pub mod wls;

pub use circular::*;
pub use glm::*;
pub use wls::*;
