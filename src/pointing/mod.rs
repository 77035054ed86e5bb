//! Where the antenna believes it is pointing.

mod model;

pub use model::PointingModel;
