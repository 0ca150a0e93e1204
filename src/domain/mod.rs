// Domain layer: launch models and the ports the supervisor drives.

pub mod model;
pub mod ports;
