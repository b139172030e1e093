// Domain layer: bill and postal code models plus the ports (interfaces) the core depends on.

pub mod model;
pub mod ports;
