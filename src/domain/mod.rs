// Domain layer: run results and the ports (interfaces) the engine depends on.

pub mod model;
pub mod ports;
