// Domain layer: models, pure styling rules and ports (interfaces).

pub mod model;
pub mod ports;
pub mod styling;
