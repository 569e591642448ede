// Domain layer: models and ports. The gate and adapters depend on this, never the other way round.

pub mod model;
pub mod ports;
