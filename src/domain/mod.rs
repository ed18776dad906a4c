// Domain layer: entities, locale routing and the ports the core talks through.

pub mod locale;
pub mod model;
pub mod ports;
