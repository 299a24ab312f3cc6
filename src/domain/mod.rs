// Domain layer: records, view state and the ports the page talks through.

pub mod model;
pub mod ports;
