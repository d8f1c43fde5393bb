// Domain layer: value types and collaborator ports. No I/O here.

pub mod model;
pub mod ports;
