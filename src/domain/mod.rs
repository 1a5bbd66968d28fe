// Domain layer: records, the grading policy and the storage port.

pub mod grading;
pub mod model;
pub mod ports;
