mod datapoint;

pub use datapoint::DataPoint;
