mod cp;

pub use cp::{CpError, CpOutcome, CpRequest, cp};
