mod knowledge;

pub use knowledge::*;
