mod hash;

pub use hash::compute_hash;
