/// Prevents downstream crates from implementing traits that only
/// make sense for types defined in this crate.
pub trait Sealed {}
