pub mod hashing;
pub mod scope_guard;
