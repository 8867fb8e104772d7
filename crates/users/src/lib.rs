//! Users domain module (accounts and profiles).
//!
//! This crate contains the user-facing record shapes and their input rules,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod email;
pub mod profile;
pub mod role;
pub mod user;

pub use email::Email;
pub use profile::{NewProfile, Profile};
pub use role::Role;
pub use user::{NewUser, User};
