//! RealmSave Core - Fundamental types shared by every stream and format crate

mod error;
mod state;

pub use error::*;
pub use state::*;
