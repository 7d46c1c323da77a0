//! Authentication adapters.
//!
//! `FirebaseSessionValidator` is the production implementation of the
//! `SessionValidator` port; `MockSessionValidator` backs tests.

mod firebase;
mod mock;

pub use firebase::{FirebaseConfig, FirebaseSessionValidator};
pub use mock::MockSessionValidator;
