//! Built-in detection strategies.
//!
//! Each strategy implements [`CharsetProber`](crate::CharsetProber); the
//! orchestrator never looks past that trait, so any of these can be replaced
//! through a custom [`ProberFactory`](crate::ProberFactory).

pub mod cjk;
pub mod escape;
pub mod latin1;
pub mod single_byte;
pub mod utf8;

pub use cjk::{CjkProber, CjkScheme};
pub use escape::EscProber;
pub use latin1::Latin1Prober;
pub use single_byte::{SingleByteModel, SingleByteProber};
pub use utf8::Utf8Prober;
