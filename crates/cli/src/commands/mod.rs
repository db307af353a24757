//! Command implementations.

mod info;
mod run;
mod simulate;
mod validate;

pub use info::run_info;
pub use run::run_replay;
pub use simulate::run_simulate;
pub use validate::run_validate;
