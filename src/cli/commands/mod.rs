//! CLI command implementations.

mod config;
mod doctor;
mod extract;
mod podcast;
mod serve;
mod speak;
mod summarize;

pub use config::run_config;
pub use doctor::run_doctor;
pub use extract::run_extract;
pub use podcast::run_podcast;
pub use serve::{router, run_serve};
pub use speak::run_speak;
pub use summarize::run_summarize;
