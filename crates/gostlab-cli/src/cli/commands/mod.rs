//! CLI command handlers. Each command is in its own file.

mod cipher;
mod generate;
mod hash;
mod progress;
mod resolve_name;

pub use cipher::{run_cipher, CipherArgs};
pub use generate::{run_completions, run_man};
pub use hash::run_hash;
pub use resolve_name::{run_resolve_name, ResolveArgs};
