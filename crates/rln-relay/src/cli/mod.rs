mod commands;
mod config_cmd;
mod epoch;
mod proof;
mod register;
mod sync;
mod utils;

pub use commands::{Cli, Commands, ConfigAction};
pub use config_cmd::handle_config;
pub use epoch::show_epoch;
pub use proof::handle_proof;
pub use register::register_member;
pub use sync::run_sync;
pub use utils::init_logging;
