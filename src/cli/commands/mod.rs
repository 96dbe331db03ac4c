mod attendance;
mod roster;

pub use attendance::{cmd_attendance, cmd_flagged, cmd_history, cmd_mark, cmd_summary};
pub use roster::{cmd_classes, cmd_seed, cmd_students};

use crate::config::Config;
use crate::state::SharedState;

/// Opens the configured store; migrations and seeding run on the way.
async fn open(config: &Config) -> anyhow::Result<SharedState> {
    SharedState::new(config.clone()).await
}

fn print_rule() {
    println!("{:-<72}", "");
}
