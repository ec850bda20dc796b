use super::PtnetOperation;
use clap::Parser;

/// command line tool for coding GTFS transit service onto a roadway
/// network for a regional travel-demand model
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct PtnetApp {
    #[command(subcommand)]
    pub op: PtnetOperation,
}
