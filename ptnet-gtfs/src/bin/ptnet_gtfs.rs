//! reads a GTFS bundle and a roadway network, codes each transit route
//! onto the network (synthesizing transit-only nodes and links where the
//! roadway is disconnected or missing), and writes the line table and
//! augmented network for a regional travel-demand model.
use clap::Parser;
use ptnet_gtfs::app::PtnetApp;

fn main() {
    env_logger::init();
    let args = PtnetApp::parse();
    match args.op.run() {
        Ok(_) => {}
        Err(e) => {
            log::error!("ptnet-gtfs failed: {e}");
            panic!("{}", e.to_string())
        }
    }
}
