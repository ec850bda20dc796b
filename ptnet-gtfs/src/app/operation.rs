use super::{batch_ops, AppError, BuildConfig};
use crate::io::{self, RouteModeTable};
use gtfs_structures::Gtfs;
use std::path::Path;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum PtnetOperation {
    /// code GTFS routes onto a roadway network and emit the transit line
    /// and augmented network tables
    Build {
        /// a GTFS bundle, either a zip archive or an extracted directory
        #[arg(long)]
        gtfs: String,
        /// roadway node table (csv with N,X,Y columns)
        #[arg(long)]
        nodes_file: String,
        /// roadway link table (csv with A,B and WKT geometry columns)
        #[arg(long)]
        links_file: String,
        /// route id to mode code lookup (csv with ROUTE_ID,MODE columns)
        #[arg(long)]
        mode_table: String,
        /// path to build parameters (.toml or .json); defaults apply when
        /// omitted
        #[arg(long)]
        config_file: Option<String>,
        /// output directory for the coded line and network tables
        #[arg(long)]
        output_directory: String,
    },
}

impl PtnetOperation {
    pub fn run(&self) -> Result<(), AppError> {
        match self {
            PtnetOperation::Build {
                gtfs,
                nodes_file,
                links_file,
                mode_table,
                config_file,
                output_directory,
            } => {
                let config = match config_file {
                    None => BuildConfig::default(),
                    Some(f) => {
                        log::info!("reading build configuration from {f}");
                        BuildConfig::try_from(f)?
                    }
                };
                let network =
                    io::load_network(Path::new(nodes_file), Path::new(links_file))?;
                log::info!(
                    "loaded roadway network with {} nodes and {} links",
                    network.n_nodes(),
                    network.n_links()
                );
                let bundle = Gtfs::new(gtfs)?;
                let modes = RouteModeTable::from_path(Path::new(mode_table))?;
                let summary = batch_ops::run_build(
                    &bundle,
                    network,
                    &modes,
                    &config,
                    Path::new(output_directory),
                )?;
                eprintln!("finished: {summary}");
                Ok(())
            }
        }
    }
}
