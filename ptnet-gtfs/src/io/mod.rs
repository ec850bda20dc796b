mod io_error;
mod mode_table;
mod network_csv;
mod record_file;

pub use io_error::IoError;
pub use mode_table::RouteModeTable;
pub use network_csv::{
    load_network, read_links, read_nodes, write_network, write_transit_only,
};
pub use record_file::{field_declaration, write_records};
