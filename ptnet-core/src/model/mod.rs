mod attribute;
mod augmentation;
mod network;
mod network_error;
mod network_link;
mod network_node;
mod route_stop;

pub use attribute::{AttributeMap, AttributeValue};
pub use augmentation::AugmentationContext;
pub use network::Network;
pub use network_error::NetworkError;
pub use network_link::NetworkLink;
pub use network_node::NetworkNode;
pub use route_stop::RouteStop;
