mod app_error;
mod batch_ops;
mod build_config;
mod operation;
mod ptnet_app;

pub use app_error::AppError;
pub use batch_ops::{run_build, BatchSummary};
pub use build_config::{BuildConfig, PeriodConfig};
pub use operation::PtnetOperation;
pub use ptnet_app::PtnetApp;
