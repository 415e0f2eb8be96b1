pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod intent;
pub mod intent_resolver;
pub mod records;
pub mod render;
pub mod report;
pub mod schema;
pub mod session;

pub use config::ViewerConfig;
pub use engine::{run_report, ExtractBundle};
pub use error::{ReportError, Result, SchemaError};
pub use extract::{Extract, ExtractKind};
pub use intent::Intent;
pub use report::ReportOutput;
pub use session::Session;
