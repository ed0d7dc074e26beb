mod middleware;
pub mod models;
mod public;

pub use middleware::RequestContext;
pub use public::{HttpState, build_router};
