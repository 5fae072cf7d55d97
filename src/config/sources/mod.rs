//! Config sources layered by the merge service.

pub mod environment;
pub mod project_file;
