pub mod mem;
pub mod model;
pub mod pg;
pub mod store;
