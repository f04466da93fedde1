pub mod key;
pub mod entity;
pub mod schema;
pub mod registry;
pub mod vectors;
pub mod arrays;
pub mod shapes;
