pub mod value;
pub mod frame;
pub mod dispatch;
