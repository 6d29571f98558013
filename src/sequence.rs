pub mod decode;
pub mod frame;
pub mod ops;
