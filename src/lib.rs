pub mod consts;
mod ffi;
mod header;
mod image;

pub use crate::ffi::{FatArch, FatHeader, MachHeader64};
pub use crate::header::{ByteOrder, HeaderError};
pub use crate::image::execute_header;
