mod value;
mod source;
mod format;
mod interpolate;

pub use value::*;
pub use source::*;
pub use format::*;
pub use interpolate::*;
