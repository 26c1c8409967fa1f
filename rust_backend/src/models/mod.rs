pub mod macros;
pub mod observation;
pub mod telescope;
pub mod value;

pub use observation::*;
pub use telescope::*;
pub use value::*;
