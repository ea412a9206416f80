pub mod bundle;
pub mod value;

pub use bundle::*;
pub use value::*;
