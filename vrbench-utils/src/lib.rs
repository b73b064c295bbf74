mod json;
pub use json::*;
mod stream;
pub use stream::*;
