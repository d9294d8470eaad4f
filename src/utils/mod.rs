pub mod clock;
pub mod dir;
pub mod duration;
pub mod input;
pub mod logging;
pub mod runtime;
