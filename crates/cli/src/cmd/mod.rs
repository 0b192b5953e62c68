mod make;
mod version;

pub use make::{MakeArgs, cmd_make};
pub use version::cmd_version;
