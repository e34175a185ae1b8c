mod static_directory;
mod traits;


pub use static_directory::StaticDirectory;
pub use traits::{AgentDirectory, DirectorySnapshot};
