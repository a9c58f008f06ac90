pub mod task;

pub use task::{ArchiveKind, DirectoryInstaller, InstallTask, InstallerTaskFactory};
