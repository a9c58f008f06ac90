pub mod candidate;
pub mod registered;
pub mod requirement;
pub mod scanner;
pub mod validator;
pub mod vendor;
pub mod version;

pub use registered::{ConfigSdkTable, RegisteredSdkTable};
pub use scanner::{FsLocalScanner, LocalScanner};
pub use vendor::JdkVendor;
