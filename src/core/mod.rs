pub mod cancel;
pub mod constants;
pub mod matcher;
pub mod outcome;
pub mod resolver;

pub use cancel::CancelToken;
pub use matcher::SdkMatcher;
pub use outcome::*;
pub use resolver::{JdkAuto, ResolverCollaborators, ResolverSession};
