// 核心模块
pub mod cli;
pub mod core;
pub mod environments;
pub mod error;
pub mod infrastructure;

// 重新导出常用类型
pub use crate::core::{CancelToken, JdkAuto, ResolutionOutcome, ResolverCollaborators, ResolverSession, SdkMatcher};
pub use environments::*;
pub use error::*;
pub use infrastructure::config::{Config, JavaEnvironment};
// 使用命名空间导入常量，避免冲突
pub use crate::core::constants as app_constants;
