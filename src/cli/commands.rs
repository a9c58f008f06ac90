use clap::{Parser, Subcommand};

/// jdkauto CLI 应用程序
#[derive(Debug, Parser)]
#[command(name = "jdkauto")]
#[command(about = "为项目中未配置的 JDK 寻找本地或可下载的替代", long_about = None)]
#[command(version)]
pub struct Cli {
    /// 输出调试日志
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 顶级命令
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// 解析未知 SDK 名称，给出本地修复或下载方案
    Resolve {
        /// SDK 名称，如 `17`、`corretto-11`、`1.8`
        name: String,
        /// SDK 类型
        #[arg(long, default_value = "java")]
        kind: String,
        /// 不访问远程目录
        #[arg(long)]
        offline: bool,
        /// 列出所有满足要求的候选
        #[arg(long)]
        all: bool,
        /// 把找到的本地 JDK 注册到配置
        #[arg(long)]
        register: bool,
        /// JSON 格式输出
        #[arg(long)]
        json: bool,
    },
    /// 扫描本机已安装的 JDK
    Scan {
        /// JSON 格式输出
        #[arg(long)]
        json: bool,
    },
    /// 列出配置中已注册的 JDK
    Registered {
        /// JSON 格式输出
        #[arg(long)]
        json: bool,
    },
    /// 列出本平台可下载的 JDK
    LsRemote {
        /// 忽略磁盘缓存重新下载
        #[arg(long)]
        refresh: bool,
        /// JSON 格式输出
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// 错误提示中使用的操作描述
    pub fn operation(&self) -> String {
        match self {
            Commands::Resolve { name, .. } => format!("解析 SDK '{}'", name),
            Commands::Scan { .. } => "检测本地 JDK".to_string(),
            Commands::Registered { .. } => "列出已注册的 JDK".to_string(),
            Commands::LsRemote { .. } => "获取可下载的 JDK 列表".to_string(),
        }
    }
}
