use crate::core::outcome::{FixOrigin, ResolutionOutcome};
use crate::environments::java::candidate::{
    CandidateSdk, DownloadableSdk, LocalDetectedSdk, RegisteredSdk,
};
use crate::environments::java::requirement::UnknownSdk;
use crate::error::AppResult;
use crate::infrastructure::installer::InstallTask;
use serde::Serialize;
use std::fmt::Write as _;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// 输出格式化器
pub struct OutputFormatter;

fn to_json<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

impl OutputFormatter {
    /// 格式化解析结果
    pub fn format_resolution(
        &self,
        sdk: &UnknownSdk,
        outcome: Option<&ResolutionOutcome>,
        task: Option<&InstallTask>,
        format: OutputFormat,
    ) -> AppResult<String> {
        match format {
            OutputFormat::Json => to_json(&serde_json::json!({
                "sdk": sdk,
                "outcome": outcome,
                "install_task": task,
            })),
            OutputFormat::Text => {
                let mut output = String::new();
                match outcome {
                    None => {
                        let _ = writeln!(output, "未找到可用于 {} 的 JDK", sdk);
                    }
                    Some(ResolutionOutcome::LocalFix(fix)) => {
                        let origin = match fix.origin {
                            FixOrigin::Registered => "已注册",
                            FixOrigin::Detected => "本地检测",
                        };
                        let _ = writeln!(output, "{} -> 使用{}的 JDK {}", sdk, origin, fix.version_string);
                        let _ = writeln!(output, "  名称: {}", fix.suggested_sdk_name);
                        let _ = writeln!(output, "  路径: {}", fix.existing_sdk_home.display());
                    }
                    Some(ResolutionOutcome::Download(fix)) => {
                        let _ = writeln!(output, "{} -> 下载 {}", sdk, fix.download_description());
                        if let Some(task) = task {
                            let _ = writeln!(output, "  地址: {}", task.url);
                            let _ = writeln!(output, "  安装到: {}", task.target_dir.display());
                        }
                    }
                }
                Ok(output)
            }
        }
    }

    /// 格式化候选列表
    pub fn format_candidates(&self, candidates: &[CandidateSdk], format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Json => to_json(candidates),
            OutputFormat::Text => {
                if candidates.is_empty() {
                    return Ok("没有满足要求的候选\n".to_string());
                }
                let mut output = String::new();
                for candidate in candidates {
                    let _ = writeln!(output, "  [{}] {}", candidate.source_name(), candidate.describe());
                }
                Ok(output)
            }
        }
    }

    /// 格式化本地扫描结果
    pub fn format_local(&self, sdks: &[LocalDetectedSdk], format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Json => to_json(sdks),
            OutputFormat::Text => {
                if sdks.is_empty() {
                    return Ok("未检测到本地 JDK\n".to_string());
                }
                let mut output = format!("检测到 {} 个本地 JDK:\n", sdks.len());
                for sdk in sdks {
                    let _ = writeln!(
                        output,
                        "  {:<20} {:<14} {}",
                        sdk.suggested_name,
                        sdk.version_string,
                        sdk.home_path.display()
                    );
                }
                Ok(output)
            }
        }
    }

    /// 格式化已注册 JDK
    pub fn format_registered(&self, sdks: &[RegisteredSdk], format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Json => to_json(sdks),
            OutputFormat::Text => {
                if sdks.is_empty() {
                    return Ok("没有已注册的 JDK\n".to_string());
                }
                let mut output = String::new();
                for sdk in sdks {
                    let marker = if sdk.valid_home { "" } else { " (路径无效)" };
                    let _ = writeln!(
                        output,
                        "  {:<20} {:<14} {}{}",
                        sdk.name,
                        sdk.version_string,
                        sdk.home_path.display(),
                        marker
                    );
                }
                Ok(output)
            }
        }
    }

    /// 格式化远程目录
    pub fn format_catalog(&self, sdks: &[DownloadableSdk], format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Json => to_json(sdks),
            OutputFormat::Text => {
                if sdks.is_empty() {
                    return Ok("没有适用于本平台的 JDK\n".to_string());
                }
                let mut output = String::new();
                for sdk in sdks {
                    let _ = writeln!(output, "  {:<20} {}", sdk.suggested_name, sdk.full_presentation_text());
                }
                Ok(output)
            }
        }
    }

    /// 格式化提示信息
    pub fn format_message(&self, message: &str, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => format!("{}\n", message),
            OutputFormat::Json => {
                let json_output = serde_json::json!({ "message": message });
                format!("{json_output}\n")
            }
        }
    }
}

/// 默认输出格式化器实例
pub static FORMATTER: OutputFormatter = OutputFormatter;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matcher::fixtures::{downloadable, local, registered};
    use crate::core::outcome::{DownloadSdkFix, LocalSdkFix};
    use crate::infrastructure::installer::{DirectoryInstaller, InstallerTaskFactory};

    #[test]
    fn test_local_fix_text() {
        let fix = LocalSdkFix::from(&local("17.0.1"));
        let outcome = ResolutionOutcome::LocalFix(fix);
        let text = FORMATTER
            .format_resolution(&UnknownSdk::java("17"), Some(&outcome), None, OutputFormat::Text)
            .unwrap();
        assert!(text.contains("本地检测"));
        assert!(text.contains("17.0.1"));
        assert!(text.contains("/local/17.0.1"));
    }

    #[test]
    fn test_download_json() {
        let sdk = downloadable("21");
        let installer = DirectoryInstaller::new("/opt/jdks");
        let fix = DownloadSdkFix::new(sdk.clone());
        let task = installer.create(&sdk, installer.default_install_dir(&sdk));
        let outcome = ResolutionOutcome::Download(fix);

        let text = FORMATTER
            .format_resolution(&UnknownSdk::java("21"), Some(&outcome), Some(&task), OutputFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["outcome"]["kind"], "download");
        assert_eq!(value["install_task"]["archive"], "tar_gz");
        assert_eq!(value["sdk"]["name"], "21");
    }

    #[test]
    fn test_no_outcome() {
        let text = FORMATTER
            .format_resolution(&UnknownSdk::java("My SDK"), None, None, OutputFormat::Text)
            .unwrap();
        assert!(text.starts_with("未找到"));

        let json = FORMATTER
            .format_resolution(&UnknownSdk::java("My SDK"), None, None, OutputFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["outcome"].is_null());
    }

    #[test]
    fn test_candidate_list() {
        let candidates = vec![
            CandidateSdk::from(registered("11")),
            CandidateSdk::from(downloadable("21")),
        ];
        let text = FORMATTER.format_candidates(&candidates, OutputFormat::Text).unwrap();
        assert!(text.contains("[registered] registered-11"));
        assert!(text.contains("[download] Eclipse Temurin 21"));
    }
}
