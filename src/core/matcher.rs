//! 候选 SDK 的匹配与择优
//!
//! 这里只做纯计算：所有候选池都由调用方提前准备好，不涉及任何 I/O。

use super::outcome::{DownloadSdkFix, LocalSdkFix, ResolutionOutcome};
use crate::environments::java::candidate::{
    DownloadableSdk, LocalDetectedSdk, RegisteredSdk, SdkCandidate,
};
use crate::environments::java::requirement::JdkRequirement;

/// 候选匹配器
pub struct SdkMatcher;

impl SdkMatcher {
    /// 单个候选是否满足要求
    ///
    /// 版本未知或不可用的候选视为不匹配。
    pub fn matches<C: SdkCandidate + ?Sized>(requirement: &JdkRequirement, candidate: &C) -> bool {
        if !candidate.is_usable() {
            return false;
        }
        let Some(version) = candidate.version() else {
            return false;
        };
        requirement.matches_version(version) && requirement.matches_vendor(candidate.vendor())
    }

    /// 版本最大的候选；版本相同时返回最后一个，输入顺序不变则结果不变
    pub fn pick_best<'a, C, I>(candidates: I) -> Option<&'a C>
    where
        C: SdkCandidate + 'a,
        I: IntoIterator<Item = &'a C>,
    {
        candidates
            .into_iter()
            .filter_map(|c| c.version().map(|v| (c, v)))
            .max_by(|(_, a), (_, b)| a.cmp(b))
            .map(|(c, _)| c)
    }

    /// 过滤后择优
    pub fn best_match<'a, C: SdkCandidate>(
        requirement: &JdkRequirement,
        candidates: &'a [C],
    ) -> Option<&'a C> {
        Self::pick_best(candidates.iter().filter(|c| Self::matches(requirement, *c)))
    }

    /// 已注册的 SDK 优先
    pub fn resolve_local(
        requirement: &JdkRequirement,
        registered: &[RegisteredSdk],
        local: &[LocalDetectedSdk],
    ) -> Option<LocalSdkFix> {
        if let Some(sdk) = Self::best_match(requirement, registered) {
            return Some(LocalSdkFix::from(sdk));
        }
        Self::best_match(requirement, local).map(LocalSdkFix::from)
    }

    /// 从目录中选出可下载的最新版本；版本无法解析的条目直接排除
    pub fn resolve_download(
        requirement: &JdkRequirement,
        catalog: &[DownloadableSdk],
    ) -> Option<DownloadSdkFix> {
        Self::best_match(requirement, catalog)
            .cloned()
            .map(DownloadSdkFix::new)
    }

    /// 已注册 > 本地检测 > 可下载
    pub fn resolve(
        requirement: &JdkRequirement,
        registered: &[RegisteredSdk],
        local: &[LocalDetectedSdk],
        catalog: &[DownloadableSdk],
    ) -> Option<ResolutionOutcome> {
        if let Some(fix) = Self::resolve_local(requirement, registered, local) {
            return Some(ResolutionOutcome::LocalFix(fix));
        }
        Self::resolve_download(requirement, catalog).map(ResolutionOutcome::Download)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::core::outcome::FixOrigin;
    use crate::environments::java::requirement::{JdkRequirements, VersionSpec};
    use crate::environments::java::vendor::JdkVendor;
    use std::path::PathBuf;

    fn at_least(major: u32) -> JdkRequirement {
        JdkRequirement::new(VersionSpec::AtLeast(major))
    }

    #[test]
    fn test_pick_best_empty() {
        let empty: Vec<LocalDetectedSdk> = Vec::new();
        assert!(SdkMatcher::pick_best(&empty).is_none());
    }

    #[test]
    fn test_pick_best_is_maximal_member() {
        let pool = vec![local("11.0.2"), local("17.0.1"), local("1.8.0_292"), local("17.0.0")];
        let best = SdkMatcher::pick_best(&pool).unwrap();
        assert_eq!(best.version_string, "17.0.1");
        assert!(pool.iter().all(|c| c.version <= best.version));
    }

    #[test]
    fn test_pick_best_ties_are_deterministic() {
        let pool = vec![
            local_with_vendor("17.0.2", "/a", JdkVendor::Temurin),
            local_with_vendor("17.0.2", "/b", JdkVendor::Zulu),
        ];
        let first = SdkMatcher::pick_best(&pool).unwrap().home_path.clone();
        for _ in 0..10 {
            assert_eq!(SdkMatcher::pick_best(&pool).unwrap().home_path, first);
        }
    }

    #[test]
    fn test_matches_rejects_invalid_home() {
        let mut sdk = registered("17.0.1");
        sdk.valid_home = false;
        assert!(!SdkMatcher::matches(&at_least(11), &sdk));
    }

    #[test]
    fn test_matches_rejects_unparsed_download() {
        let mut sdk = downloadable("17.0.1");
        sdk.version = None;
        assert!(!SdkMatcher::matches(&at_least(11), &sdk));
    }

    #[test]
    fn test_registered_wins_over_newer_sources() {
        let outcome = SdkMatcher::resolve(
            &at_least(11),
            &[registered("8"), registered("11")],
            &[local("17")],
            &[downloadable("21")],
        )
        .unwrap();

        match outcome {
            ResolutionOutcome::LocalFix(fix) => {
                assert_eq!(fix.origin, FixOrigin::Registered);
                assert_eq!(fix.version_string, "11.0.0");
                assert_eq!(fix.existing_sdk_home, PathBuf::from("/registered/11"));
            }
            other => panic!("expected local fix, got {other:?}"),
        }
    }

    #[test]
    fn test_local_used_when_registered_does_not_match() {
        let outcome = SdkMatcher::resolve(
            &at_least(11),
            &[registered("8")],
            &[local("11.0.2"), local("17.0.1")],
            &[downloadable("21")],
        )
        .unwrap();

        match outcome {
            ResolutionOutcome::LocalFix(fix) => {
                assert_eq!(fix.origin, FixOrigin::Detected);
                assert_eq!(fix.version_string, "17.0.1");
            }
            other => panic!("expected local fix, got {other:?}"),
        }
    }

    #[test]
    fn test_download_newest_matching() {
        let outcome = SdkMatcher::resolve(
            &at_least(11),
            &[registered("8")],
            &[],
            &[downloadable("17"), downloadable("11")],
        )
        .unwrap();

        match outcome {
            ResolutionOutcome::Download(fix) => assert_eq!(fix.version_string(), "17"),
            other => panic!("expected download, got {other:?}"),
        }
    }

    #[test]
    fn test_download_skips_unparseable_entries() {
        let mut broken = downloadable("99");
        broken.version = None;
        let fix = SdkMatcher::resolve_download(&at_least(11), &[broken, downloadable("11.0.2")])
            .unwrap();
        assert_eq!(fix.version_string(), "11.0.2");
    }

    #[test]
    fn test_nothing_matches() {
        assert!(SdkMatcher::resolve(&at_least(21), &[registered("8")], &[local("17")], &[]).is_none());
    }

    #[test]
    fn test_vendor_constraint_filters_pool() {
        let req = JdkRequirements::parse_requirement("zulu-17").unwrap();
        let pool = vec![
            local_with_vendor("17.0.9", "/temurin", JdkVendor::Temurin),
            local_with_vendor("17.0.2", "/zulu", JdkVendor::Zulu),
        ];
        let fix = SdkMatcher::resolve_local(&req, &[], &pool).unwrap();
        assert_eq!(fix.existing_sdk_home, PathBuf::from("/zulu"));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let registered = [registered("8")];
        let local = [local("17.0.1"), local("17.0.1")];
        let catalog = [downloadable("21")];
        let first = SdkMatcher::resolve(&at_least(11), &registered, &local, &catalog);
        let second = SdkMatcher::resolve(&at_least(11), &registered, &local, &catalog);
        assert_eq!(first, second);
    }
}
