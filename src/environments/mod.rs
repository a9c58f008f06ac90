pub mod java;

pub use java::{
    candidate::{CandidateSdk, DownloadableSdk, LocalDetectedSdk, RegisteredSdk, SdkCandidate},
    requirement::{JdkRequirement, JdkRequirements, RequirementParser, SdkKind, UnknownSdk, VersionSpec},
    version::JavaVersion,
};
