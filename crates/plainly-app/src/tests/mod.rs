
use std::path::PathBuf;

/// Fresh flags file path under the system temp dir
pub fn temp_flags_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("plainly-test-{}", uuid::Uuid::new_v4()))
        .join("flags.json")
}
