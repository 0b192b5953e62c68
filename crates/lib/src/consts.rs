pub const APP_NAME: &str = "package-builder";

/// Prefix of every artifact file name (`launcher.<target>.<ext>`).
pub const ARTIFACT_PREFIX: &str = "launcher";

/// Installation identifier used when none is supplied.
pub const DEFAULT_IDENTIFIER: &str = "launcher";

/// Version channel used when none is supplied.
pub const DEFAULT_CHANNEL: &str = "stable";

/// Prefix for an auto-allocated download cache directory.
pub const CACHE_DIR_PREFIX: &str = "download_cache";

/// Prefix for an auto-allocated output directory.
pub const OUTPUT_DIR_PREFIX: &str = "launcher-package";

/// Package version used when none is supplied and detection fails.
pub const FALLBACK_PACKAGE_VERSION: &str = "0.0.0";
