//! Asset routing between the plain-file and archive channels.

/// Channel an asset travels on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    /// Passed through `--archives`, unpacked on the executors.
    ArchiveAsset,
    /// Passed through `--files`, copied as-is.
    FileAsset,
}

/// Extension that marks a loose asset entry as an archive. Case-sensitive.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Decide the channel for one asset entry.
///
/// With the archive channel off everything is a plain file. With it on,
/// staged archives (`already_archived`) go to the archive channel wholesale
/// and loose entries are routed by their `.zip` extension.
pub fn classify(entry: &str, archive_channel_enabled: bool, already_archived: bool) -> AssetClass {
    if !archive_channel_enabled {
        return AssetClass::FileAsset;
    }
    if already_archived || entry.ends_with(ARCHIVE_EXTENSION) {
        AssetClass::ArchiveAsset
    } else {
        AssetClass::FileAsset
    }
}
