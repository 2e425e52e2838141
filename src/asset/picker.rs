use log::debug;

use crate::provider::ReleaseAsset;

/// Extension of the detached signature published next to each binary.
pub const SIGNATURE_EXTENSION: &str = ".asc";

/// Result of splitting a release's host assets into binary and signature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssetSelection<'a> {
    pub binary: Option<&'a ReleaseAsset>,
    pub signature: Option<&'a ReleaseAsset>,
}

/// Partition `assets` by the signature extension.
///
/// Exactly one binary is expected. When several non-signature assets are
/// present the last one encountered wins.
pub fn select_assets(assets: &[ReleaseAsset]) -> AssetSelection<'_> {
    let mut selection = AssetSelection::default();

    for asset in assets {
        if asset.name.ends_with(SIGNATURE_EXTENSION) {
            selection.signature = Some(asset);
        } else {
            if let Some(previous) = selection.binary {
                debug!(
                    "Multiple binary assets found, {} replaces {}",
                    asset.name, previous.name
                );
            }
            selection.binary = Some(asset);
        }
    }

    selection
}
