//! Asset selection module
//!
//! Host detection, the asset-name filter template, and the split of a
//! release's assets into the primary binary and its detached signature.

mod picker;
mod platform;
mod template;

pub use picker::{AssetSelection, SIGNATURE_EXTENSION, select_assets};
pub use platform::{HostDescriptor, normalize_arch, normalize_os};
pub use template::AssetTemplate;
