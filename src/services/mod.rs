pub mod analytics;
pub mod asset_resolver;
pub mod file_tree;
pub mod geoip;
pub mod zip_import;

pub use analytics::{VisitDetail, VisitRecorder};
pub use asset_resolver::{ResolvedAsset, resolve_asset};
pub use file_tree::{FileTreeNode, NodeType, build_file_tree};
pub use geoip::{GeoInfo, GeoIpLookup, GeoIpProvider};
pub use zip_import::{ImportMode, ZipImportReport, import_archive};
