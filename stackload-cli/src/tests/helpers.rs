//! Test helpers for preparing solve requests on disk.

use camino::{Utf8Path, Utf8PathBuf};
use stackload_core::{BundleRow, SolveRequest, VehicleRow};
use tempfile::TempDir;

/// A temporary directory addressed through UTF-8 paths.
pub(super) struct Workspace {
    _tmp: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self { _tmp: tmp, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture file");
}

/// Three small piles and one trailer: a single 500-cost vehicle.
pub(super) fn small_request() -> SolveRequest {
    SolveRequest {
        bundles: (0..3)
            .map(|n| BundleRow::new(format!("B{n}"), 100.0, 30.0, 50.0))
            .collect(),
        vehicles: vec![VehicleRow::new("T", "Trailer", 240.0, 96.0, 96.0, 500.0)],
    }
}

pub(super) fn write_request(path: &Utf8Path, request: &SolveRequest) {
    let payload = serde_json::to_string_pretty(request).expect("serialise request");
    write_utf8(path, payload.as_bytes());
}
