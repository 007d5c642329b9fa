use std::{
    path::{Path, PathBuf},
    sync::Once,
};

use spoofing_detector::{Pipeline, settings::Settings};
use tracing_subscriber::FmtSubscriber;

static TRACING: Once = Once::new();

pub struct TestHelper {
    pub settings: Settings,
}

impl TestHelper {
    pub fn pipeline(&self) -> Pipeline {
        self.settings.pipeline().unwrap()
    }

    pub fn workers(mut self, num_workers: usize, batch_size: usize) -> Self {
        self.settings.executor.num_workers = Some(num_workers);
        self.settings.executor.batch_size = batch_size;
        self
    }

    pub fn without_collision(mut self) -> Self {
        self.settings.collision.enabled = false;
        self
    }
}

pub fn test_helper() -> TestHelper {
    TRACING.call_once(|| {
        tracing::subscriber::set_global_default(
            FmtSubscriber::builder()
                .with_max_level(tracing::Level::INFO)
                .finish(),
        )
        .unwrap();
    });

    TestHelper {
        settings: Settings::new(None).unwrap(),
    }
}

/// A fresh, per test path in the system temp directory.
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "spoofing-detector-{}-{name}",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
