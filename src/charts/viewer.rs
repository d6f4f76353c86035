//! Chart Viewer Module
//! Hands finished chart images to the system's default image viewer.

use super::ChartError;
use std::path::Path;
use tracing::{debug, info};

/// Shows rendered charts one after another, or does nothing when disabled.
pub struct ChartViewer {
    enabled: bool,
}

impl ChartViewer {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn show(&self, path: &Path) -> Result<(), ChartError> {
        if !self.enabled {
            debug!(path = %path.display(), "viewer disabled, chart left on disk");
            return Ok(());
        }
        open::that(path).map_err(|source| ChartError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "opened chart");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_viewer_does_not_touch_the_file() {
        let viewer = ChartViewer::new(false);
        assert!(viewer.show(Path::new("/nonexistent/chart.png")).is_ok());
    }
}
