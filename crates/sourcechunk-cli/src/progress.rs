//! Per-file progress line on stderr

use sourcechunk_core::{FileStage, PipelineProgress};
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Progress reporter fed by the pipeline's progress callback
#[derive(Default)]
pub struct ProgressReporter {
    failed: AtomicUsize,
    processed: AtomicUsize,
    total: AtomicUsize,
}

impl ProgressReporter {
    pub fn update(&self, progress: &PipelineProgress<'_>) {
        self.processed.store(progress.completed, Ordering::Relaxed);
        self.total.store(progress.total, Ordering::Relaxed);
        if progress.stage == FileStage::Failed {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        self.set_message(&format!(
            "[{}/{}] {}",
            progress.completed, progress.total, progress.path
        ));
    }

    pub fn set_message(&self, msg: &str) {
        eprint!("\r{:<60.60}", msg);
        io::stderr().flush().ok();
    }

    pub fn finish(&self) {
        let processed = self.processed.load(Ordering::Relaxed);
        let total = self.total.load(Ordering::Relaxed);
        match self.failed.load(Ordering::Relaxed) {
            0 => eprintln!("\r{:<60}", format!("Done ({}/{})", processed, total)),
            failed => eprintln!(
                "\r{:<60}",
                format!("Done ({}/{}, {} unreadable)", processed, total, failed)
            ),
        }
    }
}
