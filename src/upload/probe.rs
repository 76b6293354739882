//! Metadata extraction from a validated artifact on disk.

use std::path::Path;

use lofty::file::AudioFile;
use lofty::probe::Probe;

/// Authoritative byte size of the artifact, taken from the filesystem rather
/// than any client-claimed length.
pub async fn file_size(path: &Path) -> std::io::Result<u64> {
    let meta = tokio::fs::metadata(path).await?;
    Ok(meta.len())
}

/// Best-effort audio duration in seconds. Containers lofty cannot parse yield
/// None; extraction failure must never abort an upload. Parsing is synchronous
/// file I/O, so it runs on the blocking pool rather than the runtime thread.
pub async fn audio_duration_secs(path: &Path) -> Option<f64> {
    let path = path.to_path_buf();
    let parse = tokio::task::spawn_blocking(move || {
        match Probe::open(&path).and_then(|probe| probe.read()) {
            Ok(tagged) => {
                let secs = tagged.properties().duration().as_secs_f64();
                (secs > 0.0).then_some(secs)
            }
            Err(e) => {
                tracing::debug!(file = %path.display(), error = %e, "No readable audio duration");
                None
            }
        }
    });

    match parse.await {
        Ok(duration) => duration,
        Err(e) => {
            tracing::debug!(error = %e, "Duration probe task did not complete");
            None
        }
    }
}
