use rayon::prelude::*;

use crate::{
    assets::source::{ImageRef, ImageSource},
    config::settings::Settings,
    foundation::error::{TemplatrError, TemplatrResult},
    render::pipeline::{Thumbnail, encode_thumbnail},
};

/// Renders independent thumbnails in parallel.
///
/// The outer error only reports a pool that could not be built; each pair gets its own result
/// in input order.
#[tracing::instrument(skip(source, pairs, settings), fields(count = pairs.len()))]
pub fn render_thumbnails(
    source: &dyn ImageSource,
    pairs: &[(ImageRef, ImageRef)],
    settings: &Settings,
) -> TemplatrResult<Vec<TemplatrResult<Thumbnail>>> {
    let pool = build_thread_pool(settings.threads)?;
    Ok(pool.install(|| {
        pairs
            .par_iter()
            .map(|(background, foreground)| {
                encode_thumbnail(source, background, foreground, settings)
            })
            .collect()
    }))
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> TemplatrResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(TemplatrError::validation("'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| TemplatrError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/batch.rs"]
mod tests;
