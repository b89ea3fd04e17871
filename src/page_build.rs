use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::config::Config;
use crate::feed_source::FeedSource;
use crate::loader::{Clock, FlatLoader, GroupedLoader, LoadReport};
use crate::page::Page;

/// Runs every loader against `source` and returns the finished page.
///
/// Fetches are issued together on a bounded pool; page writes then happen on
/// the calling thread in declared order (grouped feed first, then leagues), so
/// the shared flat label ends up with the last league's render time.
pub fn build_page(
    config: &Config,
    source: &dyn FeedSource,
    clock: &dyn Clock,
) -> (Page, Vec<LoadReport>) {
    let mut page = Page::new(config.title.clone(), &config.leagues);
    let grouped = GroupedLoader::new(source, config.display_zone);
    let flat = FlatLoader::new(source, clock);

    GroupedLoader::show_placeholder(&mut page.soccer_container);

    let pool = build_fetch_pool(config.fetch_parallelism);
    let (grouped_fetch, flat_fetches) = with_fetch_pool(&pool, || {
        rayon::join(
            || grouped.fetch(),
            || {
                config
                    .leagues
                    .par_iter()
                    .map(|slot| flat.fetch(&slot.league))
                    .collect::<Vec<_>>()
            },
        )
    });

    let mut reports = Vec::with_capacity(1 + flat_fetches.len());
    reports.push(grouped.apply(
        grouped_fetch,
        &mut page.soccer_container,
        &mut page.soccer_updated,
    ));
    for (section, fetched) in page.leagues.iter_mut().zip(flat_fetches) {
        reports.push(flat.apply(
            &section.league,
            fetched,
            &mut section.container,
            &mut page.flat_updated,
        ));
    }

    (page, reports)
}

/// Writes the page through a temp file so readers never see half a document.
pub fn write_page(path: &Path, page: &Page) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let tmp = path.with_extension("html.tmp");
    if let Err(err) = fs::write(&tmp, page.to_html()) {
        let _ = fs::remove_file(&tmp);
        return Err(err).context("write page");
    }
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err).context("swap page");
    }
    Ok(())
}

fn build_fetch_pool(threads: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .ok()
}

fn with_fetch_pool<T>(pool: &Option<rayon::ThreadPool>, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    if let Some(pool) = pool.as_ref() {
        pool.install(action)
    } else {
        action()
    }
}
