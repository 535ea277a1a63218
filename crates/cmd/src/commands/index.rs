use crate::commands::{Finished, open_bucket};
use crate::config::{Pipeline, Settings};
use anyhow::{Context, Result};
use objstore::{ObjectStore, json_objects};
use solr::{HttpSolrApi, IndexReport, Indexer, Provisioner, SolrApi, SolrConfig};
use std::io::Write;

/// Provision the collection, then index every JSON object in the bucket.
pub fn index_command(settings: &Settings, out: &mut dyn Write) -> Result<Finished> {
    settings.require(Pipeline::Index)?;

    let store = open_bucket(&settings.s3).context("Failed to open the source bucket")?;
    let api = HttpSolrApi::new(&settings.solr).context("Failed to set up the Solr client")?;
    let report = index_bucket(&store, &api, &settings.solr)?;

    writeln!(
        out,
        "Indexed {} documents into {} ({} invalid JSON, {} rejected)",
        report.indexed, settings.solr.collection, report.invalid, report.failed
    )?;
    Ok(Finished::Clean)
}

pub fn index_bucket<S, A>(store: &S, api: &A, config: &SolrConfig) -> Result<IndexReport>
where
    S: ObjectStore,
    A: SolrApi,
{
    Provisioner::new(api, config)
        .ensure()
        .with_context(|| format!("Failed to provision collection {}", config.collection))?;

    let report = Indexer::new(api, config.collection.clone())
        .index_all(json_objects(store))
        .with_context(|| format!("Indexing bucket {} failed", store.name()))?;
    Ok(report)
}
