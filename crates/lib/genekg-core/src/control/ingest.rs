use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use genekg_store::models::{Gene, GeneGoAssociation, GoTerm};
use genekg_store::schema::aspect_to_namespace;
use serde::{Deserialize, Serialize};
use surrealdb::Connection;

use super::{ControlResult, GenekgControlPlane};
use crate::parsers::{GafSource, KgmlParseOptions, KgmlParser};

/// Report for one ingested KGML document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KgmlIngestReport {
    pub pathway_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disease: Option<String>,
    pub gene_count: usize,
    pub membership_count: usize,
    pub relation_count: usize,
    pub ingested_at: DateTime<Utc>,
}

/// A KGML file that failed to ingest during a directory batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KgmlFileFailure {
    pub path: String,
    pub error: String,
}

/// Report for a directory batch of KGML documents.
///
/// Files that fail to parse are recorded here rather than aborting the batch;
/// each file commits independently, so a bad document never rolls back its
/// neighbors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KgmlBatchReport {
    pub ingested: Vec<KgmlIngestReport>,
    pub failed: Vec<KgmlFileFailure>,
}

/// Report for one ingested GAF file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GafIngestReport {
    pub record_count: usize,
    pub gene_count: usize,
    pub term_count: usize,
    pub association_count: usize,
    pub skipped_line_count: usize,
    pub ingested_at: DateTime<Utc>,
}

impl<C: Connection> GenekgControlPlane<C> {
    /// Parses one KGML document and applies it to the store atomically.
    ///
    /// # Errors
    /// Returns `ControlError` if parsing or the store transaction fails.
    pub async fn ingest_kgml(
        &self,
        xml: String,
        options: KgmlParseOptions,
    ) -> ControlResult<KgmlIngestReport> {
        let output = KgmlParser::parse_async(xml, options).await?;
        let report = KgmlIngestReport {
            pathway_id: output.pathway.pathway_id.clone(),
            disease: output.pathway.disease.clone(),
            gene_count: output.genes.len(),
            membership_count: output.memberships.len(),
            relation_count: output.relations.len(),
            ingested_at: Utc::now(),
        };
        self.store()
            .apply_kgml(
                output.pathway,
                output.genes,
                output.memberships,
                output.relations,
            )
            .await?;
        tracing::info!(
            pathway_id = %report.pathway_id,
            genes = report.gene_count,
            relations = report.relation_count,
            "ingested KGML pathway"
        );
        Ok(report)
    }

    /// Parses a KGML file from disk and applies it to the store.
    ///
    /// # Errors
    /// Returns `ControlError` if reading, parsing, or the store transaction
    /// fails.
    pub async fn ingest_kgml_file(
        &self,
        path: impl AsRef<Path>,
        options: KgmlParseOptions,
    ) -> ControlResult<KgmlIngestReport> {
        let output = KgmlParser::parse_file(path, options).await?;
        let report = KgmlIngestReport {
            pathway_id: output.pathway.pathway_id.clone(),
            disease: output.pathway.disease.clone(),
            gene_count: output.genes.len(),
            membership_count: output.memberships.len(),
            relation_count: output.relations.len(),
            ingested_at: Utc::now(),
        };
        self.store()
            .apply_kgml(
                output.pathway,
                output.genes,
                output.memberships,
                output.relations,
            )
            .await?;
        tracing::info!(
            pathway_id = %report.pathway_id,
            genes = report.gene_count,
            relations = report.relation_count,
            "ingested KGML pathway"
        );
        Ok(report)
    }

    /// Ingests every `.xml` and `.kgml` file under a directory.
    ///
    /// Files are processed in path order. Parse failures are logged and
    /// collected per file; the batch continues.
    ///
    /// # Errors
    /// Returns `ControlError` if the directory cannot be read or a store
    /// transaction fails.
    pub async fn ingest_kgml_dir(&self, dir: impl AsRef<Path>) -> ControlResult<KgmlBatchReport> {
        let mut paths: Vec<PathBuf> = Vec::new();
        let mut entries = tokio::fs::read_dir(dir.as_ref()).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let extension = path.extension().and_then(|ext| ext.to_str());
            if matches!(extension, Some("xml" | "kgml")) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut report = KgmlBatchReport {
            ingested: Vec::new(),
            failed: Vec::new(),
        };
        for path in paths {
            match self
                .ingest_kgml_file(&path, KgmlParseOptions::new())
                .await
            {
                Ok(file_report) => report.ingested.push(file_report),
                Err(super::ControlError::Store(err)) => return Err(err.into()),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping KGML file");
                    report.failed.push(KgmlFileFailure {
                        path: path.display().to_string(),
                        error: err.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }

    /// Streams a GAF file into the store as one transaction.
    ///
    /// Records are deduplicated in memory before the write: one GO term per
    /// identifier, one gene per symbol, one association per pair. Malformed
    /// lines are skipped and counted, never fatal.
    ///
    /// # Errors
    /// Returns `ControlError` if the file cannot be read or the store
    /// transaction fails.
    pub async fn ingest_gaf(&self, source: GafSource) -> ControlResult<GafIngestReport> {
        let collected = tokio::task::spawn_blocking(move || collect_gaf(&source)).await??;
        let report = GafIngestReport {
            record_count: collected.record_count,
            gene_count: collected.genes.len(),
            term_count: collected.terms.len(),
            association_count: collected.associations.len(),
            skipped_line_count: collected.skipped,
            ingested_at: Utc::now(),
        };

        let terms: Vec<GoTerm> = collected.terms.into_values().collect();
        let genes: Vec<Gene> = collected.genes.into_iter().map(Gene::new).collect();
        let associations: Vec<GeneGoAssociation> = collected
            .associations
            .into_iter()
            .map(|(gene_id, go_id)| GeneGoAssociation {
                id: None,
                gene_id,
                go_id,
            })
            .collect();
        self.store().apply_gaf(terms, genes, associations).await?;

        tracing::info!(
            records = report.record_count,
            associations = report.association_count,
            skipped = report.skipped_line_count,
            "ingested GAF file"
        );
        Ok(report)
    }
}

struct CollectedGaf {
    record_count: usize,
    skipped: usize,
    terms: BTreeMap<String, GoTerm>,
    genes: BTreeSet<String>,
    associations: BTreeSet<(String, String)>,
}

fn collect_gaf(source: &GafSource) -> std::io::Result<CollectedGaf> {
    let mut records = source.records()?;
    let mut collected = CollectedGaf {
        record_count: 0,
        skipped: 0,
        terms: BTreeMap::new(),
        genes: BTreeSet::new(),
        associations: BTreeSet::new(),
    };
    for record in records.by_ref() {
        let record = record?;
        collected.record_count += 1;
        collected
            .terms
            .entry(record.go_id.clone())
            .or_insert_with(|| GoTerm {
                id: None,
                go_id: record.go_id.clone(),
                namespace: Some(aspect_to_namespace(&record.aspect)),
                description: None,
            });
        collected.genes.insert(record.symbol.clone());
        collected
            .associations
            .insert((record.symbol, record.go_id));
    }
    collected.skipped = records.skipped();
    Ok(collected)
}
