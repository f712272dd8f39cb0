//! End-to-end ingestion and query tests against the in-memory engine.

use genekg_core::control::GenekgControlPlane;
use genekg_core::parsers::{GafSource, KgmlParseOptions};
use genekg_core::store::SurrealGeneStore;
use genekg_store::schema::{
    NAMESPACE_MOLECULAR_FUNCTION,
    TABLE_GENE,
    TABLE_GENE_GO,
    TABLE_GENE_RELATION,
    TABLE_GO_TERM,
    TABLE_PATHWAY,
    TABLE_PATHWAY_MEMBERSHIP,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn plane(db_name: &str) -> GenekgControlPlane<Db> {
    let db = Surreal::new::<Mem>(()).await.expect("in-memory surrealdb");
    db.use_ns("genekg")
        .use_db(db_name)
        .await
        .expect("namespace selection");
    let plane = GenekgControlPlane::new(SurrealGeneStore::new(db));
    plane.define_schema().await.expect("schema setup");
    plane
}

fn pathway_xml(pathway_id: &str, title: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<pathway name="path:{pathway_id}" org="hsa" title="{title}">
{body}
</pathway>"#
    )
}

fn gaf_line(symbol: &str, go_id: &str, aspect: &str) -> String {
    let mut columns = vec![""; 17];
    columns[0] = "UniProtKB";
    columns[1] = "A0A024RBG1";
    columns[2] = symbol;
    columns[3] = "enables";
    columns[4] = go_id;
    columns[5] = "GO_REF:0000043";
    columns[6] = "IEA";
    columns[8] = aspect;
    columns[12] = "taxon:9606";
    columns[13] = "20240101";
    columns[14] = "UniProt";
    columns.join("\t")
}

fn write_gaf(name: &str, body: &str) -> GafSource {
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, body).expect("write GAF fixture");
    GafSource::new(path)
}

const DISEASE_X_XML_BODY: &str = r#"    <entry id="1" name="hsa:10213" type="gene"/>
    <entry id="2" name="hsa:5594" type="gene"/>
    <relation entry1="1" entry2="2" type="PPrel">
        <subtype name="activation" value="--&gt;"/>
    </relation>"#;

#[tokio::test]
async fn kgml_ingestion_is_idempotent() {
    let plane = plane("kgml_idempotent").await;
    let xml = pathway_xml("hsa05010", "Alzheimer disease", DISEASE_X_XML_BODY);

    let first = plane
        .ingest_kgml(xml.clone(), KgmlParseOptions::new())
        .await
        .unwrap();
    assert_eq!(first.pathway_id, "hsa05010");
    assert_eq!(first.gene_count, 2);
    assert_eq!(first.relation_count, 1);

    let stats_before = plane.store_stats().await.unwrap();
    plane
        .ingest_kgml(xml, KgmlParseOptions::new())
        .await
        .unwrap();
    let stats_after = plane.store_stats().await.unwrap();

    assert_eq!(stats_before.genes, stats_after.genes);
    assert_eq!(stats_before.pathways, stats_after.pathways);
    assert_eq!(
        stats_before.pathway_memberships,
        stats_after.pathway_memberships
    );
    assert_eq!(stats_before.gene_relations, stats_after.gene_relations);
    assert_eq!(stats_after.genes, 2);
    assert_eq!(stats_after.pathways, 1);
}

#[tokio::test]
async fn gene_shared_across_pathways_is_stored_once() {
    let plane = plane("shared_gene").await;
    let body = r#"    <entry id="1" name="hsa:10213" type="gene"/>"#;
    plane
        .ingest_kgml(
            pathway_xml("hsa05010", "Alzheimer disease", body),
            KgmlParseOptions::new(),
        )
        .await
        .unwrap();
    plane
        .ingest_kgml(
            pathway_xml("hsa05012", "Parkinson disease", body),
            KgmlParseOptions::new(),
        )
        .await
        .unwrap();

    assert_eq!(plane.store().count_table(TABLE_GENE).await.unwrap(), 1);
    assert_eq!(plane.store().count_table(TABLE_PATHWAY).await.unwrap(), 2);
    assert_eq!(
        plane
            .store()
            .count_table(TABLE_PATHWAY_MEMBERSHIP)
            .await
            .unwrap(),
        2
    );
}

#[tokio::test]
async fn disease_lookup_follows_pathway_membership() {
    let plane = plane("diseases").await;
    let xml = pathway_xml("hsa05010", "Alzheimer disease", DISEASE_X_XML_BODY);
    let options = KgmlParseOptions::new().with_disease("Disease X");
    plane.ingest_kgml(xml, options).await.unwrap();

    let result = plane.gene_diseases("hsa:10213").await.unwrap();
    assert!(result.known_gene);
    assert_eq!(result.diseases, vec!["Disease X".to_string()]);

    // Two pathways with the same label still yield one disease entry.
    let body = r#"    <entry id="1" name="hsa:10213" type="gene"/>"#;
    plane
        .ingest_kgml(
            pathway_xml("hsa05012", "ignored title", body),
            KgmlParseOptions::new().with_disease("Disease X"),
        )
        .await
        .unwrap();
    let result = plane.gene_diseases("hsa:10213").await.unwrap();
    assert_eq!(result.diseases.len(), 1);
}

#[tokio::test]
async fn gaf_ingestion_links_genes_to_go_terms() {
    let plane = plane("gaf").await;
    let body = format!(
        "!gaf-version: 2.2\n{}\n{}\nshort\tline\n",
        gaf_line("NUDT4B", "GO:0003723", "F"),
        gaf_line("NUDT4B", "GO:0003723", "F"),
    );
    let source = write_gaf("genekg-pipeline-gaf.gaf", &body);

    let report = plane.ingest_gaf(source.clone()).await.unwrap();
    assert_eq!(report.record_count, 2);
    assert_eq!(report.association_count, 1);
    assert_eq!(report.skipped_line_count, 1);

    // Replaying the file changes nothing.
    plane.ingest_gaf(source.clone()).await.unwrap();
    assert_eq!(plane.store().count_table(TABLE_GO_TERM).await.unwrap(), 1);
    assert_eq!(plane.store().count_table(TABLE_GENE_GO).await.unwrap(), 1);

    let result = plane.gene_go_terms("NUDT4B").await.unwrap();
    assert!(result.known_gene);
    assert_eq!(result.go_terms.len(), 1);
    assert_eq!(result.go_terms[0].id, "GO:0003723");
    assert_eq!(
        result.go_terms[0].namespace.as_deref(),
        Some(NAMESPACE_MOLECULAR_FUNCTION)
    );

    let _ = std::fs::remove_file(source.path());
}

#[tokio::test]
async fn gene_seen_in_both_sources_is_stored_once() {
    let plane = plane("cross_source").await;
    let body = r#"    <entry id="1" name="NUDT4B" type="gene"/>"#;
    plane
        .ingest_kgml(
            pathway_xml("hsa05010", "Alzheimer disease", body),
            KgmlParseOptions::new(),
        )
        .await
        .unwrap();

    let gaf_body = format!("!gaf-version: 2.2\n{}\n", gaf_line("NUDT4B", "GO:0003723", "F"));
    let source = write_gaf("genekg-pipeline-cross-source.gaf", &gaf_body);
    plane.ingest_gaf(source.clone()).await.unwrap();

    assert_eq!(plane.store().count_table(TABLE_GENE).await.unwrap(), 1);
    // Both views of the gene resolve through the single row.
    assert!(!plane.gene_diseases("NUDT4B").await.unwrap().diseases.is_empty());
    assert!(!plane.gene_go_terms("NUDT4B").await.unwrap().go_terms.is_empty());

    let _ = std::fs::remove_file(source.path());
}

#[tokio::test]
async fn downstream_traversal_respects_depth() {
    let plane = plane("depth").await;
    let body = r#"    <entry id="1" name="hsa:1" type="gene"/>
    <entry id="2" name="hsa:2" type="gene"/>
    <entry id="3" name="hsa:3" type="gene"/>
    <relation entry1="1" entry2="2" type="PPrel">
        <subtype name="activation" value="--&gt;"/>
    </relation>
    <relation entry1="2" entry2="3" type="PPrel">
        <subtype name="phosphorylation" value="+p"/>
    </relation>"#;
    plane
        .ingest_kgml(
            pathway_xml("hsa00010", "Chain", body),
            KgmlParseOptions::new(),
        )
        .await
        .unwrap();

    let shallow = plane.downstream_analysis("hsa:1", 1).await.unwrap();
    assert_eq!(shallow.relations.len(), 1);
    assert_eq!(shallow.relations[0].gene_id, "hsa:2");
    assert_eq!(shallow.relations[0].path_depth, 1);

    let deep = plane.downstream_analysis("hsa:1", 2).await.unwrap();
    assert_eq!(deep.relations.len(), 2);
    assert!(deep
        .relations
        .iter()
        .any(|r| r.gene_id == "hsa:3" && r.path_depth == 2));
}

#[tokio::test]
async fn reachable_gene_is_reported_once() {
    let plane = plane("diamond").await;
    // A diamond: hsa:1 -> hsa:2, hsa:1 -> hsa:3, hsa:2 -> hsa:3.
    let body = r#"    <entry id="1" name="hsa:1" type="gene"/>
    <entry id="2" name="hsa:2" type="gene"/>
    <entry id="3" name="hsa:3" type="gene"/>
    <relation entry1="1" entry2="2" type="PPrel">
        <subtype name="activation" value="--&gt;"/>
    </relation>
    <relation entry1="1" entry2="3" type="PPrel">
        <subtype name="activation" value="--&gt;"/>
    </relation>
    <relation entry1="2" entry2="3" type="PPrel">
        <subtype name="inhibition" value="--|"/>
    </relation>"#;
    plane
        .ingest_kgml(
            pathway_xml("hsa00030", "Diamond", body),
            KgmlParseOptions::new(),
        )
        .await
        .unwrap();

    let result = plane.downstream_analysis("hsa:1", 2).await.unwrap();
    // hsa:3 is reached directly at depth 1; the longer path through hsa:2
    // does not report it a second time.
    assert_eq!(result.relations.len(), 2);
    let reached: Vec<&str> = result
        .relations
        .iter()
        .map(|r| r.gene_id.as_str())
        .collect();
    assert_eq!(reached.len(), 2);
    assert!(reached.contains(&"hsa:2"));
    assert!(reached.contains(&"hsa:3"));
    assert!(result.relations.iter().all(|r| r.path_depth == 1));
}

#[tokio::test]
async fn downstream_traversal_terminates_on_cycles() {
    let plane = plane("cycle").await;
    let body = r#"    <entry id="1" name="hsa:1" type="gene"/>
    <entry id="2" name="hsa:2" type="gene"/>
    <relation entry1="1" entry2="2" type="PPrel">
        <subtype name="activation" value="--&gt;"/>
    </relation>
    <relation entry1="2" entry2="1" type="PPrel">
        <subtype name="inhibition" value="--|"/>
    </relation>"#;
    plane
        .ingest_kgml(
            pathway_xml("hsa00020", "Loop", body),
            KgmlParseOptions::new(),
        )
        .await
        .unwrap();

    let result = plane.downstream_analysis("hsa:1", 10).await.unwrap();
    // Only hsa:2 is reachable; the back-edge to the seed is not reported.
    assert_eq!(result.relations.len(), 1);
    assert_eq!(result.relations[0].gene_id, "hsa:2");
    assert!(result.relations.iter().all(|r| r.gene_id != "hsa:1"));
}

#[tokio::test]
async fn zero_depth_is_treated_as_one() {
    let plane = plane("zero_depth").await;
    let xml = pathway_xml("hsa05010", "Alzheimer disease", DISEASE_X_XML_BODY);
    plane
        .ingest_kgml(xml, KgmlParseOptions::new())
        .await
        .unwrap();

    let result = plane.downstream_analysis("hsa:10213", 0).await.unwrap();
    assert_eq!(result.depth, 1);
    assert_eq!(result.relations.len(), 1);
}

#[tokio::test]
async fn unknown_gene_yields_empty_results() {
    let plane = plane("unknown").await;

    let diseases = plane.gene_diseases("hsa:404").await.unwrap();
    assert!(!diseases.known_gene);
    assert!(diseases.diseases.is_empty());

    let go_terms = plane.gene_go_terms("hsa:404").await.unwrap();
    assert!(!go_terms.known_gene);
    assert!(go_terms.go_terms.is_empty());

    let downstream = plane.downstream_analysis("hsa:404", 2).await.unwrap();
    assert!(!downstream.known_gene);
    assert!(downstream.relations.is_empty());
}

#[tokio::test]
async fn query_results_serialize_with_contract_keys() {
    let plane = plane("contract").await;
    let xml = pathway_xml("hsa05010", "Alzheimer disease", DISEASE_X_XML_BODY);
    plane
        .ingest_kgml(xml, KgmlParseOptions::new())
        .await
        .unwrap();
    let gaf_body = format!("!gaf-version: 2.2\n{}\n", gaf_line("NUDT4B", "GO:0003723", "F"));
    let source = write_gaf("genekg-pipeline-contract.gaf", &gaf_body);
    plane.ingest_gaf(source.clone()).await.unwrap();

    let go = plane.gene_go_terms("NUDT4B").await.unwrap();
    let value = serde_json::to_value(&go).unwrap();
    let term = &value["go_terms"][0];
    assert!(term.get("id").is_some());
    assert!(term.get("go_id").is_none());

    let downstream = plane.downstream_analysis("hsa:10213", 1).await.unwrap();
    let value = serde_json::to_value(&downstream).unwrap();
    let relation = &value["relations"][0];
    assert!(relation.get("gene_id").is_some());
    assert!(relation.get("relation_type").is_some());
    assert!(relation.get("path_depth").is_some());
    assert!(relation.get("target_gene_id").is_none());
    assert!(relation.get("depth").is_none());

    let _ = std::fs::remove_file(source.path());
}

#[tokio::test]
async fn directory_batch_skips_bad_files_and_continues() {
    let plane = plane("batch").await;
    let dir = std::env::temp_dir().join("genekg-pipeline-kgml-batch");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("hsa05010.xml"),
        pathway_xml("hsa05010", "Alzheimer disease", DISEASE_X_XML_BODY),
    )
    .unwrap();
    std::fs::write(dir.join("broken.xml"), "<notpathway/>").unwrap();
    std::fs::write(dir.join("notes.txt"), "not a pathway").unwrap();

    let report = plane.ingest_kgml_dir(&dir).await.unwrap();
    assert_eq!(report.ingested.len(), 1);
    assert_eq!(report.ingested[0].pathway_id, "hsa05010");
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].path.ends_with("broken.xml"));

    assert_eq!(
        plane.store().count_table(TABLE_GENE_RELATION).await.unwrap(),
        1
    );

    let _ = std::fs::remove_dir_all(&dir);
}
