use std::collections::{BTreeMap, BTreeSet};
use std::{error::Error, fmt, path::Path};

use genekg_store::models::{Gene, GeneRelation, Pathway, PathwayMembership};
use roxmltree::{Document, Node};

/// Options for parsing a KGML pathway document.
#[derive(Debug, Clone, Default)]
pub struct KgmlParseOptions {
    /// Disease label to attach to the pathway. When absent, the pathway
    /// `title` attribute is used as a free-text fallback.
    pub disease: Option<String>,
}

impl KgmlParseOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self { disease: None }
    }

    #[must_use]
    pub fn with_disease(mut self, disease: impl Into<String>) -> Self {
        self.disease = Some(disease.into());
        self
    }
}

/// Output from parsing a KGML pathway document.
///
/// Relation edges are already flattened: group entries referenced by KGML
/// relations are resolved to their constituent gene entries here, so the
/// output carries plain gene-to-gene edges.
#[derive(Debug, Clone)]
pub struct KgmlParseOutput {
    pub pathway: Pathway,
    pub genes: Vec<Gene>,
    pub memberships: Vec<PathwayMembership>,
    pub relations: Vec<GeneRelation>,
}

/// Error type for KGML parse failures.
#[derive(Debug)]
pub struct KgmlParseError {
    message: String,
}

impl KgmlParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for KgmlParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KGML parse error: {}", self.message)
    }
}

impl Error for KgmlParseError {}

impl From<roxmltree::Error> for KgmlParseError {
    fn from(err: roxmltree::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<std::io::Error> for KgmlParseError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<tokio::task::JoinError> for KgmlParseError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::new(err.to_string())
    }
}

/// Parser for KEGG Markup Language pathway documents.
pub struct KgmlParser;

impl KgmlParser {
    /// Parses a KGML document into a pathway, its genes, memberships, and
    /// flattened relation edges.
    ///
    /// Entries with no resolvable gene mapping (compound nodes, references to
    /// other pathway maps) are skipped. Relations that resolve to no gene
    /// pair are skipped as well.
    ///
    /// # Errors
    /// Returns `KgmlParseError` if the XML is invalid, the root element is
    /// not `pathway`, the pathway identifier is missing, the entry list is
    /// empty, or a relation lacks its required attributes.
    pub fn parse(xml: &str, options: &KgmlParseOptions) -> Result<KgmlParseOutput, KgmlParseError> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();
        if !root.has_tag_name("pathway") {
            return Err(KgmlParseError::new(format!(
                "expected <pathway> root element, found <{}>",
                root.tag_name().name()
            )));
        }

        let pathway_id = root
            .attribute("name")
            .map(strip_path_prefix)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| KgmlParseError::new("pathway name attribute is missing"))?
            .to_string();
        let title = root
            .attribute("title")
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let disease = options.disease.clone().or_else(|| title.clone());

        let pathway = Pathway {
            id: None,
            pathway_id: pathway_id.clone(),
            name: title,
            disease,
            org: root.attribute("org").map(str::to_string),
        };

        let entries: Vec<Node<'_, '_>> = root
            .children()
            .filter(|node| node.has_tag_name("entry"))
            .collect();
        if entries.is_empty() {
            return Err(KgmlParseError::new("pathway contains no entry elements"));
        }

        // Gene entries map to one or more KEGG gene ids; group entries are
        // kept aside so relations can be resolved through them.
        let mut entry_genes: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        let mut group_components: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        let mut gene_ids: BTreeSet<String> = BTreeSet::new();

        for entry in &entries {
            let Some(entry_id) = entry.attribute("id") else {
                continue;
            };
            match entry.attribute("type") {
                Some("gene") => {
                    let genes = split_gene_ids(entry.attribute("name").unwrap_or(""));
                    if genes.is_empty() {
                        continue;
                    }
                    gene_ids.extend(genes.iter().cloned());
                    entry_genes.insert(entry_id, genes);
                }
                Some("group") => {
                    let components: Vec<&str> = entry
                        .children()
                        .filter(|node| node.has_tag_name("component"))
                        .filter_map(|node| node.attribute("id"))
                        .collect();
                    if !components.is_empty() {
                        group_components.insert(entry_id, components);
                    }
                }
                // Compound nodes, map links, and other entry kinds carry no
                // gene mapping.
                _ => {}
            }
        }

        let genes: Vec<Gene> = gene_ids.iter().map(Gene::new).collect();
        let memberships: Vec<PathwayMembership> = gene_ids
            .iter()
            .map(|gene_id| PathwayMembership {
                id: None,
                gene_id: gene_id.clone(),
                pathway_id: pathway_id.clone(),
                entry_type: Some("gene".to_string()),
            })
            .collect();

        let relations =
            parse_relations(root, &pathway_id, &entry_genes, &group_components)?;

        Ok(KgmlParseOutput {
            pathway,
            genes,
            memberships,
            relations,
        })
    }

    /// Parses KGML asynchronously using a blocking task.
    ///
    /// # Errors
    /// Returns `KgmlParseError` if parsing fails or the task panics.
    pub async fn parse_async(
        xml: String,
        options: KgmlParseOptions,
    ) -> Result<KgmlParseOutput, KgmlParseError> {
        tokio::task::spawn_blocking(move || Self::parse(&xml, &options)).await?
    }

    /// Parses KGML from a file path asynchronously.
    ///
    /// # Errors
    /// Returns `KgmlParseError` if the file cannot be read or the document
    /// cannot be parsed.
    pub async fn parse_file(
        path: impl AsRef<Path>,
        options: KgmlParseOptions,
    ) -> Result<KgmlParseOutput, KgmlParseError> {
        let path = path.as_ref().to_path_buf();
        let xml = tokio::task::spawn_blocking(move || std::fs::read_to_string(path)).await??;
        Self::parse_async(xml, options).await
    }
}

fn parse_relations(
    root: Node<'_, '_>,
    pathway_id: &str,
    entry_genes: &BTreeMap<&str, Vec<String>>,
    group_components: &BTreeMap<&str, Vec<&str>>,
) -> Result<Vec<GeneRelation>, KgmlParseError> {
    let mut seen: BTreeSet<(String, String, String)> = BTreeSet::new();
    let mut relations = Vec::new();

    for relation in root.children().filter(|node| node.has_tag_name("relation")) {
        let entry1 = relation
            .attribute("entry1")
            .ok_or_else(|| KgmlParseError::new("relation is missing entry1"))?;
        let entry2 = relation
            .attribute("entry2")
            .ok_or_else(|| KgmlParseError::new("relation is missing entry2"))?;
        let relation_kind = relation
            .attribute("type")
            .ok_or_else(|| KgmlParseError::new("relation is missing a type attribute"))?;

        let sources = resolve_entry(entry1, entry_genes, group_components);
        let targets = resolve_entry(entry2, entry_genes, group_components);
        if sources.is_empty() || targets.is_empty() {
            continue;
        }

        let mut subtypes: Vec<String> = relation
            .children()
            .filter(|node| node.has_tag_name("subtype"))
            .filter_map(|node| node.attribute("name"))
            .map(str::to_string)
            .collect();
        if subtypes.is_empty() {
            subtypes.push(relation_kind.to_string());
        }

        for subtype in &subtypes {
            for source in &sources {
                for target in &targets {
                    if source == target {
                        continue;
                    }
                    let key = (source.clone(), target.clone(), subtype.clone());
                    if !seen.insert(key) {
                        continue;
                    }
                    relations.push(GeneRelation {
                        id: None,
                        source_gene_id: source.clone(),
                        target_gene_id: target.clone(),
                        relation_type: subtype.clone(),
                        pathway_id: Some(pathway_id.to_string()),
                    });
                }
            }
        }
    }

    Ok(relations)
}

/// Resolves a relation endpoint to the gene ids it stands for.
///
/// Group entries expand to the union of their component gene entries; entries
/// with no gene mapping resolve to nothing.
fn resolve_entry(
    entry_id: &str,
    entry_genes: &BTreeMap<&str, Vec<String>>,
    group_components: &BTreeMap<&str, Vec<&str>>,
) -> Vec<String> {
    if let Some(genes) = entry_genes.get(entry_id) {
        return genes.clone();
    }
    if let Some(components) = group_components.get(entry_id) {
        let mut genes: Vec<String> = Vec::new();
        for component in components {
            if let Some(component_genes) = entry_genes.get(*component) {
                for gene in component_genes {
                    if !genes.contains(gene) {
                        genes.push(gene.clone());
                    }
                }
            }
        }
        return genes;
    }
    Vec::new()
}

fn split_gene_ids(name: &str) -> Vec<String> {
    name.split_whitespace()
        .filter(|token| !token.is_empty() && *token != "undefined")
        .map(str::to_string)
        .collect()
}

fn strip_path_prefix(name: &str) -> &str {
    name.trim().strip_prefix("path:").unwrap_or_else(|| name.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATHWAY_XML: &str = r#"<?xml version="1.0"?>
<pathway name="path:hsa05010" org="hsa" number="05010" title="Alzheimer disease">
    <entry id="1" name="hsa:10213" type="gene"/>
    <entry id="2" name="hsa:5594 hsa:5595" type="gene"/>
    <entry id="3" name="cpd:C00027" type="compound"/>
    <entry id="4" name="path:hsa04210" type="map"/>
    <entry id="5" name="undefined" type="group">
        <component id="1"/>
        <component id="2"/>
    </entry>
    <relation entry1="1" entry2="2" type="PPrel">
        <subtype name="activation" value="--&gt;"/>
    </relation>
    <relation entry1="5" entry2="2" type="PPrel">
        <subtype name="binding/association" value="---"/>
    </relation>
    <relation entry1="3" entry2="1" type="PCrel"/>
</pathway>"#;

    #[test]
    fn parses_pathway_metadata() {
        let output = KgmlParser::parse(PATHWAY_XML, &KgmlParseOptions::new()).unwrap();
        assert_eq!(output.pathway.pathway_id, "hsa05010");
        assert_eq!(output.pathway.name.as_deref(), Some("Alzheimer disease"));
        assert_eq!(output.pathway.disease.as_deref(), Some("Alzheimer disease"));
        assert_eq!(output.pathway.org.as_deref(), Some("hsa"));
    }

    #[test]
    fn disease_override_wins_over_title() {
        let options = KgmlParseOptions::new().with_disease("Disease X");
        let output = KgmlParser::parse(PATHWAY_XML, &options).unwrap();
        assert_eq!(output.pathway.disease.as_deref(), Some("Disease X"));
    }

    #[test]
    fn splits_multi_gene_entries_and_skips_non_genes() {
        let output = KgmlParser::parse(PATHWAY_XML, &KgmlParseOptions::new()).unwrap();
        let ids: Vec<&str> = output.genes.iter().map(|g| g.gene_id.as_str()).collect();
        assert_eq!(ids, vec!["hsa:10213", "hsa:5594", "hsa:5595"]);
        assert_eq!(output.memberships.len(), 3);
        assert!(output
            .memberships
            .iter()
            .all(|m| m.pathway_id == "hsa05010"));
    }

    #[test]
    fn resolves_group_relations_to_member_genes() {
        let output = KgmlParser::parse(PATHWAY_XML, &KgmlParseOptions::new()).unwrap();
        // 1 -> 2 activation expands over the two genes of entry 2.
        assert!(output.relations.iter().any(|r| {
            r.source_gene_id == "hsa:10213"
                && r.target_gene_id == "hsa:5594"
                && r.relation_type == "activation"
        }));
        // The group entry expands to entries 1 and 2; self-edges from the
        // group's own members back onto themselves are dropped.
        assert!(output.relations.iter().any(|r| {
            r.source_gene_id == "hsa:10213"
                && r.target_gene_id == "hsa:5595"
                && r.relation_type == "binding/association"
        }));
        assert!(output
            .relations
            .iter()
            .all(|r| r.source_gene_id != r.target_gene_id));
        // The compound relation endpoint resolves to no gene and is skipped.
        assert!(output
            .relations
            .iter()
            .all(|r| r.relation_type != "PCrel"));
    }

    #[test]
    fn rejects_document_without_entries() {
        let xml = r#"<pathway name="path:hsa00001" title="Empty"></pathway>"#;
        let err = KgmlParser::parse(xml, &KgmlParseOptions::new()).unwrap_err();
        assert!(err.to_string().contains("no entry elements"));
    }

    #[test]
    fn rejects_wrong_root_element() {
        let xml = "<notpathway></notpathway>";
        assert!(KgmlParser::parse(xml, &KgmlParseOptions::new()).is_err());
    }

    #[test]
    fn rejects_relation_missing_required_attributes() {
        let xml = r#"<pathway name="path:hsa00002" title="Broken">
            <entry id="1" name="hsa:1" type="gene"/>
            <relation entry1="1" type="PPrel"/>
        </pathway>"#;
        let err = KgmlParser::parse(xml, &KgmlParseOptions::new()).unwrap_err();
        assert!(err.to_string().contains("entry2"));
    }
}
