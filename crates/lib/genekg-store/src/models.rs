use serde::{Deserialize, Serialize};

/// A gene keyed by its stable external identifier.
///
/// Genes come from both KGML entries (KEGG ids such as `hsa:10213`) and GAF
/// rows (database object symbols such as `NUDT4B`). Rows are write-once and
/// deduplicated by identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Gene {
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub gene_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl Gene {
    #[must_use]
    pub fn new(gene_id: impl Into<String>) -> Self {
        Self {
            id: None,
            gene_id: gene_id.into(),
            symbol: None,
        }
    }
}

/// A KEGG pathway with its optional disease label.
///
/// The disease label is free text taken from pathway metadata or supplied by
/// the caller; no controlled vocabulary is assumed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pathway {
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub pathway_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disease: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
}

/// Membership of a gene in a pathway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathwayMembership {
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub gene_id: String,
    pub pathway_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<String>,
}

/// A Gene Ontology term keyed by its GO identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoTerm {
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub go_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Association between a gene and a GO term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneGoAssociation {
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub gene_id: String,
    pub go_id: String,
}

/// A directed interaction edge between two genes.
///
/// Edges are flattened at ingestion time: KGML relations that reference group
/// entries are resolved to their constituent genes before storage, so the
/// stored graph carries no group indirection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneRelation {
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source_gene_id: String,
    pub target_gene_id: String,
    pub relation_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pathway_id: Option<String>,
}
