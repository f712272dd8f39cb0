use std::collections::HashSet;

use genekg_store::models::GoTerm;
use genekg_store::schema::{
    TABLE_GENE,
    TABLE_GENE_GO,
    TABLE_GENE_RELATION,
    TABLE_GO_TERM,
    TABLE_PATHWAY,
    TABLE_PATHWAY_MEMBERSHIP,
};
use serde::{Deserialize, Serialize};
use surrealdb::Connection;

use super::{ControlResult, GenekgControlPlane};

/// Diseases linked to a gene through its pathway memberships.
///
/// An unknown gene is a valid result, not an error: `known_gene` is false and
/// the disease list is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseQueryResult {
    pub gene_id: String,
    pub known_gene: bool,
    pub diseases: Vec<String>,
}

/// GO terms associated with a gene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoTermQueryResult {
    pub gene_id: String,
    pub known_gene: bool,
    pub go_terms: Vec<GoTermSummary>,
}

/// One GO term in a query result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoTermSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<GoTerm> for GoTermSummary {
    fn from(term: GoTerm) -> Self {
        Self {
            id: term.go_id,
            namespace: term.namespace,
            description: term.description,
        }
    }
}

/// One gene reached during downstream traversal, with the relation and the
/// depth used to reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownstreamRelation {
    pub gene_id: String,
    pub relation_type: String,
    pub path_depth: usize,
    pub source_gene_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pathway_id: Option<String>,
}

/// Downstream interaction edges reachable from a gene within a depth bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownstreamQueryResult {
    pub gene_id: String,
    pub known_gene: bool,
    pub depth: usize,
    pub relations: Vec<DownstreamRelation>,
}

/// Row counts for the six store tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub genes: usize,
    pub pathways: usize,
    pub pathway_memberships: usize,
    pub go_terms: usize,
    pub gene_go_associations: usize,
    pub gene_relations: usize,
}

impl<C: Connection> GenekgControlPlane<C> {
    /// Lists the distinct disease labels linked to a gene.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn gene_diseases(&self, gene_id: &str) -> ControlResult<DiseaseQueryResult> {
        let known_gene = self.store().get_gene(gene_id).await?.is_some();
        let diseases = if known_gene {
            self.store().list_diseases_for_gene(gene_id).await?
        } else {
            Vec::new()
        };
        Ok(DiseaseQueryResult {
            gene_id: gene_id.to_string(),
            known_gene,
            diseases,
        })
    }

    /// Lists the GO terms associated with a gene.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn gene_go_terms(&self, gene_id: &str) -> ControlResult<GoTermQueryResult> {
        let known_gene = self.store().get_gene(gene_id).await?.is_some();
        let go_terms = if known_gene {
            self.store()
                .list_go_terms_for_gene(gene_id)
                .await?
                .into_iter()
                .map(GoTermSummary::from)
                .collect()
        } else {
            Vec::new()
        };
        Ok(GoTermQueryResult {
            gene_id: gene_id.to_string(),
            known_gene,
            go_terms,
        })
    }

    /// Walks the interaction graph breadth-first from a gene, up to `depth`
    /// levels of expansion.
    ///
    /// Each reachable gene is reported at most once, with the relation that
    /// first reached it; the seed gene is never reported as its own
    /// neighbor, so cyclic graphs terminate. A depth of zero is treated as
    /// one.
    ///
    /// # Errors
    /// Returns `ControlError` if a store query fails.
    pub async fn downstream_analysis(
        &self,
        gene_id: &str,
        depth: usize,
    ) -> ControlResult<DownstreamQueryResult> {
        let depth = depth.max(1);
        let known_gene = self.store().get_gene(gene_id).await?.is_some();

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(gene_id.to_string());
        let mut frontier = vec![gene_id.to_string()];
        let mut relations = Vec::new();

        for level in 1..=depth {
            let mut next_frontier = Vec::new();
            for source in &frontier {
                for edge in self.store().list_relations_from(source).await? {
                    // Genes already reached on a shorter path are not
                    // reported again.
                    if !visited.insert(edge.target_gene_id.clone()) {
                        continue;
                    }
                    next_frontier.push(edge.target_gene_id.clone());
                    relations.push(DownstreamRelation {
                        gene_id: edge.target_gene_id,
                        relation_type: edge.relation_type,
                        path_depth: level,
                        source_gene_id: edge.source_gene_id,
                        pathway_id: edge.pathway_id,
                    });
                }
            }
            if next_frontier.is_empty() {
                break;
            }
            frontier = next_frontier;
        }

        Ok(DownstreamQueryResult {
            gene_id: gene_id.to_string(),
            known_gene,
            depth,
            relations,
        })
    }

    /// Reports row counts for every table in the store.
    ///
    /// # Errors
    /// Returns `ControlError` if a store query fails.
    pub async fn store_stats(&self) -> ControlResult<StoreStats> {
        Ok(StoreStats {
            genes: self.store().count_table(TABLE_GENE).await?,
            pathways: self.store().count_table(TABLE_PATHWAY).await?,
            pathway_memberships: self.store().count_table(TABLE_PATHWAY_MEMBERSHIP).await?,
            go_terms: self.store().count_table(TABLE_GO_TERM).await?,
            gene_go_associations: self.store().count_table(TABLE_GENE_GO).await?,
            gene_relations: self.store().count_table(TABLE_GENE_RELATION).await?,
        })
    }
}
