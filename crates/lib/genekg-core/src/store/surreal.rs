use std::{error::Error, fmt, sync::Arc};

use genekg_store::models::{
    Gene,
    GeneGoAssociation,
    GeneRelation,
    GoTerm,
    Pathway,
    PathwayMembership,
};
use genekg_store::schema::{TABLE_GENE, TABLE_GO_TERM, TABLE_PATHWAY};
use surrealdb::{Connection, Surreal};

#[derive(Debug)]
pub enum StoreError {
    Surreal(Box<surrealdb::Error>),
    InvalidInput(String),
    /// An association row referenced a parent record that does not exist.
    MissingReference {
        table: &'static str,
        key: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surreal(err) => write!(f, "SurrealDB error: {err}"),
            Self::InvalidInput(message) => write!(f, "Invalid input: {message}"),
            Self::MissingReference { table, key } => {
                write!(f, "Referenced {table} record does not exist: {key}")
            }
        }
    }
}

impl Error for StoreError {}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        Self::Surreal(Box::new(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Idempotent schema setup: six tables plus the lookup indexes used by the
/// query operations.
const DEFINE_SCHEMA: &str = "
DEFINE TABLE IF NOT EXISTS gene SCHEMALESS;
DEFINE TABLE IF NOT EXISTS pathway SCHEMALESS;
DEFINE TABLE IF NOT EXISTS pathway_membership SCHEMALESS;
DEFINE TABLE IF NOT EXISTS go_term SCHEMALESS;
DEFINE TABLE IF NOT EXISTS gene_go SCHEMALESS;
DEFINE TABLE IF NOT EXISTS gene_relation SCHEMALESS;
DEFINE INDEX IF NOT EXISTS pathway_membership_gene ON TABLE pathway_membership FIELDS gene_id;
DEFINE INDEX IF NOT EXISTS gene_go_gene ON TABLE gene_go FIELDS gene_id;
DEFINE INDEX IF NOT EXISTS gene_relation_source ON TABLE gene_relation FIELDS source_gene_id;
";

/// Applies one parsed KGML document in a single transaction.
///
/// Parent rows (genes, the pathway) are inserted before the edges that
/// reference them; `INSERT IGNORE` against record ids gives insert-or-ignore
/// dedup, so replaying the same document is a no-op.
const APPLY_KGML: &str = "
BEGIN TRANSACTION;
FOR $gene IN $genes {
    INSERT IGNORE INTO gene {
        id: type::thing('gene', $gene.gene_id),
        gene_id: $gene.gene_id,
        symbol: $gene.symbol,
    };
};
INSERT IGNORE INTO pathway {
    id: type::thing('pathway', $pathway.pathway_id),
    pathway_id: $pathway.pathway_id,
    name: $pathway.name,
    disease: $pathway.disease,
    org: $pathway.org,
};
FOR $row IN $memberships {
    INSERT IGNORE INTO pathway_membership {
        id: type::thing('pathway_membership', [$row.gene_id, $row.pathway_id]),
        gene_id: $row.gene_id,
        pathway_id: $row.pathway_id,
        entry_type: $row.entry_type,
    };
};
FOR $row IN $relations {
    INSERT IGNORE INTO gene_relation {
        id: type::thing('gene_relation', [$row.source_gene_id, $row.target_gene_id, $row.relation_type]),
        source_gene_id: $row.source_gene_id,
        target_gene_id: $row.target_gene_id,
        relation_type: $row.relation_type,
        pathway_id: $row.pathway_id,
    };
};
COMMIT TRANSACTION;
";

/// Applies one parsed GAF batch in a single transaction, parents first.
const APPLY_GAF: &str = "
BEGIN TRANSACTION;
FOR $term IN $terms {
    INSERT IGNORE INTO go_term {
        id: type::thing('go_term', $term.go_id),
        go_id: $term.go_id,
        namespace: $term.namespace,
        description: $term.description,
    };
};
FOR $gene IN $genes {
    INSERT IGNORE INTO gene {
        id: type::thing('gene', $gene.gene_id),
        gene_id: $gene.gene_id,
        symbol: $gene.symbol,
    };
};
FOR $row IN $associations {
    INSERT IGNORE INTO gene_go {
        id: type::thing('gene_go', [$row.gene_id, $row.go_id]),
        gene_id: $row.gene_id,
        go_id: $row.go_id,
    };
};
COMMIT TRANSACTION;
";

pub struct SurrealGeneStore<C: Connection> {
    db: Arc<Surreal<C>>,
}

impl<C: Connection> Clone for SurrealGeneStore<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

impl<C: Connection> SurrealGeneStore<C> {
    #[must_use]
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            db: Arc::new(db),
        }
    }

    #[must_use]
    pub const fn from_arc(db: Arc<Surreal<C>>) -> Self {
        Self { db }
    }

    #[must_use]
    pub fn db(&self) -> &Surreal<C> {
        &self.db
    }

    /// Creates the six tables and their indexes if they do not exist.
    ///
    /// # Errors
    /// Returns `StoreError` if the schema statements fail.
    pub async fn define_schema(&self) -> StoreResult<()> {
        self.db.query(DEFINE_SCHEMA).await?.check()?;
        Ok(())
    }

    /// Applies one parsed KGML document atomically.
    ///
    /// # Errors
    /// Returns `StoreError` if validation fails or the transaction fails.
    pub async fn apply_kgml(
        &self,
        pathway: Pathway,
        genes: Vec<Gene>,
        memberships: Vec<PathwayMembership>,
        relations: Vec<GeneRelation>,
    ) -> StoreResult<()> {
        ensure_non_empty(&pathway.pathway_id, "pathway_id")?;
        self.db
            .query(APPLY_KGML)
            .bind(("genes", genes))
            .bind(("pathway", pathway))
            .bind(("memberships", memberships))
            .bind(("relations", relations))
            .await?
            .check()?;
        Ok(())
    }

    /// Applies one parsed GAF batch atomically.
    ///
    /// # Errors
    /// Returns `StoreError` if the transaction fails.
    pub async fn apply_gaf(
        &self,
        terms: Vec<GoTerm>,
        genes: Vec<Gene>,
        associations: Vec<GeneGoAssociation>,
    ) -> StoreResult<()> {
        self.db
            .query(APPLY_GAF)
            .bind(("terms", terms))
            .bind(("genes", genes))
            .bind(("associations", associations))
            .await?
            .check()?;
        Ok(())
    }

    /// Inserts a gene if absent.
    ///
    /// # Errors
    /// Returns `StoreError` if validation fails or the database write fails.
    pub async fn insert_gene(&self, gene: Gene) -> StoreResult<()> {
        ensure_non_empty(&gene.gene_id, "gene_id")?;
        let query = "INSERT IGNORE INTO gene {
            id: type::thing('gene', $gene.gene_id),
            gene_id: $gene.gene_id,
            symbol: $gene.symbol,
        };";
        self.db.query(query).bind(("gene", gene)).await?.check()?;
        Ok(())
    }

    /// Inserts a pathway if absent.
    ///
    /// # Errors
    /// Returns `StoreError` if validation fails or the database write fails.
    pub async fn insert_pathway(&self, pathway: Pathway) -> StoreResult<()> {
        ensure_non_empty(&pathway.pathway_id, "pathway_id")?;
        let query = "INSERT IGNORE INTO pathway {
            id: type::thing('pathway', $pathway.pathway_id),
            pathway_id: $pathway.pathway_id,
            name: $pathway.name,
            disease: $pathway.disease,
            org: $pathway.org,
        };";
        self.db
            .query(query)
            .bind(("pathway", pathway))
            .await?
            .check()?;
        Ok(())
    }

    /// Inserts a GO term if absent.
    ///
    /// # Errors
    /// Returns `StoreError` if validation fails or the database write fails.
    pub async fn insert_go_term(&self, term: GoTerm) -> StoreResult<()> {
        ensure_non_empty(&term.go_id, "go_id")?;
        let query = "INSERT IGNORE INTO go_term {
            id: type::thing('go_term', $term.go_id),
            go_id: $term.go_id,
            namespace: $term.namespace,
            description: $term.description,
        };";
        self.db.query(query).bind(("term", term)).await?.check()?;
        Ok(())
    }

    /// Inserts a pathway membership edge, enforcing referential integrity.
    ///
    /// # Errors
    /// Returns `StoreError::MissingReference` if the gene or pathway does
    /// not exist, or `StoreError` on database failures.
    pub async fn insert_membership(&self, membership: PathwayMembership) -> StoreResult<()> {
        self.ensure_exists(TABLE_GENE, &membership.gene_id).await?;
        self.ensure_exists(TABLE_PATHWAY, &membership.pathway_id)
            .await?;
        let query = "INSERT IGNORE INTO pathway_membership {
            id: type::thing('pathway_membership', [$row.gene_id, $row.pathway_id]),
            gene_id: $row.gene_id,
            pathway_id: $row.pathway_id,
            entry_type: $row.entry_type,
        };";
        self.db
            .query(query)
            .bind(("row", membership))
            .await?
            .check()?;
        Ok(())
    }

    /// Inserts a gene-to-GO association edge, enforcing referential integrity.
    ///
    /// # Errors
    /// Returns `StoreError::MissingReference` if the gene or term does not
    /// exist, or `StoreError` on database failures.
    pub async fn insert_gene_go(&self, association: GeneGoAssociation) -> StoreResult<()> {
        self.ensure_exists(TABLE_GENE, &association.gene_id).await?;
        self.ensure_exists(TABLE_GO_TERM, &association.go_id).await?;
        let query = "INSERT IGNORE INTO gene_go {
            id: type::thing('gene_go', [$row.gene_id, $row.go_id]),
            gene_id: $row.gene_id,
            go_id: $row.go_id,
        };";
        self.db
            .query(query)
            .bind(("row", association))
            .await?
            .check()?;
        Ok(())
    }

    /// Inserts a gene interaction edge, enforcing referential integrity.
    ///
    /// # Errors
    /// Returns `StoreError::MissingReference` if either gene does not exist,
    /// or `StoreError` on database failures.
    pub async fn insert_relation(&self, relation: GeneRelation) -> StoreResult<()> {
        self.ensure_exists(TABLE_GENE, &relation.source_gene_id)
            .await?;
        self.ensure_exists(TABLE_GENE, &relation.target_gene_id)
            .await?;
        let query = "INSERT IGNORE INTO gene_relation {
            id: type::thing('gene_relation', [$row.source_gene_id, $row.target_gene_id, $row.relation_type]),
            source_gene_id: $row.source_gene_id,
            target_gene_id: $row.target_gene_id,
            relation_type: $row.relation_type,
            pathway_id: $row.pathway_id,
        };";
        self.db
            .query(query)
            .bind(("row", relation))
            .await?
            .check()?;
        Ok(())
    }

    /// Fetches a gene by identifier.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn get_gene(&self, gene_id: &str) -> StoreResult<Option<Gene>> {
        let record: Option<Gene> = self.db.select((TABLE_GENE, gene_id)).await?;
        Ok(record)
    }

    /// Fetches a pathway by identifier.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn get_pathway(&self, pathway_id: &str) -> StoreResult<Option<Pathway>> {
        let record: Option<Pathway> = self.db.select((TABLE_PATHWAY, pathway_id)).await?;
        Ok(record)
    }

    /// Lists the distinct disease labels reachable from a gene through its
    /// pathway memberships.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn list_diseases_for_gene(&self, gene_id: &str) -> StoreResult<Vec<String>> {
        let gene_id = gene_id.to_string();
        let query = "SELECT VALUE disease FROM pathway
            WHERE disease != NONE
            AND pathway_id IN (SELECT VALUE pathway_id FROM pathway_membership WHERE gene_id = $gene_id);";
        let mut response = self.db.query(query).bind(("gene_id", gene_id)).await?;
        let mut diseases: Vec<String> = response.take(0)?;
        diseases.sort();
        diseases.dedup();
        Ok(diseases)
    }

    /// Lists the GO terms associated with a gene.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn list_go_terms_for_gene(&self, gene_id: &str) -> StoreResult<Vec<GoTerm>> {
        let gene_id = gene_id.to_string();
        let query = "SELECT * FROM go_term
            WHERE go_id IN (SELECT VALUE go_id FROM gene_go WHERE gene_id = $gene_id);";
        let mut response = self.db.query(query).bind(("gene_id", gene_id)).await?;
        let mut terms: Vec<GoTerm> = response.take(0)?;
        terms.sort_by(|a, b| a.go_id.cmp(&b.go_id));
        terms.dedup_by(|a, b| a.go_id == b.go_id);
        Ok(terms)
    }

    /// Lists the outgoing interaction edges of a gene.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn list_relations_from(&self, gene_id: &str) -> StoreResult<Vec<GeneRelation>> {
        let gene_id = gene_id.to_string();
        let query = "SELECT * FROM gene_relation WHERE source_gene_id = $gene_id;";
        let mut response = self.db.query(query).bind(("gene_id", gene_id)).await?;
        let mut relations: Vec<GeneRelation> = response.take(0)?;
        relations.sort_by(|a, b| {
            (a.target_gene_id.as_str(), a.relation_type.as_str())
                .cmp(&(b.target_gene_id.as_str(), b.relation_type.as_str()))
        });
        Ok(relations)
    }

    /// Counts the rows of one of the six tables.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn count_table(&self, table: &'static str) -> StoreResult<usize> {
        let query = "SELECT count() FROM type::table($table) GROUP ALL;";
        let mut response = self
            .db
            .query(query)
            .bind(("table", table.to_string()))
            .await?;
        let rows: Vec<CountRow> = response.take(0)?;
        Ok(rows.first().map_or(0, |row| row.count))
    }

    async fn ensure_exists(&self, table: &'static str, key: &str) -> StoreResult<()> {
        let query = "RETURN record::exists(type::thing($table, $key));";
        let mut response = self
            .db
            .query(query)
            .bind(("table", table.to_string()))
            .bind(("key", key.to_string()))
            .await?;
        let exists: Option<bool> = response.take(0)?;
        if exists.unwrap_or(false) {
            Ok(())
        } else {
            Err(StoreError::MissingReference {
                table,
                key: key.to_string(),
            })
        }
    }
}

fn ensure_non_empty(value: &str, field: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

#[derive(serde::Deserialize)]
struct CountRow {
    count: usize,
}
