pub const TABLE_GENE: &str = "gene";
pub const TABLE_PATHWAY: &str = "pathway";
pub const TABLE_PATHWAY_MEMBERSHIP: &str = "pathway_membership";
pub const TABLE_GO_TERM: &str = "go_term";
pub const TABLE_GENE_GO: &str = "gene_go";
pub const TABLE_GENE_RELATION: &str = "gene_relation";

pub const NAMESPACE_BIOLOGICAL_PROCESS: &str = "biological_process";
pub const NAMESPACE_MOLECULAR_FUNCTION: &str = "molecular_function";
pub const NAMESPACE_CELLULAR_COMPONENT: &str = "cellular_component";

/// Maps a GAF aspect code to a GO namespace label.
///
/// Unknown aspect codes pass through verbatim so the stored value stays
/// faithful to the source file.
#[must_use]
pub fn aspect_to_namespace(aspect: &str) -> String {
    match aspect {
        "P" => NAMESPACE_BIOLOGICAL_PROCESS.to_string(),
        "F" => NAMESPACE_MOLECULAR_FUNCTION.to_string(),
        "C" => NAMESPACE_CELLULAR_COMPONENT.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_codes_map_to_namespaces() {
        assert_eq!(aspect_to_namespace("P"), NAMESPACE_BIOLOGICAL_PROCESS);
        assert_eq!(aspect_to_namespace("F"), NAMESPACE_MOLECULAR_FUNCTION);
        assert_eq!(aspect_to_namespace("C"), NAMESPACE_CELLULAR_COMPONENT);
        assert_eq!(aspect_to_namespace("X"), "X");
    }
}
