use super::boundary::BoundaryCollection;
use std::collections::HashMap;

/// Lookup key for a region name: whitespace runs become `-`, case is ignored,
/// so `"Tamil  Nadu"` and `"tamil nadu"` both give `tamil-nadu`.
pub fn region_slug(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase()
}

/// Boundary features by region name. A region drawn as several features
/// (islands, exclaves) maps to all of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionIndex {
    features: HashMap<String, Vec<usize>>,
}

impl RegionIndex {
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut features: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, name) in names.into_iter().enumerate() {
            let slug = region_slug(name);
            if !slug.is_empty() {
                features.entry(slug).or_default().push(index);
            }
        }
        Self { features }
    }

    pub fn from_boundary(boundary: &BoundaryCollection) -> Self {
        Self::from_names(boundary.features().iter().map(|feature| feature.name.as_str()))
    }

    /// Feature indices for `name`; empty when the name is unknown.
    pub fn features_of(&self, name: &str) -> &[usize] {
        self.features.get(&region_slug(name)).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_loosely() {
        let regions = RegionIndex::from_names(["Tamil Nadu", "Kerala", "tamil  nadu", "  "]);
        assert_eq!(regions.features_of("TAMIL NADU"), &[0, 2]);
        assert_eq!(regions.features_of("Kerala"), &[1]);
        assert!(regions.features_of("Goa").is_empty());
        assert_eq!(regions.len(), 2);
    }
}
