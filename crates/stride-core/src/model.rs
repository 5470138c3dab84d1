use crate::error::{Result, StrideError};
use crate::types::Trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// DataFlow
// ---------------------------------------------------------------------------

/// A bidirectional "exchanges data with" relation between two components.
/// Recorded once; `source` is whichever side the user named first when the
/// flow was added, which fixes the direction used in topic labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFlow {
    pub source: String,
    pub dest: String,
}

impl DataFlow {
    pub fn new(source: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }

    /// True if this flow connects `a` and `b` in either orientation.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.dest == b) || (self.source == b && self.dest == a)
    }

    pub fn touches(&self, component: &str) -> bool {
        self.source == component || self.dest == component
    }
}

// ---------------------------------------------------------------------------
// SystemModel
// ---------------------------------------------------------------------------

/// The architecture snapshot the topic generator consumes: components in
/// insertion order, each component's traits, and the data flows between
/// components. All mutation goes through the methods below; the generator
/// only ever reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemModel {
    components: Vec<String>,
    traits: HashMap<String, Vec<Trait>>,
    flows: Vec<DataFlow>,
}

impl SystemModel {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Components
    // -----------------------------------------------------------------------

    /// Idempotent add. A new component starts with no traits.
    pub fn add_component(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.traits.contains_key(&name) {
            return;
        }
        self.components.push(name.clone());
        self.traits.insert(name, Vec::new());
    }

    /// Removes the component, its trait assignment, and every data flow that
    /// references it on either side. No-op if the component is absent.
    pub fn remove_component(&mut self, name: &str) {
        self.components.retain(|c| c != name);
        self.traits.remove(name);
        self.flows.retain(|f| !f.touches(name));
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn contains_component(&self, name: &str) -> bool {
        self.traits.contains_key(name)
    }

    // -----------------------------------------------------------------------
    // Traits
    // -----------------------------------------------------------------------

    /// Replace a component's trait set wholesale. Duplicates (by name)
    /// collapse, keeping first occurrence order.
    pub fn set_traits(&mut self, component: &str, traits: Vec<Trait>) -> Result<()> {
        let entry = self.traits_entry_mut(component)?;
        entry.clear();
        for t in traits {
            if !entry.iter().any(|have| have.name() == t.name()) {
                entry.push(t);
            }
        }
        Ok(())
    }

    pub fn add_trait(&mut self, component: &str, t: Trait) -> Result<()> {
        let entry = self.traits_entry_mut(component)?;
        if !entry.iter().any(|have| have.name() == t.name()) {
            entry.push(t);
        }
        Ok(())
    }

    pub fn remove_trait(&mut self, component: &str, t: Trait) -> Result<()> {
        let entry = self.traits_entry_mut(component)?;
        entry.retain(|have| have.name() != t.name());
        Ok(())
    }

    pub fn has_trait(&self, component: &str, t: Trait) -> Result<bool> {
        let traits = self
            .traits
            .get(component)
            .ok_or_else(|| StrideError::ComponentNotFound(component.to_string()))?;
        Ok(traits.iter().any(|have| have.name() == t.name()))
    }

    /// Traits of a component, tolerating absent components by treating them
    /// as having none. This is the lookup the generator uses, which keeps it
    /// total even over a model whose flows mention unknown endpoints.
    pub fn traits_of(&self, component: &str) -> &[Trait] {
        self.traits.get(component).map(Vec::as_slice).unwrap_or(&[])
    }

    fn traits_entry_mut(&mut self, component: &str) -> Result<&mut Vec<Trait>> {
        self.traits
            .get_mut(component)
            .ok_or_else(|| StrideError::ComponentNotFound(component.to_string()))
    }

    // -----------------------------------------------------------------------
    // Data flows
    // -----------------------------------------------------------------------

    /// Symmetric add: if a flow between the pair already exists in either
    /// orientation this is a no-op. Self-flows are rejected.
    pub fn add_flow(&mut self, source: &str, dest: &str) -> Result<()> {
        if source == dest {
            return Err(StrideError::SelfFlow(source.to_string()));
        }
        if self.flow_exists(source, dest) {
            return Ok(());
        }
        self.flows.push(DataFlow::new(source, dest));
        Ok(())
    }

    /// Symmetric remove: matches either orientation; no-op if absent.
    pub fn remove_flow(&mut self, a: &str, b: &str) {
        self.flows.retain(|f| !f.connects(a, b));
    }

    pub fn flow_exists(&self, a: &str, b: &str) -> bool {
        self.flows.iter().any(|f| f.connects(a, b))
    }

    pub fn flows(&self) -> &[DataFlow] {
        &self.flows
    }

    /// Flows recorded with `component` as their source, in insertion order.
    /// This is the per-component view the generator iterates: a flow is
    /// visited exactly once, from the side that added it.
    pub fn flows_from<'a>(&'a self, component: &'a str) -> impl Iterator<Item = &'a DataFlow> {
        self.flows.iter().filter(move |f| f.source == component)
    }

    // -----------------------------------------------------------------------
    // File form
    // -----------------------------------------------------------------------

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let file: ModelFile = serde_yaml::from_str(&data)?;
        file.try_into()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = ModelFile::from(self);
        let data = serde_yaml::to_string(&file)?;
        crate::io::atomic_write(path, data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// ModelFile (YAML representation)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ComponentEntry {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    traits: Vec<Trait>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ModelFile {
    #[serde(default)]
    components: Vec<ComponentEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    flows: Vec<DataFlow>,
}

impl From<&SystemModel> for ModelFile {
    fn from(model: &SystemModel) -> Self {
        ModelFile {
            components: model
                .components
                .iter()
                .map(|name| ComponentEntry {
                    name: name.clone(),
                    traits: model.traits_of(name).to_vec(),
                })
                .collect(),
            flows: model.flows.clone(),
        }
    }
}

impl TryFrom<ModelFile> for SystemModel {
    type Error = StrideError;

    fn try_from(file: ModelFile) -> Result<Self> {
        let mut model = SystemModel::new();
        for entry in file.components {
            if model.contains_component(&entry.name) {
                return Err(StrideError::DuplicateComponent(entry.name));
            }
            model.add_component(entry.name.clone());
            model.set_traits(&entry.name, entry.traits)?;
        }
        for flow in file.flows {
            for endpoint in [&flow.source, &flow.dest] {
                if !model.contains_component(endpoint) {
                    return Err(StrideError::UnknownFlowEndpoint {
                        flow: format!("{} <-> {}", flow.source, flow.dest),
                        component: endpoint.clone(),
                    });
                }
            }
            model.add_flow(&flow.source, &flow.dest)?;
        }
        Ok(model)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with(components: &[&str]) -> SystemModel {
        let mut m = SystemModel::new();
        for c in components {
            m.add_component(*c);
        }
        m
    }

    #[test]
    fn add_component_is_idempotent() {
        let mut m = SystemModel::new();
        m.add_component("API");
        m.add_component("API");
        assert_eq!(m.components(), &["API".to_string()]);
    }

    #[test]
    fn add_component_initializes_empty_traits() {
        let m = model_with(&["API"]);
        assert!(m.traits_of("API").is_empty());
    }

    #[test]
    fn components_keep_insertion_order() {
        let m = model_with(&["Zebra", "Apple", "Mango"]);
        assert_eq!(m.components(), &["Zebra", "Apple", "Mango"]);
    }

    #[test]
    fn trait_ops_require_existing_component() {
        let mut m = SystemModel::new();
        assert!(matches!(
            m.add_trait("ghost", Trait::AzureResource),
            Err(StrideError::ComponentNotFound(_))
        ));
        assert!(matches!(
            m.remove_trait("ghost", Trait::AzureResource),
            Err(StrideError::ComponentNotFound(_))
        ));
        assert!(matches!(
            m.has_trait("ghost", Trait::AzureResource),
            Err(StrideError::ComponentNotFound(_))
        ));
    }

    #[test]
    fn add_trait_dedups_by_name() {
        let mut m = model_with(&["API"]);
        m.add_trait("API", Trait::AzureResource).unwrap();
        m.add_trait("API", Trait::AzureResource).unwrap();
        assert_eq!(m.traits_of("API"), &[Trait::AzureResource]);
    }

    #[test]
    fn remove_trait_leaves_others() {
        let mut m = model_with(&["API"]);
        m.set_traits("API", vec![Trait::ActsAsAClient, Trait::ActsAsAServer])
            .unwrap();
        m.remove_trait("API", Trait::ActsAsAClient).unwrap();
        assert_eq!(m.traits_of("API"), &[Trait::ActsAsAServer]);
    }

    #[test]
    fn duplicate_flow_is_noop_either_direction() {
        let mut m = model_with(&["A", "B"]);
        m.add_flow("A", "B").unwrap();
        m.add_flow("A", "B").unwrap();
        m.add_flow("B", "A").unwrap();
        assert_eq!(m.flows().len(), 1);
        assert_eq!(m.flows()[0], DataFlow::new("A", "B"));
    }

    #[test]
    fn self_flow_rejected() {
        let mut m = model_with(&["A"]);
        assert!(matches!(m.add_flow("A", "A"), Err(StrideError::SelfFlow(_))));
    }

    #[test]
    fn remove_flow_matches_either_orientation() {
        let mut m = model_with(&["A", "B"]);
        m.add_flow("A", "B").unwrap();
        m.remove_flow("B", "A");
        assert!(m.flows().is_empty());
        // removing again is a no-op
        m.remove_flow("A", "B");
    }

    #[test]
    fn remove_component_cascades() {
        let mut m = model_with(&["A", "B", "C"]);
        m.add_trait("B", Trait::AzureResource).unwrap();
        m.add_flow("A", "B").unwrap();
        m.add_flow("B", "C").unwrap();
        m.add_flow("A", "C").unwrap();

        m.remove_component("B");

        assert_eq!(m.components(), &["A", "C"]);
        assert!(!m.contains_component("B"));
        assert_eq!(m.flows(), &[DataFlow::new("A", "C")]);
    }

    #[test]
    fn flows_from_sees_only_source_side() {
        let mut m = model_with(&["A", "B", "C"]);
        m.add_flow("A", "B").unwrap();
        m.add_flow("C", "A").unwrap();

        let from_a: Vec<_> = m.flows_from("A").collect();
        assert_eq!(from_a, vec![&DataFlow::new("A", "B")]);
        let from_c: Vec<_> = m.flows_from("C").collect();
        assert_eq!(from_c, vec![&DataFlow::new("C", "A")]);
        assert_eq!(m.flows_from("B").count(), 0);
    }

    #[test]
    fn file_roundtrip() {
        let mut m = model_with(&["Web Frontend", "API", "Database"]);
        m.set_traits("Web Frontend", vec![Trait::ActsAsAClient]).unwrap();
        m.set_traits("API", vec![Trait::ActsAsAServer, Trait::AzureResource])
            .unwrap();
        m.add_flow("Web Frontend", "API").unwrap();
        m.add_flow("API", "Database").unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("threat-model.yaml");
        m.save(&path).unwrap();
        let loaded = SystemModel::load(&path).unwrap();
        assert_eq!(loaded, m);
    }

    #[test]
    fn load_rejects_duplicate_component() {
        let yaml = "components:\n  - name: API\n  - name: API\n";
        let file: ModelFile = serde_yaml::from_str(yaml).unwrap();
        let result: Result<SystemModel> = file.try_into();
        assert!(matches!(result, Err(StrideError::DuplicateComponent(_))));
    }

    #[test]
    fn load_rejects_unknown_flow_endpoint() {
        let yaml = "components:\n  - name: API\nflows:\n  - source: API\n    dest: Ghost\n";
        let file: ModelFile = serde_yaml::from_str(yaml).unwrap();
        let result: Result<SystemModel> = file.try_into();
        assert!(matches!(
            result,
            Err(StrideError::UnknownFlowEndpoint { .. })
        ));
    }

    #[test]
    fn empty_file_is_empty_model() {
        let file: ModelFile = serde_yaml::from_str("components: []\n").unwrap();
        let model: SystemModel = file.try_into().unwrap();
        assert!(model.components().is_empty());
        assert!(model.flows().is_empty());
    }
}
