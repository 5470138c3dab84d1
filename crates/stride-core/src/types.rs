use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A trust-relevant capability tag on a component. The set is closed; traits
/// are compared by their stable `name()`, which is also what the guidance
/// text shows to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trait {
    OutOfScope,
    AzureResource,
    MyCodeRunsHere,
    ActsAsAClient,
    ActsAsAServer,
}

impl Trait {
    pub fn all() -> &'static [Trait] {
        &[
            Trait::OutOfScope,
            Trait::AzureResource,
            Trait::MyCodeRunsHere,
            Trait::ActsAsAClient,
            Trait::ActsAsAServer,
        ]
    }

    /// Stable human-readable identity key.
    pub fn name(self) -> &'static str {
        match self {
            Trait::OutOfScope => "Out of Scope",
            Trait::AzureResource => "Azure Resource",
            Trait::MyCodeRunsHere => "My Code Runs Here",
            Trait::ActsAsAClient => "Acts as a Client",
            Trait::ActsAsAServer => "Acts as a Server",
        }
    }

    /// Wire form used in model files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Trait::OutOfScope => "out_of_scope",
            Trait::AzureResource => "azure_resource",
            Trait::MyCodeRunsHere => "my_code_runs_here",
            Trait::ActsAsAClient => "acts_as_a_client",
            Trait::ActsAsAServer => "acts_as_a_server",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Trait::OutOfScope => {
                "My system interacts with this component, but we are not responsible for securing it."
            }
            Trait::AzureResource => {
                "This component either is an Azure Resource (e.g. a CosmosDB database) or is built on one (e.g. App Service)."
            }
            Trait::MyCodeRunsHere => "Code we wrote runs on this resource.",
            Trait::ActsAsAClient => {
                "This component initiates connections to other components (e.g. it makes API calls)."
            }
            Trait::ActsAsAServer => {
                "This component accepts connections from other components (e.g. it serves an API)."
            }
        }
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Trait {
    type Err = crate::error::StrideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "out_of_scope" => Ok(Trait::OutOfScope),
            "azure_resource" => Ok(Trait::AzureResource),
            "my_code_runs_here" => Ok(Trait::MyCodeRunsHere),
            "acts_as_a_client" => Ok(Trait::ActsAsAClient),
            "acts_as_a_server" => Ok(Trait::ActsAsAServer),
            _ => Err(crate::error::StrideError::UnknownTrait(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// StrideKind
// ---------------------------------------------------------------------------

/// The six STRIDE threat categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrideKind {
    Spoofing,
    Tampering,
    Repudiation,
    InformationDisclosure,
    DenialOfService,
    EscalationOfPrivilege,
}

impl StrideKind {
    pub fn all() -> &'static [StrideKind] {
        &[
            StrideKind::Spoofing,
            StrideKind::Tampering,
            StrideKind::Repudiation,
            StrideKind::InformationDisclosure,
            StrideKind::DenialOfService,
            StrideKind::EscalationOfPrivilege,
        ]
    }

    /// Display form, as it appears in topic labels.
    pub fn as_str(self) -> &'static str {
        match self {
            StrideKind::Spoofing => "Spoofing",
            StrideKind::Tampering => "Tampering",
            StrideKind::Repudiation => "Repudiation",
            StrideKind::InformationDisclosure => "Information Disclosure",
            StrideKind::DenialOfService => "Denial of Service",
            StrideKind::EscalationOfPrivilege => "Escalation of Privilege",
        }
    }
}

impl fmt::Display for StrideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
