use crate::guidance::{self, ComponentCtx, FlowCtx, GuidanceBlock, SpoofingCtx};
use crate::model::SystemModel;
use crate::types::{StrideKind, Trait};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DiscussionTopic
// ---------------------------------------------------------------------------

/// What a topic is about: a single component, a data flow, or - for spoofing
/// topics - a data flow plus the endpoint whose identity is being asserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TopicSubject {
    Component {
        name: String,
    },
    Flow {
        source: String,
        dest: String,
    },
    SpoofedIdentity {
        source: String,
        dest: String,
        identity: String,
    },
}

/// One brainstorming topic. The label is a pure function of (kind, subject),
/// so regenerating after an unrelated model edit keeps labels stable and any
/// completion tracking keyed on them intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionTopic {
    pub label: String,
    pub kind: StrideKind,
    pub subject: TopicSubject,
    pub content: Vec<GuidanceBlock>,
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// The five per-component kinds, in emission order. Spoofing is absent here:
/// it only ever applies to a data flow.
const COMPONENT_KINDS: &[(StrideKind, fn(&ComponentCtx) -> Vec<GuidanceBlock>)] = &[
    (StrideKind::Tampering, guidance::component_tampering),
    (StrideKind::Repudiation, guidance::component_repudiation),
    (
        StrideKind::InformationDisclosure,
        guidance::component_info_disclosure,
    ),
    (
        StrideKind::DenialOfService,
        guidance::component_denial_of_service,
    ),
    (
        StrideKind::EscalationOfPrivilege,
        guidance::component_escalation_of_privilege,
    ),
];

/// Expand the model into the ordered topic list.
///
/// For each component in insertion order: its five per-component topics
/// (skipped entirely when the component is out of scope), then a quintet for
/// each data flow recorded with this component as source, each quintet in
/// the fixed order [spoof-of-source, spoof-of-dest, tampering, information
/// disclosure, denial of service].
///
/// Flow topics are emitted regardless of either endpoint's scope trait: a
/// flow with an out-of-scope system still crosses a trust boundary worth
/// discussing. Total over any model; endpoints missing from the component
/// list are treated as having no traits.
pub fn generate_topics(model: &SystemModel) -> Vec<DiscussionTopic> {
    let mut topics = Vec::new();

    for component in model.components() {
        let traits = model.traits_of(component);
        let in_scope = !traits.iter().any(|t| t.name() == Trait::OutOfScope.name());

        if in_scope {
            let ctx = ComponentCtx {
                name: component,
                traits,
            };
            for (kind, build) in COMPONENT_KINDS {
                topics.push(DiscussionTopic {
                    label: format!("{component}: {kind}"),
                    kind: *kind,
                    subject: TopicSubject::Component {
                        name: component.clone(),
                    },
                    content: build(&ctx),
                });
            }
        }

        for flow in model.flows_from(component) {
            topics.extend(flow_topics(model, &flow.source, &flow.dest));
        }
    }

    topics
}

fn flow_topics(model: &SystemModel, source: &str, dest: &str) -> Vec<DiscussionTopic> {
    let spoofing_topic = |spoofed: &str, checking: &str| DiscussionTopic {
        label: format!("{source} <-> {dest}: Spoofing of '{spoofed}' identity"),
        kind: StrideKind::Spoofing,
        subject: TopicSubject::SpoofedIdentity {
            source: source.to_string(),
            dest: dest.to_string(),
            identity: spoofed.to_string(),
        },
        content: guidance::spoofing(&SpoofingCtx {
            spoofed,
            checking,
            spoofed_traits: model.traits_of(spoofed),
            checking_traits: model.traits_of(checking),
        }),
    };

    let flow_ctx = FlowCtx { source, dest };
    let flow_topic = |kind: StrideKind, content: Vec<GuidanceBlock>| DiscussionTopic {
        label: format!("{source} <-> {dest}: {kind}"),
        kind,
        subject: TopicSubject::Flow {
            source: source.to_string(),
            dest: dest.to_string(),
        },
        content,
    };

    vec![
        spoofing_topic(source, dest),
        spoofing_topic(dest, source),
        flow_topic(StrideKind::Tampering, guidance::flow_tampering(&flow_ctx)),
        flow_topic(
            StrideKind::InformationDisclosure,
            guidance::flow_info_disclosure(&flow_ctx),
        ),
        flow_topic(
            StrideKind::DenialOfService,
            guidance::flow_denial_of_service(&flow_ctx),
        ),
    ]
}

/// Bucket topics by STRIDE category, in fixed category order, preserving
/// generation order within each bucket. Empty buckets are kept so a rendered
/// view always shows all six headings.
pub fn group_by_kind(topics: &[DiscussionTopic]) -> Vec<(StrideKind, Vec<&DiscussionTopic>)> {
    StrideKind::all()
        .iter()
        .map(|kind| {
            let bucket = topics.iter().filter(|t| t.kind == *kind).collect();
            (*kind, bucket)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
