//! Guidance prose attached to discussion topics.
//!
//! Each topic's content is a list of blocks: the attacker narrative, one or
//! more mitigation tips, and warnings about common mistakes. Trait-dependent
//! blocks are declared as rule tables (predicate + render) evaluated against
//! the subject's trait set, so adding a conditional callout means adding a
//! table entry, not another branch.

use crate::types::Trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GuidanceBlock
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Discussion,
    Tip,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceBlock {
    pub kind: BlockKind,
    pub text: String,
}

impl GuidanceBlock {
    pub fn discussion(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Discussion,
            text: text.into(),
        }
    }

    pub fn tip(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Tip,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Warning,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

pub(crate) struct Rule<Ctx> {
    pub applies: fn(&Ctx) -> bool,
    pub render: fn(&Ctx) -> GuidanceBlock,
}

fn apply_rules<Ctx>(ctx: &Ctx, rules: &[Rule<Ctx>], out: &mut Vec<GuidanceBlock>) {
    for rule in rules {
        if (rule.applies)(ctx) {
            out.push((rule.render)(ctx));
        }
    }
}

/// A per-component topic subject: the component name and its traits.
pub(crate) struct ComponentCtx<'a> {
    pub name: &'a str,
    pub traits: &'a [Trait],
}

impl ComponentCtx<'_> {
    fn has(&self, t: Trait) -> bool {
        self.traits.iter().any(|have| have.name() == t.name())
    }
}

/// A spoofing topic subject: the identity being asserted (`spoofed`) and the
/// component whose job it is to verify that identity (`checking`).
pub(crate) struct SpoofingCtx<'a> {
    pub spoofed: &'a str,
    pub checking: &'a str,
    pub spoofed_traits: &'a [Trait],
    pub checking_traits: &'a [Trait],
}

impl SpoofingCtx<'_> {
    fn spoofed_has(&self, t: Trait) -> bool {
        self.spoofed_traits.iter().any(|have| have.name() == t.name())
    }

    fn checking_has(&self, t: Trait) -> bool {
        self.checking_traits.iter().any(|have| have.name() == t.name())
    }
}

/// A flow-paired topic subject (non-spoofing kinds): the two endpoints.
pub(crate) struct FlowCtx<'a> {
    pub source: &'a str,
    pub dest: &'a str,
}

const ACCESS_CONTROL_TIP: &str = "Consider using an access control mechanism to restrict access \
    to this resource. Some examples include operating system user permissions, network access \
    control lists, or cloud provider access management tools. Only grant access to users and \
    systems that need access, and grant as little access as possible.";

// ---------------------------------------------------------------------------
// Per-component kinds
// ---------------------------------------------------------------------------

pub(crate) fn component_tampering(ctx: &ComponentCtx) -> Vec<GuidanceBlock> {
    let mut blocks = vec![
        GuidanceBlock::discussion(
            "An attacker might try to tamper with this component in order to accomplish their \
             goals. Examples include:\n\
             - An attacker might try to alter data in their database (e.g. to increase an \
             account balance).\n\
             - An attacker might try to reconfigure a load balancer in order to route requests \
             to a system under their control.\n\
             - An attacker might try to delete or destroy a resource in order to take a system \
             offline.",
        ),
        GuidanceBlock::tip(ACCESS_CONTROL_TIP),
    ];
    apply_rules(
        ctx,
        &[Rule {
            applies: |c: &ComponentCtx| c.has(Trait::AzureResource),
            render: |_| {
                GuidanceBlock::tip(
                    "You indicated that this is an Azure resource - Azure RBAC allows one to \
                     configure fine-grained control over which users or systems have the ability \
                     to administer Azure resources - consider granting the narrowest possible \
                     roles to the users and systems that need to manage this resource. In \
                     addition, some Azure resources offer additional tools for restricting \
                     access, such as VNet support, data plane role-based access control (such as \
                     for Cosmos DB), or IP address filtering.",
                )
            },
        }],
        &mut blocks,
    );
    blocks
}

pub(crate) fn component_repudiation(ctx: &ComponentCtx) -> Vec<GuidanceBlock> {
    let mut blocks = vec![
        GuidanceBlock::discussion(
            "An attacker might try to make an action and later claim they did not take that \
             action, or take that action without having been discovered. Examples include:\n\
             - An attacker might try to spend a gift card more than once.\n\
             - An attacker might try to exploit a system without leaving any traces behind.",
        ),
        GuidanceBlock::tip(
            "Consider setting up a logging mechanism for this component, such that you can \
             understand what transpired after the fact. There are a couple types of logs that \
             can be useful:\n\
             - Application logs. Typically unstructured logs that print diagnostic information \
             about errors, warnings, or trace messages emitted while your application is \
             running.\n\
             - Request logs. Typically a structured format that is more condensed than \
             application logs; request logs record metadata about particular requests your \
             application received and what happened - the IP address of the sender, the HTTP \
             response code the server responded with, how long the request took, etc.",
        ),
    ];
    apply_rules(
        ctx,
        &[Rule {
            applies: |c: &ComponentCtx| c.has(Trait::AzureResource),
            render: |_| {
                GuidanceBlock::tip(
                    "You indicated that this is an Azure resource - many Azure resources offer \
                     built-in support for collecting diagnostic logs \
                     (https://docs.microsoft.com/en-us/azure/azure-monitor/essentials/platform-logs-overview). \
                     Consider enabling diagnostic logging for this resource.",
                )
            },
        }],
        &mut blocks,
    );
    blocks
}

pub(crate) fn component_info_disclosure(ctx: &ComponentCtx) -> Vec<GuidanceBlock> {
    let mut blocks = vec![
        GuidanceBlock::discussion(
            "An attacker might try to extract data they should not have access to from this \
             component. Examples include:\n\
             - An attacker gains access to the datacenter where this component is housed and \
             walks away with the underlying physical storage.\n\
             - An attacker gains access to this component by exploiting a vulnerability in the \
             OS or other software and extracts confidential information stored on disk.\n\
             - An attacker gains access to this component by exploiting incorrect access \
             control settings and extracts confidential information from this resource.",
        ),
        GuidanceBlock::tip(ACCESS_CONTROL_TIP),
        GuidanceBlock::tip(
            "For particularly sensitive / high-value information stored at rest, consider \
             whether additional defenses may be appropriate. For example:\n\
             - When storing passwords: consider whether you can avoid storing passwords at all \
             by using a third-party authentication provider instead (like Microsoft Identity \
             Platform). If you must store passwords, follow guidelines for doing so safely \
             (like OWASP's Password Storage Cheat Sheet).\n\
             - When storing other confidential information: consider encrypting the sensitive \
             information before storing it, which would make it much more difficult for an \
             attacker to make use of any data they gain access to. Follow guidelines like \
             OWASP's Cryptographic Storage cheat sheet, and/or regulatory standards like \
             PCI-DSS, HIPAA, or FedRAMP that might apply to your use case.",
        ),
    ];
    apply_rules(
        ctx,
        &[Rule {
            applies: |c: &ComponentCtx| c.has(Trait::AzureResource),
            render: |_| {
                GuidanceBlock::tip(
                    "You indicated that this is an Azure resource - many Azure resources offer \
                     tools for controlling which other systems can access data, such as VNet \
                     support, data plane role-based access control (such as for Cosmos DB), IP \
                     address filtering, and others. Consider how you might leverage these to \
                     limit access to this resource to just those users or systems who need it. \
                     Azure also offers a variety of tools to help you encrypt data, both \
                     'server side' (encryption at rest provided transparently by Azure \
                     resources for you) and 'client side' (encryption your application performs \
                     before storing data).",
                )
            },
        }],
        &mut blocks,
    );
    blocks
}

pub(crate) fn component_denial_of_service(ctx: &ComponentCtx) -> Vec<GuidanceBlock> {
    let mut blocks = vec![
        GuidanceBlock::discussion(
            "An attacker might try to cause this component to stop serving legitimate \
             customers/users. Examples include:\n\
             - An attacker (or even an overzealous legitimate user) might try to flood this \
             component with more requests or network traffic than it can handle.\n\
             - An attacker might try to exhaust resources provided by this component: sending \
             very large requests to consume RAM, sending requests that cause your services to \
             download very large files to exhaust disk space, or consuming available CPU (e.g. \
             mining cryptocurrency on components that run user-provided code, like CI/CD \
             tools).",
        ),
        GuidanceBlock::tip(
            "Consider limiting how many resources any given user of this component may \
             consume. Some options to consider include:\n\
             - Limiting how large requests to this component may be, in terms of total size \
             (bytes), number of items (for APIs accepting lists of items), or both.\n\
             - Limiting how often a given user is allowed to invoke your API and returning \
             throttling errors (e.g. HTTP 429) when the limit is exceeded.\n\
             - Use a DDoS protection service provider in front of this component in order to \
             defend against excessive network traffic.",
        ),
    ];
    apply_rules(
        ctx,
        &[Rule {
            applies: |c: &ComponentCtx| c.has(Trait::AzureResource),
            render: |_| {
                GuidanceBlock::tip(
                    "You indicated that this is an Azure resource - Azure offers a variety of \
                     tools to help defend against denial of service attacks, including:\n\
                     - Azure API Management provides configurable rules for limiting how often \
                     a given subscriber may call an API.\n\
                     - Azure Front Door provides a variety of DDoS protections built-in that \
                     can help stop floods of illegitimate network traffic before they arrive at \
                     your system; Azure Web Application Firewall (which can integrate with \
                     Front Door) also offers rules for rate limiting requests by client IP \
                     address.",
                )
            },
        }],
        &mut blocks,
    );
    blocks
}

pub(crate) fn component_escalation_of_privilege(ctx: &ComponentCtx) -> Vec<GuidanceBlock> {
    let mut blocks = vec![
        GuidanceBlock::discussion(
            "An attacker might try to take advantage of this component in order to gain access \
             they should not have. Examples include:\n\
             - An attacker might try to trick this component into taking actions that it \
             shouldn't (for example, including SQL commands in API inputs hoping that this \
             component sends those commands to a database improperly).\n\
             - An attacker might try to exploit vulnerabilities in a process running as an \
             administrator/root in order to gain administrator access to a system.\n\
             - After gaining access to a system, an attacker might try to find credentials \
             stored on the system that grant the attacker more access.",
        ),
        GuidanceBlock::tip(
            "Common ways to mitigate escalation of privilege attacks include:\n\
             - Taking care to keep commands separate from data, particularly for databases. \
             For SQL, a great way to do this is through parameterized queries (aka. prepared \
             statements).\n\
             - Validate inputs carefully before acting on them.\n\
             - When this component calls another component on behalf of a client, indicate to \
             the downstream system who the call is being made on behalf of; this allows the \
             downstream system to determine whether the originator of the request is authorized \
             in addition to checking that this component is allowed to make the call. See the \
             Microsoft Identity Platform on-behalf-of flow and the AWS IAM external ID field \
             for specific examples.\n\
             - Run this component with the least privilege necessary for it to function. For \
             processes on a host, run as a non-administrative system user having minimal \
             privileges; for cloud services, use roles granting as few permissions as possible.",
        ),
    ];
    apply_rules(
        ctx,
        &[Rule {
            applies: |c: &ComponentCtx| c.has(Trait::AzureResource),
            render: |_| {
                GuidanceBlock::tip(
                    "You indicated that this is an Azure resource - as an example of how to \
                     keep commands separate from data, if this component accesses Cosmos DB \
                     using the SQL API, consider using Cosmos DB parameterized queries.",
                )
            },
        }],
        &mut blocks,
    );
    blocks
}

// ---------------------------------------------------------------------------
// Spoofing (per flow, per asserted identity)
// ---------------------------------------------------------------------------

fn spoofing_extra_rules<'c>() -> Vec<Rule<SpoofingCtx<'c>>> {
    vec![Rule {
        applies: |c| c.spoofed_has(Trait::ActsAsAServer) && c.spoofed_has(Trait::AzureResource),
        render: |c| {
            GuidanceBlock::tip(format!(
                "You indicated that {} is an Azure resource, and that it acts as a server - \
                 some Azure services offer the ability to manage TLS certificates for your \
                 custom domains (and their corresponding private keys) for you automatically, \
                 such as App Service and Front Door.",
                c.spoofed
            ))
        },
    },
    Rule {
        applies: |c| {
            c.spoofed_has(Trait::ActsAsAClient)
                && c.spoofed_has(Trait::AzureResource)
                && c.checking_has(Trait::AzureResource)
        },
        render: |c| {
            GuidanceBlock::tip(format!(
                "You indicated that {spoofed} acts as a client, it is an Azure resource, and \
                 that {checking} is also an Azure resource - many Azure services make it easy \
                 for your code to authenticate to other Azure resources by providing managed \
                 identity credentials to your code, which {spoofed} can use when connecting to \
                 {checking}.",
                spoofed = c.spoofed,
                checking = c.checking
            ))
        },
    },
    Rule {
        applies: |c| c.spoofed_has(Trait::ActsAsAClient) && c.checking_has(Trait::AzureResource),
        render: |c| {
            GuidanceBlock::tip(format!(
                "You indicated that {} acts as a client, and that {} is an Azure resource - \
                 some Azure resources can also help you authenticate clients, such as App \
                 Service built-in authentication and authorization.",
                c.spoofed, c.checking
            ))
        },
    },
    Rule {
        applies: |c| {
            !(c.checking_has(Trait::ActsAsAServer) || c.checking_has(Trait::ActsAsAClient))
        },
        render: |c| {
            GuidanceBlock::tip(format!(
                "To get better suggestions here about how to verify {spoofed}'s identity, add \
                 the '{server}' and/or '{client}' traits to {checking} and {spoofed}.",
                spoofed = c.spoofed,
                checking = c.checking,
                server = Trait::ActsAsAServer.name(),
                client = Trait::ActsAsAClient.name(),
            ))
        },
    }]
}

pub(crate) fn spoofing(ctx: &SpoofingCtx) -> Vec<GuidanceBlock> {
    let mut blocks = vec![GuidanceBlock::discussion(format!(
        "An attacker might try to pretend to be '{}' in order to gain access they should not \
         have. Examples include:\n\
         - An attacker might try to make API calls while saying they are someone they are not \
         (e.g. by spoofing their IP address).\n\
         - An attacker might try to hijack a DNS name such that it points to a system under \
         the attacker's control.",
        ctx.spoofed
    ))];

    let mut bullets = Vec::new();
    if ctx.checking_has(Trait::ActsAsAClient) {
        bullets.push(format!(
            "- You indicated that {checking} acts as a client - consider having {checking} \
             only connect to {spoofed} using TLS and require that the server prove its \
             identity with a valid certificate signed by a trusted CA.",
            checking = ctx.checking,
            spoofed = ctx.spoofed
        ));
    }
    if ctx.checking_has(Trait::ActsAsAServer) {
        bullets.push(format!(
            "- You indicated that {checking} acts as a server - consider having {checking} \
             require that {spoofed} prove that it knows a secret having enough entropy that it \
             would be impractical for an attacker to guess (e.g. an access token sent over TLS \
             or a TLS client certificate).",
            checking = ctx.checking,
            spoofed = ctx.spoofed
        ));
    }
    bullets.push(format!(
        "- If {spoofed} and {checking} exchange messages outside of a server/client \
         relationship (e.g. via a message broker, or a non-TCP channel), consider having both \
         components require messages to be signed with a message authentication code or \
         digital signature.",
        spoofed = ctx.spoofed,
        checking = ctx.checking
    ));
    blocks.push(GuidanceBlock::tip(format!(
        "Consider having {checking} require that {spoofed} prove its identity using a strong \
         identification mechanism that is difficult to forge. For example:\n{bullets}",
        checking = ctx.checking,
        spoofed = ctx.spoofed,
        bullets = bullets.join("\n")
    )));

    apply_rules(ctx, &spoofing_extra_rules(), &mut blocks);
    blocks
}

// ---------------------------------------------------------------------------
// Flow-paired kinds
// ---------------------------------------------------------------------------

pub(crate) fn flow_tampering(ctx: &FlowCtx) -> Vec<GuidanceBlock> {
    vec![
        GuidanceBlock::discussion(
            "An attacker might try to alter information as it flows between these components \
             (for example, as messages transit the public internet). Examples include:\n\
             - An attacker might try to alter the content of a web site as it flows over a \
             network in order to censor speech.\n\
             - An attacker might try to alter the content of a web site as it flows over a \
             network in order to insert malware (like a bitcoin miner).\n\
             - An attacker might try to alter the content of a library binary as it flows over \
             a network in order to insert malware (like a reverse shell).",
        ),
        GuidanceBlock::tip(format!(
            "Consider having {} and {} use a security control that assures the integrity of \
             messages that they exchange such that any attempt at tampering may be detected. \
             Examples include:\n\
             - For TCP connections, TLS is a good way to protect the integrity and \
             authenticity of messages that are exchanged.\n\
             - For UDP messages, dTLS protects the integrity and authenticity of messages in a \
             similar manner as TLS.\n\
             - If these components exchange messages outside of a server/client relationship \
             (e.g. via a message broker, or a non-TCP channel), consider having both components \
             require messages to be signed with a message authentication code or digital \
             signature.",
            ctx.source, ctx.dest
        )),
        GuidanceBlock::warning(
            "When checking the integrity of messages exchanged over an untrusted channel, make \
             sure that the expected digest value either comes from a trusted source over a \
             separate trusted channel or is authenticated using a strong authentication \
             mechanism. For example, if a message and a SHA256 digest of the message's content \
             were sent together over an untrusted channel, an attacker could easily recompute \
             the correct SHA256 to send alongside an altered copy of the message, and the \
             receiver would not be able to detect that the message was altered. Much better \
             approaches are to attach a message authentication code or digital signature to the \
             message instead (either of which is much more difficult for an attacker to forge), \
             or to send the expected SHA256 digest over a separate, trusted channel (e.g. over \
             a separate connection protected with TLS).",
        ),
    ]
}

pub(crate) fn flow_info_disclosure(ctx: &FlowCtx) -> Vec<GuidanceBlock> {
    vec![
        GuidanceBlock::discussion(
            "An attacker might try to spy on information as it flows between these components \
             (for example, as messages transit the public internet). For example:\n\
             - An attacker might try to read the contents of network packets flowing through a \
             router that they previously compromised.\n\
             - An attacker might try to read the contents of environment variables passed from \
             one process to another.\n\
             - An attacker might try to read the contents of data sent over a pipe from one \
             process to another.\n\
             - An attacker might try to attach a bus sniffer to a hardware bus connecting \
             multiple integrated circuits on a circuit board to extract confidential keys or \
             secrets sent between them.",
        ),
        GuidanceBlock::tip(format!(
            "Consider having {} and {} protect the contents of messages exchanged between them \
             using a security control that provides confidentiality (e.g. encryption). For \
             example:\n\
             - When using TCP, TLS provides confidentiality through encryption. See OWASP's \
             Transport Layer Protection cheat sheet for specific guidance.\n\
             - When using UDP, dTLS provides confidentiality through encryption similar to \
             that of TLS.",
            ctx.source, ctx.dest
        )),
        GuidanceBlock::warning(
            "When establishing encryption keys with a remote system, be mindful of how certain \
             you are that you established an encrypted connection with a system that you trust. \
             For example, even when using TLS to encrypt messages sent over a network, if the \
             remote system is not properly authenticated first by verifying the certificate \
             they present, then an attacker can simply spoof the identity of the remote system \
             in order to trick the client into sharing encryption keys with them.",
        ),
    ]
}

pub(crate) fn flow_denial_of_service(ctx: &FlowCtx) -> Vec<GuidanceBlock> {
    vec![
        GuidanceBlock::discussion(
            "An attacker might try to disrupt the exchange of information between these \
             components (for example, as messages transit the public internet). For example:\n\
             - An attacker might try to send large volumes of data over a network in order to \
             delay legitimate messages from getting through.\n\
             - An attacker (or even someone making a mistake) might try to disconnect a \
             network route between two components in order to prevent them from exchanging \
             information.",
        ),
        GuidanceBlock::tip(format!(
            "Typical strategies for defending against excessive network traffic saturating a \
             data link include placing high capacity traffic filters in front of finite \
             capacity data links in order to drop illegitimate packets before they consume \
             capacity of the backbone link. DDoS protection services typically place many such \
             traffic filters around the globe and use DNS to route clients to the nearest one \
             in order to defend their networks. Also consider what would happen in the event \
             of an accidental network disruption between {src} and {dst} - would they be able \
             to fail over to a separate redundant network link? To separate redundant \
             instances (e.g. database failover)? Is your application designed such that \
             network errors would be detected and traffic shifted to healthy instances (e.g. \
             within a data center via a load balancer, or cross-region via a global router \
             like DNS)?",
            src = ctx.source,
            dst = ctx.dest
        )),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
