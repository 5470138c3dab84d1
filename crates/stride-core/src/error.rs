use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrideError {
    #[error("component not found: {0}")]
    ComponentNotFound(String),

    #[error("component already exists: {0}")]
    DuplicateComponent(String),

    #[error("a component cannot exchange data with itself: {0}")]
    SelfFlow(String),

    #[error("data flow '{flow}' references unknown component '{component}'")]
    UnknownFlowEndpoint { flow: String, component: String },

    #[error("unknown trait '{0}': expected one of out_of_scope, azure_resource, my_code_runs_here, acts_as_a_client, acts_as_a_server")]
    UnknownTrait(String),

    #[error("task list not found: {0}")]
    TaskListNotFound(String),

    #[error("task list inheritance cycle involving '{0}'")]
    TaskListCycle(String),

    #[error("no question at path: {0}")]
    QuestionNotFound(String),

    #[error("invalid question path '{0}': expected dot-separated indices")]
    InvalidPath(String),

    #[error("checklist schema could not be compiled: {0}")]
    Schema(String),

    #[error("checklist does not conform to expected schema")]
    SchemaInvalid { messages: Vec<String> },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StrideError>;
