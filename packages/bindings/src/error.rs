use thiserror::Error;

#[derive(Debug, Error)]
pub enum AbiError {
    #[error("Unable to parse ABI of {contract}: {source}")]
    Parse {
        contract: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown fork: {0}")]
    UnknownFork(String),

    #[error("Unknown contract: {0}")]
    UnknownContract(String),

    #[error("{contract} has no function {name}")]
    UnknownFunction { contract: String, name: String },

    #[error("{contract} has several functions named {name}, use one of {candidates:?}")]
    AmbiguousFunction {
        contract: String,
        name: String,
        candidates: Vec<String>,
    },

    #[error("{contract} has no event {name}")]
    UnknownEvent { contract: String, name: String },

    #[error("{contract} has no error {name}")]
    UnknownError { contract: String, name: String },

    #[error("No known ABI item matches selector {0}")]
    UnknownSelector(String),

    #[error("Expected {expected} arguments for {signature}, got {actual}")]
    ArgumentCount {
        signature: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unable to resolve type of {param}: {source}")]
    ResolveType {
        param: String,
        #[source]
        source: alloy_dyn_abi::Error,
    },

    #[error("Unable to parse argument {index} as {ty}: {source}")]
    Coerce {
        index: usize,
        ty: String,
        #[source]
        source: alloy_dyn_abi::Error,
    },

    #[error("Unable to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: alloy_dyn_abi::Error,
    },

    #[error("Data too short to carry a selector ({0} bytes)")]
    DataTooShort(usize),

    #[error("Log has no topics")]
    MissingTopics,
}
