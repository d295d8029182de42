pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no records to build a lineage from")]
    EmptyInput,

    #[error("duplicate id: {name}")]
    DuplicateId { name: String },

    #[error("duplicate record id: {id}")]
    DuplicateRecordId { id: i64 },

    #[error("cyclic parentage: {name} is its own ancestor")]
    CyclicParentage { name: String },

    #[error("invalid ordinal: {name} has no year that orders it against its parent")]
    InvalidOrdinal { name: String },

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}
