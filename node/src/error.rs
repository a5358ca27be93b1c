use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(#[from] verity_store_lmdb::LmdbError),

    #[error("store error: {0}")]
    Store(#[from] verity_store::StoreError),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("HTTP server error: {0}")]
    Rpc(#[from] verity_rpc::RpcError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
