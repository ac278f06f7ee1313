use async_trait::async_trait;
use ethers::types::U256;
use rln_types::RlnResult;
use tokio::sync::mpsc;

/// Decoded `MemberRegistered` arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventArgs {
    pub id_commitment: U256,
    pub index: U256,
}

/// A registry log as delivered by the chain client, before validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEvent {
    pub block_number: Option<u64>,
    pub removed: bool,
    pub args: Option<EventArgs>,
}

/// Where membership events come from.
///
/// `query` covers inclusive block ranges; `None` bounds mean "from genesis"
/// and "up to head". `subscribe` delivers live batches serially.
#[async_trait]
pub trait LogSource: Send + Sync {
    async fn block_number(&self) -> RlnResult<u64>;

    async fn query(&self, from_block: Option<u64>, to_block: Option<u64>) -> RlnResult<Vec<RawEvent>>;

    async fn subscribe(&self) -> RlnResult<mpsc::Receiver<Vec<RawEvent>>>;
}
