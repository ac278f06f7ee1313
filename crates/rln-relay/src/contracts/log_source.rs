use super::bindings::MemberRegisteredFilter;
use crate::sync::{poll_new_events, EventArgs, LogSource, RawEvent};
use async_trait::async_trait;
use ethers::{
    contract::{parse_log, EthEvent},
    providers::{Http, Middleware, Provider},
    types::{Address, BlockNumber, Filter, Log},
};
use rln_types::{RlnError, RlnResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

const LIVE_CHANNEL_CAPACITY: usize = 64;

/// Reads `MemberRegistered` logs of one registry through a JSON-RPC provider.
#[derive(Clone)]
pub struct EthersLogSource {
    provider: Arc<Provider<Http>>,
    address: Address,
    poll_interval: Duration,
}

impl EthersLogSource {
    pub fn new(provider: Arc<Provider<Http>>, address: Address, poll_interval: Duration) -> Self {
        Self {
            provider,
            address,
            poll_interval,
        }
    }

    fn filter(&self) -> Filter {
        Filter::new()
            .address(self.address)
            .event(&MemberRegisteredFilter::abi_signature())
    }
}

/// Logs whose payload does not decode still surface, with `args` unset.
pub(crate) fn decode_log(log: &Log) -> RawEvent {
    let args = match parse_log::<MemberRegisteredFilter>(log.clone()) {
        Ok(event) => Some(EventArgs {
            id_commitment: event.pubkey,
            index: event.index,
        }),
        Err(e) => {
            debug!("Undecodable registry log {:?}: {}", log.transaction_hash, e);
            None
        }
    };

    RawEvent {
        block_number: log.block_number.map(|b| b.as_u64()),
        removed: log.removed.unwrap_or(false),
        args,
    }
}

#[async_trait]
impl LogSource for EthersLogSource {
    async fn block_number(&self) -> RlnResult<u64> {
        self.provider
            .get_block_number()
            .await
            .map(|n| n.as_u64())
            .map_err(|e| RlnError::Network(format!("Failed to get block number: {}", e)))
    }

    async fn query(&self, from_block: Option<u64>, to_block: Option<u64>) -> RlnResult<Vec<RawEvent>> {
        let filter = self
            .filter()
            .from_block(from_block.map_or(BlockNumber::Earliest, BlockNumber::from))
            .to_block(to_block.map_or(BlockNumber::Latest, BlockNumber::from));

        let logs = self
            .provider
            .get_logs(&filter)
            .await
            .map_err(|e| RlnError::Network(format!("Failed to query registry logs: {}", e)))?;

        Ok(logs.iter().map(decode_log).collect())
    }

    /// Polls `get_logs` above the head seen at subscription time.
    async fn subscribe(&self) -> RlnResult<mpsc::Receiver<Vec<RawEvent>>> {
        let start = self.block_number().await?;
        let (tx, rx) = mpsc::channel(LIVE_CHANNEL_CAPACITY);

        info!(
            "Polling registry {:?} every {:?} from block {}",
            self.address, self.poll_interval, start
        );
        tokio::spawn(poll_new_events(
            Arc::new(self.clone()),
            start,
            self.poll_interval,
            tx,
        ));

        Ok(rx)
    }
}
