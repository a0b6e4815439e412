//! Actor-based concurrency for the ledger
//!
//! One task owns the [`Metacoin`] instance and handles one message at a
//! time, so the balance check and the debit/credit of a transfer can never
//! interleave with another call.
//!
//! ```text
//!   LedgerHandle (Clone) ──┐
//!   LedgerHandle (Clone) ──┼── mpsc (bounded) ──▶ LedgerActor ──▶ Metacoin
//!   LedgerHandle (Clone) ──┘                          │
//!                                                     └── broadcast ──▶ subscribers
//! ```

use crate::{
    config::ActorConfig,
    contract::{Metacoin, TransferCall},
    metrics::Metrics,
    types::{Address, Balance, TransferEvent},
    Error, Ledger, Result,
};
use tokio::sync::{broadcast, mpsc, oneshot};

/// Message sent to the ledger actor
#[derive(Debug)]
pub enum LedgerMessage {
    /// Look up a balance
    BalanceOf {
        /// Account to look up
        account: Address,
        /// Reply channel
        response: oneshot::Sender<Balance>,
    },

    /// Apply a transfer
    Transfer {
        /// Authenticated caller
        from: Address,
        /// Call in any supported shape
        call: TransferCall,
        /// Reply channel
        response: oneshot::Sender<Result<TransferEvent>>,
    },

    /// Read the event log
    Events {
        /// Reply channel
        response: oneshot::Sender<Vec<TransferEvent>>,
    },

    /// Read the genesis supply
    TotalSupply {
        /// Reply channel
        response: oneshot::Sender<Balance>,
    },

    /// Copy the whole ledger state
    Snapshot {
        /// Reply channel
        response: oneshot::Sender<Ledger>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that processes ledger messages
#[derive(Debug)]
pub struct LedgerActor {
    /// Contract state
    metacoin: Metacoin,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<LedgerMessage>,

    /// Fan-out of applied transfers
    event_tx: broadcast::Sender<TransferEvent>,

    /// Metrics
    metrics: Metrics,
}

impl LedgerActor {
    /// Create new actor
    pub fn new(
        metacoin: Metacoin,
        mailbox: mpsc::Receiver<LedgerMessage>,
        event_tx: broadcast::Sender<TransferEvent>,
        metrics: Metrics,
    ) -> Self {
        Self {
            metacoin,
            mailbox,
            event_tx,
            metrics,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            if let LedgerMessage::Shutdown = msg {
                tracing::info!("Ledger actor shutting down");
                break;
            }
            self.handle_message(msg);
        }

        tracing::debug!(
            events = self.metacoin.ledger().events().len(),
            "Ledger actor stopped"
        );
    }

    /// Handle a single message
    fn handle_message(&mut self, msg: LedgerMessage) {
        match msg {
            LedgerMessage::BalanceOf { account, response } => {
                self.metrics.record_balance_query();
                let _ = response.send(self.metacoin.balances(&account));
            }

            LedgerMessage::Transfer { from, call, response } => {
                let result = self.metacoin.call(from, call);
                self.metrics.record_transfer(result.is_ok());

                if let Ok(event) = &result {
                    // No subscribers is fine
                    let _ = self.event_tx.send(event.clone());
                }
                let _ = response.send(result);
            }

            LedgerMessage::Events { response } => {
                let _ = response.send(self.metacoin.ledger().events().to_vec());
            }

            LedgerMessage::TotalSupply { response } => {
                let _ = response.send(self.metacoin.ledger().total_supply().clone());
            }

            LedgerMessage::Snapshot { response } => {
                let _ = response.send(self.metacoin.ledger().clone());
            }

            LedgerMessage::Shutdown => {
                // Handled in main loop
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Clone, Debug)]
pub struct LedgerHandle {
    sender: mpsc::Sender<LedgerMessage>,
    event_tx: broadcast::Sender<TransferEvent>,
}

impl LedgerHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<LedgerMessage>, event_tx: broadcast::Sender<TransferEvent>) -> Self {
        Self { sender, event_tx }
    }

    async fn request<T>(
        &self,
        message: impl FnOnce(oneshot::Sender<T>) -> LedgerMessage,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(message(tx))
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }

    /// Balance of an account
    pub async fn balance_of(&self, account: Address) -> Result<Balance> {
        self.request(|response| LedgerMessage::BalanceOf { account, response })
            .await
    }

    /// Submit a transfer in any call shape
    pub async fn transfer(&self, from: Address, call: TransferCall) -> Result<TransferEvent> {
        self.request(|response| LedgerMessage::Transfer { from, call, response })
            .await?
    }

    /// Event log in application order
    pub async fn events(&self) -> Result<Vec<TransferEvent>> {
        self.request(|response| LedgerMessage::Events { response })
            .await
    }

    /// Copy of the current ledger state
    pub async fn snapshot(&self) -> Result<Ledger> {
        self.request(|response| LedgerMessage::Snapshot { response })
            .await
    }

    /// Genesis supply
    pub async fn total_supply(&self) -> Result<Balance> {
        self.request(|response| LedgerMessage::TotalSupply { response })
            .await
    }

    /// Receive every transfer applied after this call
    pub fn subscribe(&self) -> broadcast::Receiver<TransferEvent> {
        self.event_tx.subscribe()
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(LedgerMessage::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        Ok(())
    }
}

/// Spawn the ledger actor
pub fn spawn_ledger_actor(metacoin: Metacoin, config: &ActorConfig, metrics: Metrics) -> LedgerHandle {
    let (tx, rx) = mpsc::channel(config.mailbox_capacity);
    let (event_tx, _) = broadcast::channel(config.event_channel_capacity);
    let actor = LedgerActor::new(metacoin, rx, event_tx.clone(), metrics);

    tokio::spawn(async move {
        actor.run().await;
    });

    LedgerHandle::new(tx, event_tx)
}
