use tokio::sync::broadcast;

/// Fan-out of trigger tokens to every connected client.
///
/// Delivery is at-most-once: a receiver that falls more than the channel
/// capacity behind loses the oldest tokens.
#[derive(Clone, Debug)]
pub struct TriggerHub {
    tx: broadcast::Sender<String>,
}

impl TriggerHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Returns the number of clients the token was queued for.
    pub fn publish(&self, token: String) -> usize {
        // no subscribers is not an error; the token is just dropped
        self.tx.send(token).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    #[inline]
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// One raw serial line as a trigger token: surrounding whitespace (including
/// the `\r` of CRLF lines) removed, blank lines dropped.
pub fn normalize_token(line: &str) -> Option<&str> {
    let token = line.trim();
    (!token.is_empty()).then_some(token)
}
