use crate::hub::TriggerHub;
use futures_util::{stream, SinkExt, Stream, StreamExt};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_tungstenite::tungstenite::Message;

// Pause after a failed accept (e.g. out of file descriptors)
pub const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Accept WebSocket clients forever, one task per client.
pub async fn serve(listener: TcpListener, hub: TriggerHub) {
    let incoming = stream::unfold(listener, |listener| async move {
        let next = listener.accept().await;
        Some((next, listener))
    });
    serve_incoming(incoming, hub).await
}

/// Serve every connection `incoming` yields. Accept errors are logged and
/// skipped; only the end of the stream stops the loop.
pub async fn serve_incoming<I, S>(incoming: I, hub: TriggerHub)
where
    I: Stream<Item = io::Result<(S, SocketAddr)>>,
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    futures_util::pin_mut!(incoming);
    while let Some(next) = incoming.next().await {
        let (stream, peer) = match next {
            Ok(conn) => conn,
            Err(e) => {
                log::warn!("[ws] accept failed: {}", e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                continue;
            }
        };
        // subscribe before the handshake so no trigger after accept is lost
        let rx = hub.subscribe();
        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, peer, rx).await {
                log::warn!("[ws] {}: {}", peer, e);
            }
        });
    }
}

async fn handle_client<S>(
    stream: S,
    peer: SocketAddr,
    mut rx: broadcast::Receiver<String>,
) -> anyhow::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let ws = tokio_tungstenite::accept_async(stream).await?;
    log::info!("[ws] client connected: {}", peer);
    let (mut sink, mut source) = ws.split();

    loop {
        tokio::select! {
            token = rx.recv() => match token {
                Ok(token) => sink.send(Message::Text(token)).await?,
                Err(RecvError::Lagged(n)) => {
                    log::warn!("[ws] {} lagging, dropped {} trigger(s)", peer, n);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = source.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    log::warn!("[ws] {} error: {}", peer, e);
                    break;
                }
            },
        }
    }

    log::info!("[ws] client disconnected: {}", peer);
    Ok(())
}
