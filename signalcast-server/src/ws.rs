//! WebSocket front end — accept loop and per-connection handlers.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{debug, info};

use crate::protocol::{parse_request, Request};
use crate::registry::OUTBOX_CAPACITY;
use crate::service::{DistributionHandle, ServerError};

/// Accept subscriber connections forever. Each connection runs in its own
/// task; a failed handshake or broken socket only affects that subscriber.
pub async fn serve(listener: TcpListener, handle: DistributionHandle) -> Result<(), ServerError> {
    info!(addr = %listener.local_addr()?, "distribution service listening");
    loop {
        let (stream, peer) = listener.accept().await?;
        let handle = handle.clone();
        tokio::spawn(async move {
            if let Err(err) = handle_connection(stream, peer, handle).await {
                debug!(%peer, %err, "subscriber connection ended");
            }
        });
    }
}

/// One subscriber: register an outbox, then forward pushes and answer
/// queries until the socket closes or the registry evicts us.
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    handle: DistributionHandle,
) -> Result<(), ServerError> {
    let ws = accept_async(stream).await?;
    let (mut outgoing, mut incoming) = ws.split();

    let (outbox_tx, mut outbox_rx) = mpsc::channel(OUTBOX_CAPACITY);
    let id = handle.subscribe(outbox_tx).await?;
    info!(%peer, subscriber = id, "subscriber connected");

    let result = async {
        loop {
            tokio::select! {
                pushed = outbox_rx.recv() => match pushed {
                    Some(text) => outgoing.send(Message::Text(text)).await?,
                    // Registry evicted this subscriber; close out.
                    None => break,
                },
                inbound = incoming.next() => match inbound {
                    Some(Ok(Message::Text(text))) => {
                        match parse_request(&text) {
                            Some(Request::History) => {
                                let reply = handle.history().await?;
                                outgoing.send(Message::Text(reply)).await?;
                            }
                            Some(Request::Latest) => {
                                if let Some(reply) = handle.latest().await? {
                                    outgoing.send(Message::Text(reply)).await?;
                                }
                            }
                            // Malformed request: no reply, connection stays open.
                            None => debug!(%peer, "ignoring unrecognized request"),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // ping/pong/binary frames need no handling
                    Some(Err(err)) => return Err(ServerError::from(err)),
                },
            }
        }
        Ok(())
    }
    .await;

    handle.unsubscribe(id).await;
    info!(%peer, subscriber = id, "subscriber disconnected");
    result
}
