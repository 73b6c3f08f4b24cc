use crate::hub::{normalize_token, TriggerHub};
use anyhow::Context;
use std::future::Future;
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_serial::{SerialPortBuilderExt, SerialStream};

/// Forward every line of `reader` to the hub until EOF. Returns the number
/// of tokens published.
pub async fn pump_lines<R: AsyncRead + Unpin>(reader: R, hub: &TriggerHub) -> anyhow::Result<u64> {
    let mut lines = BufReader::new(reader).lines();
    let mut published = 0;
    while let Some(line) = lines.next_line().await.context("read sensor line")? {
        let Some(token) = normalize_token(&line) else {
            continue;
        };
        let clients = hub.publish(token.to_string());
        log::debug!("[serial] {} -> {} client(s)", token, clients);
        published += 1;
    }
    Ok(published)
}

/// Open the sensor's serial port in raw mode at `baud`, 8N1.
pub fn open_serial(path: &Path, baud: u32) -> io::Result<SerialStream> {
    let port = tokio_serial::new(path.to_string_lossy(), baud)
        .data_bits(tokio_serial::DataBits::Eight)
        .parity(tokio_serial::Parity::None)
        .stop_bits(tokio_serial::StopBits::One)
        .flow_control(tokio_serial::FlowControl::None)
        .open_native_async()?;
    Ok(port)
}

/// Read from whatever `open` yields forever, calling it again `reopen` after
/// every EOF, read error or failed open.
pub async fn run_source<F, Fut, R>(name: String, mut open: F, hub: TriggerHub, reopen: Duration)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<R>>,
    R: AsyncRead + Unpin,
{
    loop {
        match open().await {
            Ok(reader) => {
                log::info!("[serial] reading {}", name);
                match pump_lines(reader, &hub).await {
                    Ok(n) => log::warn!("[serial] {} closed after {} triggers", name, n),
                    Err(e) => log::error!("[serial] {}: {:#}", name, e),
                }
            }
            Err(e) => log::error!("[serial] cannot open {}: {}", name, e),
        }
        tokio::time::sleep(reopen).await;
    }
}

/// Read the serial device forever, reopening it after every failure.
pub async fn run_device(path: &Path, baud: u32, hub: TriggerHub, reopen: Duration) {
    let name = format!("{} @ {} baud", path.display(), baud);
    run_source(name, || std::future::ready(open_serial(path, baud)), hub, reopen).await
}

/// Read triggers from stdin until it closes.
pub async fn run_stdin(hub: TriggerHub) -> anyhow::Result<()> {
    log::info!("[serial] reading stdin");
    let n = pump_lines(tokio::io::stdin(), &hub).await?;
    log::info!("[serial] stdin closed after {} triggers", n);
    Ok(())
}
