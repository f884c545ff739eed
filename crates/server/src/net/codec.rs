//! Length-prefixed JSON frames.
//!
//! Each frame is a u32 big-endian payload length followed by the JSON bytes
//! of one message. Simple, explicit, and versionless -- the message catalogue
//! itself is the contract.

use anyhow::Context;
use bytes::{BufMut, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound on a single frame; anything larger is a protocol fault.
pub const MAX_FRAME_LEN: usize = 4 * 1024 * 1024;

/// Write one message as a frame.
pub async fn write_frame<W, T>(writer: &mut W, message: &T) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let payload = serde_json::to_vec(message).context("serialize frame")?;
    let mut buf = BytesMut::with_capacity(4 + payload.len());
    buf.put_u32(payload.len() as u32);
    buf.extend_from_slice(&payload);
    writer.write_all(&buf).await.context("write frame")?;
    Ok(())
}

/// Read one message. `Ok(None)` means the peer closed the stream at a frame
/// boundary; decode failures and oversized frames are hard errors that drop
/// the connection.
pub async fn read_frame<R, T>(reader: &mut R) -> anyhow::Result<Option<T>>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e).context("read frame length"),
    }

    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        anyhow::bail!("frame of {} bytes exceeds limit", len);
    }

    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .await
        .context("read frame payload")?;
    let message = serde_json::from_slice(&payload).context("decode frame")?;
    Ok(Some(message))
}
