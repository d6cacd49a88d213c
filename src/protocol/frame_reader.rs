use crate::constants::{FIXED_HEADER_LENGTH, FRAME_PREFIX_LENGTH};
use crate::protocol::{ProtocolError, frame_lengths};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Reads one complete frame (header first, then the declared remainder).
///
/// Returns `Ok(None)` when the peer closed the stream cleanly before the
/// first byte of a new frame. A stream ending mid-frame is an error.
pub async fn read_frame<R>(
    reader: &mut R,
    max_frame_length: usize,
) -> Result<Option<Vec<u8>>, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = [0u8; FRAME_PREFIX_LENGTH];
    let mut filled = 0;

    while filled < FRAME_PREFIX_LENGTH {
        let n = reader.read(&mut prefix[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(ProtocolError::Truncated {
                expected: FRAME_PREFIX_LENGTH,
                actual: filled,
            });
        }
        filled += n;
    }

    let (head_length, body_length) = frame_lengths(&prefix);

    if (head_length as usize) < FIXED_HEADER_LENGTH {
        return Err(ProtocolError::HeadLengthTooShort {
            head_length,
            minimum: FIXED_HEADER_LENGTH,
        });
    }

    let length = head_length as usize + body_length as usize;
    if length > max_frame_length {
        return Err(ProtocolError::FrameTooLarge {
            length,
            limit: max_frame_length,
        });
    }

    let mut frame = vec![0u8; length];
    frame[..FRAME_PREFIX_LENGTH].copy_from_slice(&prefix);
    reader.read_exact(&mut frame[FRAME_PREFIX_LENGTH..]).await?;

    tracing::trace!(head_length, body_length, "read frame");

    Ok(Some(frame))
}
