/*!
 * OSC Codec
 * Minimal Open Sound Control 1.0 message encoding/decoding
 *
 * Layout: padded address string, padded type-tag string (",ii..."),
 * then big-endian arguments. Strings are NUL-terminated and padded
 * to a multiple of four bytes.
 */

use super::message::ControlMessage;
use crate::core::errors::{ControlError, EmitError};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Decoded OSC argument
#[derive(Debug, Clone, PartialEq)]
pub enum OscArg {
    Int(i32),
    Float(f32),
    Str(String),
}

/// Decoded OSC message
#[derive(Debug, Clone, PartialEq)]
pub struct OscPacket {
    pub address: String,
    pub args: Vec<OscArg>,
}

#[inline]
fn padded_len(len: usize) -> usize {
    (len / 4 + 1) * 4
}

fn put_osc_string(buf: &mut BytesMut, s: &str) {
    buf.put_slice(s.as_bytes());
    buf.put_bytes(0, padded_len(s.len()) - s.len());
}

/// Encode a control message as an OSC datagram
pub fn encode(message: &ControlMessage) -> Result<Bytes, EmitError> {
    if !message.address.starts_with('/') {
        return Err(EmitError::Encoding(format!(
            "address '{}' must start with '/'",
            message.address
        )));
    }

    let tags: String = std::iter::once(',')
        .chain(std::iter::repeat('i').take(message.args.len()))
        .collect();

    let mut buf = BytesMut::with_capacity(
        padded_len(message.address.len()) + padded_len(tags.len()) + 4 * message.args.len(),
    );
    put_osc_string(&mut buf, &message.address);
    put_osc_string(&mut buf, &tags);
    for arg in &message.args {
        let value = i32::try_from(*arg)
            .map_err(|_| EmitError::Encoding(format!("argument {} exceeds int32", arg)))?;
        buf.put_i32(value);
    }
    Ok(buf.freeze())
}

fn take_osc_string(buf: &mut &[u8]) -> Result<String, ControlError> {
    let end = buf
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| ControlError::Malformed("unterminated string".into()))?;
    let s = std::str::from_utf8(&buf[..end])
        .map_err(|e| ControlError::Malformed(e.to_string()))?
        .to_string();
    let consumed = padded_len(end);
    if buf.remaining() < consumed {
        return Err(ControlError::Malformed("string padding truncated".into()));
    }
    buf.advance(consumed);
    Ok(s)
}

/// Decode an OSC message datagram (bundles are not supported)
pub fn decode(datagram: &[u8]) -> Result<OscPacket, ControlError> {
    let mut buf = datagram;
    let address = take_osc_string(&mut buf)?;
    if !address.starts_with('/') {
        return Err(ControlError::Malformed(format!(
            "'{}' is not an OSC address",
            address
        )));
    }

    // Type tags are optional in very old senders
    if buf.is_empty() {
        return Ok(OscPacket {
            address,
            args: Vec::new(),
        });
    }

    let tags = take_osc_string(&mut buf)?;
    let tags = tags
        .strip_prefix(',')
        .ok_or_else(|| ControlError::Malformed("type tag string must start with ','".into()))?;

    let mut args = Vec::with_capacity(tags.len());
    for tag in tags.chars() {
        match tag {
            'i' | 'f' if buf.remaining() < 4 => {
                return Err(ControlError::Malformed("argument truncated".into()));
            }
            'i' => args.push(OscArg::Int(buf.get_i32())),
            'f' => args.push(OscArg::Float(buf.get_f32())),
            's' => args.push(OscArg::Str(take_osc_string(&mut buf)?)),
            other => {
                return Err(ControlError::Malformed(format!(
                    "unsupported type tag '{}'",
                    other
                )));
            }
        }
    }

    Ok(OscPacket { address, args })
}
