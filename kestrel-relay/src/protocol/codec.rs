//! A Tokio codec mapping byte streams to relay event streams.

use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

use kestrel_chain::{
    block::{Header, MAX_BLOCK_BYTES},
    transaction::ShortId,
};

use crate::constants::{HEADER_LEN, INLINE_TX_SENTINEL, MAGIC, MAX_INLINE_TX_BYTES};
use crate::error::RelayError;

use super::message::{Event, FrameKind, Message, OutboundBlock, TxRecord};
use super::version::{RelayMode, VersionParams};

/// A codec which produces relay events from byte streams and vice versa.
///
/// Decoding is stateful beyond frame boundaries: a cache-index block's
/// length field is a transaction count, and an abbreviated-hash block is
/// followed by bare length-prefixed records until END_BLOCK, so the decoder
/// must know the negotiated mode. Until [`Codec::reconfigure`] is called,
/// only version frames decode.
pub struct Codec {
    builder: Builder,
    state: DecodeState,
    /// An abbreviated-hash block is open: bare records may appear between
    /// frames until END_BLOCK.
    in_block: bool,
}

/// A builder for specifying [`Codec`] options.
pub struct Builder {
    /// The negotiated version parameters, if any.
    params: Option<&'static VersionParams>,
    /// The maximum allowable frame length.
    max_len: usize,
    /// An optional label to use for reporting metrics.
    metrics_label: Option<String>,
}

impl Codec {
    /// Return a builder for constructing a [`Codec`].
    pub fn builder() -> Builder {
        Builder {
            params: None,
            max_len: MAX_BLOCK_BYTES as usize,
            metrics_label: None,
        }
    }

    /// Reconfigure the codec after version negotiation fixes the relay
    /// mode and size limits.
    pub fn reconfigure(&mut self, params: &'static VersionParams) {
        self.builder.params = Some(params);
    }

    fn params(&self) -> Result<&'static VersionParams, RelayError> {
        self.builder
            .params
            .ok_or(RelayError::Protocol("data frame before version negotiation"))
    }
}

impl Builder {
    /// Finalize the builder and return a [`Codec`].
    pub fn finish(self) -> Codec {
        Codec {
            builder: self,
            state: DecodeState::Head,
            in_block: false,
        }
    }

    /// Configure the codec with already-negotiated version parameters.
    pub fn for_params(mut self, params: &'static VersionParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Configure the codec's maximum accepted frame length, in bytes.
    #[allow(dead_code)]
    pub fn with_max_body_len(mut self, len: usize) -> Self {
        self.max_len = len;
        self
    }

    /// Configure the codec for the given peer address.
    pub fn with_metrics_label(mut self, metrics_label: String) -> Self {
        self.metrics_label = Some(metrics_label);
        self
    }
}

// ======== Encoding =========

impl Encoder<Message> for Codec {
    type Error = RelayError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let start = dst.len();
        match &item {
            Message::Version(name) | Message::MaxVersion(name) => {
                if !name.is_ascii() {
                    return Err(RelayError::Internal("version strings are ascii"));
                }
                self.write_frame_header(dst, item.kind(), name.len())?;
                dst.extend_from_slice(name.as_bytes());
            }
            Message::Transaction(tx) => {
                self.write_frame_header(dst, FrameKind::Transaction, tx.len())?;
                dst.extend_from_slice(tx.bytes());
            }
            Message::EndBlock => {
                self.write_frame_header(dst, FrameKind::EndBlock, 0)?;
            }
            Message::Block(OutboundBlock::AbbrevHash {
                header,
                short_ids,
                fresh,
            }) => {
                let body_len = Header::len() + 4 + short_ids.len() * ShortId::len();
                self.write_frame_header(dst, FrameKind::Block, body_len)?;
                dst.extend_from_slice(&header.as_bytes()[..]);
                dst.put_u32(short_ids.len() as u32);
                for short_id in short_ids {
                    dst.extend_from_slice(&short_id.as_bytes()[..]);
                }
                // Transactions the peer is missing follow the block frame
                // as bare length-prefixed records.
                for tx in fresh {
                    if tx.len() > self.builder.max_len {
                        return Err(RelayError::Internal(
                            "transaction exceeded maximum block size",
                        ));
                    }
                    dst.put_u32(tx.len() as u32);
                    dst.extend_from_slice(tx.bytes());
                }
            }
            Message::Block(OutboundBlock::CacheId { header, records }) => {
                // A cache-index block's length field carries its record
                // count, not a byte length.
                put_frame_header(dst, FrameKind::Block, records.len() as u32);
                dst.extend_from_slice(&header.as_bytes()[..]);
                for record in records {
                    match record {
                        TxRecord::Cached(index) => {
                            debug_assert!(*index != INLINE_TX_SENTINEL);
                            dst.put_u16(*index);
                        }
                        TxRecord::Inline(tx) => {
                            if tx.len() >= MAX_INLINE_TX_BYTES {
                                return Err(RelayError::Internal(
                                    "transaction exceeded the 24-bit inline length",
                                ));
                            }
                            dst.put_u16(INLINE_TX_SENTINEL);
                            let len = tx.len() as u32;
                            dst.put_u8((len >> 16) as u8);
                            dst.put_u8((len >> 8) as u8);
                            dst.put_u8(len as u8);
                            dst.extend_from_slice(tx.bytes());
                        }
                    }
                }
            }
        }

        if let Some(label) = self.builder.metrics_label.clone() {
            metrics::counter!("bytes.written", "addr" => label).increment((dst.len() - start) as u64);
        }
        trace!(%item, len = dst.len() - start, "encoded message");
        Ok(())
    }
}

impl Codec {
    fn write_frame_header(
        &self,
        dst: &mut BytesMut,
        kind: FrameKind,
        body_len: usize,
    ) -> Result<(), RelayError> {
        if body_len > self.builder.max_len {
            return Err(RelayError::Internal("frame body exceeded maximum size"));
        }
        put_frame_header(dst, kind, body_len as u32);
        Ok(())
    }
}

fn put_frame_header(dst: &mut BytesMut, kind: FrameKind, length: u32) {
    dst.reserve(HEADER_LEN);
    dst.put_u32(MAGIC);
    dst.put_u32(kind as u32);
    dst.put_u32(length);
}

// ======== Decoding =========

#[derive(Copy, Clone, Debug)]
enum DecodeState {
    /// Expecting a 12-byte frame header.
    Head,
    /// Expecting `body_len` payload bytes.
    Body { kind: BodyKind, body_len: usize },
    /// Cache-index block: expecting the 80-byte header.
    CacheIdHeader { transaction_count: u32 },
    /// Cache-index block: expecting the next of `remaining` records.
    CacheIdRecords { remaining: u32 },
    /// Cache-index block: expecting `tx_len` inline transaction bytes.
    CacheIdInline { remaining: u32, tx_len: usize },
    /// Abbreviated-hash block: expecting a magic-prefixed frame or a bare
    /// length-prefixed record.
    AbbrevRecord,
    /// Abbreviated-hash block: expecting `tx_len` record bytes.
    AbbrevInline { tx_len: usize },
}

/// Frame kinds whose payload is a single contiguous body.
#[derive(Copy, Clone, Debug)]
enum BodyKind {
    Version,
    MaxVersion,
    Transaction,
    /// An abbreviated-hash block frame: header, count, short ids.
    AbbrevBlock,
}

impl Decoder for Codec {
    type Item = Event;
    type Error = RelayError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.state {
            DecodeState::Head => {
                // First check that the src buffer contains an entire header.
                if src.len() < HEADER_LEN {
                    trace!(?self.state, "src buffer does not have an entire header, waiting");
                    return Ok(None);
                }

                let header = src.split_to(HEADER_LEN);
                let mut header_reader = Cursor::new(&header);
                let magic = header_reader.read_u32::<BigEndian>()?;
                let kind = header_reader.read_u32::<BigEndian>()?;
                let length = header_reader.read_u32::<BigEndian>()? as usize;

                if magic != MAGIC {
                    return Err(RelayError::Framing("supplied magic did not meet expectations"));
                }
                let kind = FrameKind::from_u32(kind)
                    .ok_or(RelayError::Framing("unrecognized frame type"))?;
                // Applied uniformly, even where `length` is a transaction
                // count or a tiny version string.
                if length > self.builder.max_len {
                    return Err(RelayError::Framing("frame length exceeded maximum block size"));
                }

                if let Some(label) = self.builder.metrics_label.clone() {
                    metrics::counter!("bytes.read", "addr" => label)
                        .increment((length + HEADER_LEN) as u64);
                }
                trace!(%kind, length, "read frame header from src buffer");

                match kind {
                    FrameKind::Version => {
                        self.state = DecodeState::Body {
                            kind: BodyKind::Version,
                            body_len: length,
                        };
                    }
                    FrameKind::MaxVersion => {
                        self.state = DecodeState::Body {
                            kind: BodyKind::MaxVersion,
                            body_len: length,
                        };
                    }
                    FrameKind::Transaction => {
                        if length > self.params()?.max_free_tx_bytes {
                            return Err(RelayError::Protocol(
                                "loose transaction exceeded the negotiated size limit",
                            ));
                        }
                        self.state = DecodeState::Body {
                            kind: BodyKind::Transaction,
                            body_len: length,
                        };
                    }
                    FrameKind::Block => match self.params()?.mode {
                        RelayMode::AbbrevHash => {
                            if length < Header::len() + 4 {
                                return Err(RelayError::Framing(
                                    "block frame too short for a header and count",
                                ));
                            }
                            self.state = DecodeState::Body {
                                kind: BodyKind::AbbrevBlock,
                                body_len: length,
                            };
                        }
                        RelayMode::CacheId => {
                            self.state = DecodeState::CacheIdHeader {
                                transaction_count: length as u32,
                            };
                        }
                    },
                    FrameKind::EndBlock => {
                        if length != 0 {
                            return Err(RelayError::Framing("end-block frame carries a payload"));
                        }
                        self.in_block = false;
                        return Ok(Some(Event::EndBlock));
                    }
                }

                // Now that the state is updated, recurse to attempt body
                // decoding.
                self.decode(src)
            }
            DecodeState::Body { kind, body_len } => {
                if src.len() < body_len {
                    // Need to wait for the full body.
                    src.reserve(body_len - src.len());
                    return Ok(None);
                }

                let body = src.split_to(body_len);
                self.state = self.between_frames_state();

                match kind {
                    BodyKind::Version => Ok(Some(Event::Version(parse_version(&body)?))),
                    BodyKind::MaxVersion => Ok(Some(Event::MaxVersion(parse_version(&body)?))),
                    BodyKind::Transaction => Ok(Some(Event::Transaction(body.freeze()))),
                    BodyKind::AbbrevBlock => {
                        let header = Header::read_from(&body)
                            .map_err(|_| RelayError::Framing("not enough bytes in block header"))?;
                        let mut count_reader = Cursor::new(&body[Header::len()..]);
                        let count = count_reader.read_u32::<BigEndian>()? as usize;
                        if body_len != Header::len() + 4 + count * ShortId::len() {
                            return Err(RelayError::Framing(
                                "block frame length does not match its transaction count",
                            ));
                        }
                        let mut short_ids = Vec::with_capacity(count);
                        let ids = &body[Header::len() + 4..];
                        for i in 0..count {
                            short_ids.push(ShortId::from_slice(&ids[i * ShortId::len()..]));
                        }
                        self.in_block = true;
                        self.state = DecodeState::AbbrevRecord;
                        Ok(Some(Event::BlockAnnounce { header, short_ids }))
                    }
                }
            }
            DecodeState::CacheIdHeader { transaction_count } => {
                if src.len() < Header::len() {
                    return Ok(None);
                }
                let bytes = src.split_to(Header::len());
                let header =
                    Header::read_from(&bytes).expect("split_to yielded a full block header");
                self.state = if transaction_count > 0 {
                    DecodeState::CacheIdRecords {
                        remaining: transaction_count,
                    }
                } else {
                    DecodeState::Head
                };
                Ok(Some(Event::BlockStart {
                    header,
                    transaction_count,
                }))
            }
            DecodeState::CacheIdRecords { remaining } => {
                if src.len() < 2 {
                    return Ok(None);
                }
                let index = u16::from_be_bytes([src[0], src[1]]);
                if index == INLINE_TX_SENTINEL {
                    // Consume the sentinel and the 24-bit length together
                    // so a partial read rewinds cleanly.
                    if src.len() < 5 {
                        return Ok(None);
                    }
                    src.advance(2);
                    let tx_len =
                        ((src[0] as usize) << 16) | ((src[1] as usize) << 8) | src[2] as usize;
                    src.advance(3);
                    if tx_len > self.builder.max_len {
                        return Err(RelayError::Framing(
                            "inline transaction length exceeded maximum block size",
                        ));
                    }
                    self.state = DecodeState::CacheIdInline { remaining, tx_len };
                    self.decode(src)
                } else {
                    src.advance(2);
                    self.state = match remaining - 1 {
                        0 => DecodeState::Head,
                        remaining => DecodeState::CacheIdRecords { remaining },
                    };
                    Ok(Some(Event::BlockTxCached(index)))
                }
            }
            DecodeState::CacheIdInline { remaining, tx_len } => {
                if src.len() < tx_len {
                    src.reserve(tx_len - src.len());
                    return Ok(None);
                }
                let bytes = src.split_to(tx_len);
                self.state = match remaining - 1 {
                    0 => DecodeState::Head,
                    remaining => DecodeState::CacheIdRecords { remaining },
                };
                Ok(Some(Event::BlockTxInline(bytes.freeze())))
            }
            DecodeState::AbbrevRecord => {
                if src.len() < 4 {
                    return Ok(None);
                }
                // Inside an abbreviated-hash block, frame headers are
                // optional: only a token starting with the magic is one.
                if src[..4] == MAGIC.to_be_bytes() {
                    self.state = DecodeState::Head;
                    return self.decode(src);
                }
                let tx_len = u32::from_be_bytes([src[0], src[1], src[2], src[3]]) as usize;
                src.advance(4);
                if tx_len > self.builder.max_len {
                    return Err(RelayError::Framing(
                        "inline transaction length exceeded maximum block size",
                    ));
                }
                self.state = DecodeState::AbbrevInline { tx_len };
                self.decode(src)
            }
            DecodeState::AbbrevInline { tx_len } => {
                if src.len() < tx_len {
                    src.reserve(tx_len - src.len());
                    return Ok(None);
                }
                let bytes = src.split_to(tx_len);
                self.state = DecodeState::AbbrevRecord;
                Ok(Some(Event::BlockTxInline(bytes.freeze())))
            }
        }
    }
}

impl Codec {
    /// The resting state between frames: plain headers, unless an
    /// abbreviated-hash block is still open.
    fn between_frames_state(&self) -> DecodeState {
        if self.in_block {
            DecodeState::AbbrevRecord
        } else {
            DecodeState::Head
        }
    }
}

fn parse_version(body: &[u8]) -> Result<String, RelayError> {
    let name = std::str::from_utf8(body)
        .map_err(|_| RelayError::Framing("version string is not ascii"))?;
    if !name.is_ascii() {
        return Err(RelayError::Framing("version string is not ascii"));
    }
    Ok(name.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::version;

    use std::sync::Arc;

    use futures::prelude::*;
    use kestrel_chain::transaction::Transaction;

    fn cache_id_codec() -> Codec {
        Codec::builder()
            .for_params(version::lookup("dashing dingo").unwrap())
            .finish()
    }

    fn abbrev_codec() -> Codec {
        Codec::builder()
            .for_params(version::lookup("charming chameleon").unwrap())
            .finish()
    }

    fn frame(kind: u32, payload: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(&MAGIC.to_be_bytes());
        bytes.extend_from_slice(&kind.to_be_bytes());
        bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        bytes.extend_from_slice(payload);
        bytes
    }

    fn decode_all(codec: &mut Codec, src: &mut BytesMut) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(event) = codec.decode(src).expect("input decodes cleanly") {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn version_message_round_trip() {
        let v = Message::Version("dashing dingo".to_owned());

        use tokio_util::codec::{FramedRead, FramedWrite};
        let mut bytes = Vec::new();
        {
            let mut fw = FramedWrite::new(
                std::io::Cursor::new(&mut bytes),
                Codec::builder().finish(),
            );
            fw.send(v).await.expect("message should be serialized");
        }

        let mut fr = FramedRead::new(std::io::Cursor::new(&bytes), Codec::builder().finish());
        let parsed = fr
            .next()
            .await
            .expect("a next event should be available")
            .expect("that event should deserialize");

        assert_eq!(parsed, Event::Version("dashing dingo".to_owned()));
    }

    #[test]
    fn bad_magic_is_a_framing_error() {
        let mut bytes = frame(0, b"dashing dingo");
        bytes[0] ^= 0xFF;
        let mut src = BytesMut::from(&bytes[..]);

        let mut codec = Codec::builder().finish();
        match codec.decode(&mut src) {
            Err(RelayError::Framing(_)) => {}
            other => panic!("expected framing error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_frame_type_is_a_framing_error() {
        let bytes = frame(9, b"");
        let mut src = BytesMut::from(&bytes[..]);

        let mut codec = Codec::builder().finish();
        assert!(matches!(
            codec.decode(&mut src),
            Err(RelayError::Framing(_))
        ));
    }

    #[test]
    fn oversized_length_is_a_framing_error() {
        // An empty-payload frame whose header claims a giant body.
        let mut bytes = frame(2, b"");
        bytes[8..12].copy_from_slice(&(MAX_BLOCK_BYTES as u32 + 1).to_be_bytes());
        let mut src = BytesMut::from(&bytes[..]);

        let mut codec = cache_id_codec();
        assert!(matches!(
            codec.decode(&mut src),
            Err(RelayError::Framing(_))
        ));
    }

    #[test]
    fn data_frame_before_negotiation_is_a_protocol_error() {
        let bytes = frame(1, &[0u8; 84]);
        let mut src = BytesMut::from(&bytes[..]);

        let mut codec = Codec::builder().finish();
        assert!(matches!(
            codec.decode(&mut src),
            Err(RelayError::Protocol(_))
        ));
    }

    #[test]
    fn nonempty_end_block_is_a_framing_error() {
        let bytes = frame(3, b"x");
        let mut src = BytesMut::from(&bytes[..]);

        let mut codec = cache_id_codec();
        assert!(matches!(
            codec.decode(&mut src),
            Err(RelayError::Framing(_))
        ));
    }

    /// A cache-index block mixing a cached reference and an inline
    /// transaction, terminated by END_BLOCK.
    fn cache_id_session() -> (Vec<u8>, Vec<Event>) {
        let header = Header::from_bytes_exact([0x11; 80]);
        let inline = Transaction::from_bytes(vec![0xAB; 5]);

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC.to_be_bytes());
        bytes.extend_from_slice(&1u32.to_be_bytes());
        // Length field is the record count.
        bytes.extend_from_slice(&2u32.to_be_bytes());
        bytes.extend_from_slice(&header.as_bytes()[..]);
        bytes.extend_from_slice(&3u16.to_be_bytes());
        bytes.extend_from_slice(&INLINE_TX_SENTINEL.to_be_bytes());
        bytes.extend_from_slice(&[0, 0, 5]);
        bytes.extend_from_slice(inline.bytes());
        bytes.extend_from_slice(&frame(3, b""));

        let events = vec![
            Event::BlockStart {
                header,
                transaction_count: 2,
            },
            Event::BlockTxCached(3),
            Event::BlockTxInline(inline.bytes().clone()),
            Event::EndBlock,
        ];
        (bytes, events)
    }

    #[test]
    fn cache_id_block_decodes_incrementally() {
        let (bytes, expected) = cache_id_session();
        let mut src = BytesMut::from(&bytes[..]);
        let mut codec = cache_id_codec();
        assert_eq!(decode_all(&mut codec, &mut src), expected);
        assert!(src.is_empty());
    }

    #[test]
    fn byte_at_a_time_decoding_matches_whole_buffer() {
        let (bytes, expected) = cache_id_session();

        let mut codec = cache_id_codec();
        let mut src = BytesMut::new();
        let mut events = Vec::new();
        for byte in bytes {
            src.extend_from_slice(&[byte]);
            events.extend(decode_all(&mut codec, &mut src));
        }

        assert_eq!(events, expected);
    }

    #[test]
    fn abbrev_block_with_follow_on_records() {
        let header = Header::from_bytes_exact([0x22; 80]);
        let cached = Transaction::from_bytes(vec![1, 2, 3]);
        let missing = Transaction::from_bytes(vec![4, 5, 6, 7]);
        let loose = Transaction::from_bytes(vec![9; 10]);

        let mut body = Vec::new();
        body.extend_from_slice(&header.as_bytes()[..]);
        body.extend_from_slice(&2u32.to_be_bytes());
        body.extend_from_slice(&cached.short_id().as_bytes()[..]);
        body.extend_from_slice(&missing.short_id().as_bytes()[..]);

        let mut bytes = frame(1, &body);
        // A bare record, then an interleaved magic-framed transaction,
        // then END_BLOCK.
        bytes.extend_from_slice(&(missing.len() as u32).to_be_bytes());
        bytes.extend_from_slice(missing.bytes());
        bytes.extend_from_slice(&frame(2, loose.bytes()));
        bytes.extend_from_slice(&frame(3, b""));

        let mut src = BytesMut::from(&bytes[..]);
        let mut codec = abbrev_codec();
        let events = decode_all(&mut codec, &mut src);

        assert_eq!(
            events,
            vec![
                Event::BlockAnnounce {
                    header,
                    short_ids: vec![cached.short_id(), missing.short_id()],
                },
                Event::BlockTxInline(missing.bytes().clone()),
                Event::Transaction(loose.bytes().clone()),
                Event::EndBlock,
            ]
        );
    }

    #[test]
    fn abbrev_block_count_mismatch_is_a_framing_error() {
        let mut body = Vec::new();
        body.extend_from_slice(&[0x33; 80]);
        body.extend_from_slice(&3u32.to_be_bytes());
        // Only one short id follows despite the count of three.
        body.extend_from_slice(&[0u8; 8]);

        let bytes = frame(1, &body);
        let mut src = BytesMut::from(&bytes[..]);
        let mut codec = abbrev_codec();
        assert!(matches!(
            codec.decode(&mut src),
            Err(RelayError::Framing(_))
        ));
    }

    #[test]
    fn oversized_loose_transaction_is_a_protocol_error() {
        // charming chameleon allows 10_000 bytes of loose transaction.
        let bytes = frame(2, &vec![0u8; 10_001]);
        let mut src = BytesMut::from(&bytes[..]);
        let mut codec = abbrev_codec();
        assert!(matches!(
            codec.decode(&mut src),
            Err(RelayError::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn cache_id_block_round_trip() {
        let header = Header::from_bytes_exact([0x44; 80]);
        let inline = Arc::new(Transaction::from_bytes(vec![0xCD; 9]));
        let outbound = OutboundBlock::CacheId {
            header,
            records: vec![TxRecord::Cached(7), TxRecord::Inline(inline.clone())],
        };

        use tokio_util::codec::{FramedRead, FramedWrite};
        let mut bytes = Vec::new();
        {
            let mut fw = FramedWrite::new(std::io::Cursor::new(&mut bytes), cache_id_codec());
            fw.send(Message::Block(outbound))
                .await
                .expect("block should be serialized");
            fw.send(Message::EndBlock)
                .await
                .expect("end-block should be serialized");
        }

        let mut fr = FramedRead::new(std::io::Cursor::new(&bytes), cache_id_codec());
        let mut events = Vec::new();
        while let Some(event) = fr.next().await {
            events.push(event.expect("events should deserialize"));
        }

        assert_eq!(
            events,
            vec![
                Event::BlockStart {
                    header,
                    transaction_count: 2,
                },
                Event::BlockTxCached(7),
                Event::BlockTxInline(inline.bytes().clone()),
                Event::EndBlock,
            ]
        );
    }
}
