//! Event decoding and indexed-value filters.

use crate::{
    descriptor::{decode_params, ensure_canonical, EventSpec, ParamSpec},
    error::{BindError, EncodingError},
    value::{fits_declared_width, type_name},
};
use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{keccak256, Address, TxHash, B256};
use alloy_rpc_types_eth::{Filter, Log};

/// One decoded event field.
#[derive(Debug, Clone, PartialEq)]
pub struct EventField {
    pub name: String,
    pub value: DynSolValue,
    pub indexed: bool,
}

/// A decoded event together with the raw log it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub event: String,
    /// Fields in declaration order.
    pub fields: Vec<EventField>,
    pub address: Address,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<TxHash>,
    pub log_index: Option<u64>,
    pub log: Log,
}

impl EventRecord {
    pub fn get(&self, name: &str) -> Option<&DynSolValue> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    /// `(block number, log index)` of the log, when it has been mined.
    pub fn position(&self) -> Option<(u64, u64)> {
        log_position(&self.log)
    }
}

pub(crate) fn log_position(log: &Log) -> Option<(u64, u64)> {
    Some((log.block_number?, log.log_index?))
}

/// Topic encoding of an indexed value.
///
/// Value types occupy their 32-byte word; strings, bytes, arrays and tuples
/// are stored as the keccak hash of their packed encoding.
pub fn encode_topic(ty: &DynSolType, value: &DynSolValue) -> B256 {
    match ty {
        DynSolType::String
        | DynSolType::Bytes
        | DynSolType::Array(_)
        | DynSolType::FixedArray(..)
        | DynSolType::Tuple(_) => keccak256(value.abi_encode_packed()),
        _ => value
            .as_word()
            .unwrap_or_else(|| keccak256(value.abi_encode_packed())),
    }
}

/// Recover an indexed value from its topic.
///
/// Hashed types cannot be recovered and come back as the raw 32-byte topic.
fn decode_topic(context: &str, ty: &DynSolType, topic: &B256) -> Result<DynSolValue, BindError> {
    match ty {
        DynSolType::String
        | DynSolType::Bytes
        | DynSolType::Array(_)
        | DynSolType::FixedArray(..)
        | DynSolType::Tuple(_) => Ok(DynSolValue::FixedBytes(*topic, 32)),
        _ => {
            let value = ty
                .abi_decode(topic.as_slice())
                .map_err(|e| BindError::decode(context, e))?;
            ensure_canonical(context, &value, &value.abi_encode(), topic.as_slice())?;
            Ok(value)
        }
    }
}

/// Per indexed field, the set of acceptable topics. An empty set matches anything.
pub type TopicSets = Vec<Vec<B256>>;

impl EventSpec {
    /// Decode a raw log emitted for this event.
    pub fn decode(&self, log: &Log) -> Result<EventRecord, BindError> {
        let context = self.signature();
        let mut topics = log.topics().iter();

        if !self.is_anonymous() {
            match topics.next() {
                Some(topic) if *topic == self.selector() => {}
                Some(topic) => {
                    return Err(BindError::decode(
                        context,
                        format!("topic0 {topic} does not match {}", self.selector()),
                    ))
                }
                None => return Err(BindError::decode(context, "log has no topics")),
            }
        }

        let indexed = self.indexed_fields().count();
        if topics.len() != indexed {
            return Err(BindError::decode(
                context,
                format!("expected {indexed} indexed topics, got {}", topics.len()),
            ));
        }

        let body: Vec<ParamSpec> = self
            .fields()
            .iter()
            .filter(|field| !field.indexed)
            .map(|field| ParamSpec {
                name: field.name.clone(),
                ty: field.ty.clone(),
            })
            .collect();
        let mut body_values = decode_params(context, &body, &log.data().data)?.into_iter();

        let mut fields = Vec::with_capacity(self.fields().len());
        for field in self.fields() {
            let value = if field.indexed {
                let topic = topics
                    .next()
                    .ok_or_else(|| BindError::decode(context, "missing indexed topic"))?;
                decode_topic(context, &field.ty, topic)?
            } else {
                body_values
                    .next()
                    .ok_or_else(|| BindError::decode(context, "missing data field"))?
            };
            fields.push(EventField {
                name: field.name.clone(),
                value,
                indexed: field.indexed,
            });
        }

        Ok(EventRecord {
            event: self.name().to_string(),
            fields,
            address: log.address(),
            block_number: log.block_number,
            transaction_hash: log.transaction_hash,
            log_index: log.log_index,
            log: log.clone(),
        })
    }

    /// Type-check indexed value sets and encode them as topics.
    pub fn topic_sets(&self, values: &[Vec<DynSolValue>]) -> Result<TopicSets, EncodingError> {
        let indexed: Vec<_> = self.indexed_fields().collect();
        if values.len() > indexed.len() {
            return Err(EncodingError::TooManyTopics {
                event: self.signature().to_string(),
                indexed: indexed.len(),
                got: values.len(),
            });
        }

        indexed
            .iter()
            .zip(values)
            .map(|(field, set)| {
                set.iter()
                    .map(|value| {
                        if !field.ty.matches(value) {
                            return Err(EncodingError::TopicType {
                                event: self.signature().to_string(),
                                name: field.name.clone(),
                                expected: field.ty.sol_type_name().into_owned(),
                                got: type_name(value),
                            });
                        }
                        if !fits_declared_width(value) {
                            return Err(EncodingError::TopicRange {
                                event: self.signature().to_string(),
                                name: field.name.clone(),
                                expected: field.ty.sol_type_name().into_owned(),
                            });
                        }
                        Ok(encode_topic(&field.ty, value))
                    })
                    .collect()
            })
            .collect()
    }

    /// Node-side filter for this event at `address`.
    pub fn log_filter(&self, address: Address, topics: &TopicSets) -> Filter {
        let mut filter = Filter::new().address(address);
        let offset = self.topic_offset();
        if !self.is_anonymous() {
            filter = filter.event_signature(self.selector());
        }
        for (position, set) in topics.iter().enumerate() {
            if !set.is_empty() {
                filter.topics[offset + position] = set.clone().into();
            }
        }
        filter
    }

    /// Client-side check that a log belongs to this event and matches `topics`.
    pub fn matches(&self, log: &Log, topics: &TopicSets) -> bool {
        let log_topics = log.topics();
        if !self.is_anonymous() && log_topics.first() != Some(&self.selector()) {
            return false;
        }

        let offset = self.topic_offset();
        topics.iter().enumerate().all(|(position, set)| {
            set.is_empty()
                || log_topics
                    .get(offset + position)
                    .is_some_and(|topic| set.contains(topic))
        })
    }

    const fn topic_offset(&self) -> usize {
        if self.is_anonymous() {
            0
        } else {
            1
        }
    }
}
