use crate::{BITCODE_SERIALIZER_CODE, Serializer, SerializerError};
use bitcode::{Decode, Encode};
use serde_json::{Map, Number, Value};

/// Nesting beyond this depth is rejected when decoding.
const MAX_NESTING_DEPTH: usize = 128;

/// A compact binary serializer built on `bitcode`.
///
/// Values are flattened into a pre-order token stream so the encoded schema
/// stays non-recursive: `Array(n)` is followed by `n` values and `Object(n)`
/// by `n` key/value pairs, each key being a `Text` token.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitcodeSerializer;

#[derive(Encode, Decode, Debug, PartialEq)]
enum ValueToken {
    Null,
    Bool(bool),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
    Array(u32),
    Object(u32),
}

#[derive(Encode, Decode, Debug, PartialEq)]
struct ValueStream {
    tokens: Vec<ValueToken>,
}

impl Serializer for BitcodeSerializer {
    fn code(&self) -> u8 {
        BITCODE_SERIALIZER_CODE
    }

    fn name(&self) -> &'static str {
        "bitcode"
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, SerializerError> {
        let mut tokens = Vec::new();
        flatten(value, &mut tokens)?;
        Ok(bitcode::encode(&ValueStream { tokens }))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, SerializerError> {
        let stream: ValueStream = bitcode::decode(bytes)?;
        let mut tokens = stream.tokens.into_iter();

        let value = rebuild(&mut tokens, 0)?;
        if tokens.next().is_some() {
            return Err(SerializerError::MalformedStream("trailing tokens"));
        }
        Ok(value)
    }
}

fn flatten(value: &Value, tokens: &mut Vec<ValueToken>) -> Result<(), SerializerError> {
    match value {
        Value::Null => tokens.push(ValueToken::Null),
        Value::Bool(b) => tokens.push(ValueToken::Bool(*b)),
        Value::Number(n) => tokens.push(number_token(n)?),
        Value::String(s) => tokens.push(ValueToken::Text(s.clone())),
        Value::Array(items) => {
            tokens.push(ValueToken::Array(items.len() as u32));
            for item in items {
                flatten(item, tokens)?;
            }
        }
        Value::Object(map) => {
            tokens.push(ValueToken::Object(map.len() as u32));
            for (key, item) in map {
                tokens.push(ValueToken::Text(key.clone()));
                flatten(item, tokens)?;
            }
        }
    }
    Ok(())
}

fn number_token(n: &Number) -> Result<ValueToken, SerializerError> {
    if let Some(u) = n.as_u64() {
        Ok(ValueToken::Unsigned(u))
    } else if let Some(i) = n.as_i64() {
        Ok(ValueToken::Signed(i))
    } else {
        n.as_f64()
            .map(ValueToken::Float)
            .ok_or(SerializerError::MalformedStream("unrepresentable number"))
    }
}

fn rebuild<I>(tokens: &mut I, depth: usize) -> Result<Value, SerializerError>
where
    I: ExactSizeIterator<Item = ValueToken>,
{
    if depth > MAX_NESTING_DEPTH {
        return Err(SerializerError::MalformedStream("nesting too deep"));
    }

    let token = tokens
        .next()
        .ok_or(SerializerError::MalformedStream("unexpected end of stream"))?;

    let value = match token {
        ValueToken::Null => Value::Null,
        ValueToken::Bool(b) => Value::Bool(b),
        ValueToken::Unsigned(u) => Value::Number(u.into()),
        ValueToken::Signed(i) => Value::Number(i.into()),
        ValueToken::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueToken::Text(s) => Value::String(s),
        ValueToken::Array(len) => {
            // Length is untrusted; never reserve more than what is left.
            let mut items = Vec::with_capacity((len as usize).min(tokens.len()));
            for _ in 0..len {
                items.push(rebuild(tokens, depth + 1)?);
            }
            Value::Array(items)
        }
        ValueToken::Object(len) => {
            let mut map = Map::new();
            for _ in 0..len {
                let key = match tokens.next() {
                    Some(ValueToken::Text(key)) => key,
                    Some(_) => {
                        return Err(SerializerError::MalformedStream("object key is not text"));
                    }
                    None => {
                        return Err(SerializerError::MalformedStream("unexpected end of stream"));
                    }
                };
                let item = rebuild(tokens, depth + 1)?;
                map.insert(key, item);
            }
            Value::Object(map)
        }
    };

    Ok(value)
}
