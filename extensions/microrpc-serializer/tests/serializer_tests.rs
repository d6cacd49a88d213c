use microrpc_serializer::{
    BITCODE_SERIALIZER_CODE, BitcodeSerializer, JSON_SERIALIZER_CODE, JsonSerializer, Serializer,
    SerializerError, SerializerExt, SerializerRegistry,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
struct Profile {
    id: u64,
    name: String,
    score: f64,
    delta: i32,
    tags: Vec<String>,
    attributes: BTreeMap<String, Option<bool>>,
}

fn sample_profile() -> Profile {
    Profile {
        id: 13,
        name: "hello".into(),
        score: 2.5,
        delta: -7,
        tags: vec!["a".into(), "b".into()],
        attributes: BTreeMap::from([("admin".into(), Some(true)), ("beta".into(), None)]),
    }
}

#[test]
fn json_serializer_typed_roundtrip() {
    let serializer = JsonSerializer;
    let bytes = serializer.encode_value(&sample_profile()).unwrap();

    assert_eq!(serializer.code(), JSON_SERIALIZER_CODE);
    assert!(std::str::from_utf8(&bytes).unwrap().contains("\"name\":\"hello\""));
    assert_eq!(serializer.decode_value::<Profile>(&bytes).unwrap(), sample_profile());
}

#[test]
fn bitcode_serializer_typed_roundtrip() {
    let serializer = BitcodeSerializer;
    let bytes = serializer.encode_value(&sample_profile()).unwrap();

    assert_eq!(serializer.code(), BITCODE_SERIALIZER_CODE);
    assert_eq!(serializer.decode_value::<Profile>(&bytes).unwrap(), sample_profile());
}

#[test]
fn bitcode_serializer_preserves_value_shapes() {
    let value = json!({
        "null": null,
        "big": u64::MAX,
        "neg": i64::MIN,
        "float": 0.125,
        "nested": [[], {}, [1, {"k": "v"}]],
    });

    let serializer = BitcodeSerializer;
    let decoded = serializer.decode(&serializer.encode(&value).unwrap()).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn decode_into_replaces_target() {
    let serializer = JsonSerializer;
    let bytes = serializer.encode_value(&sample_profile()).unwrap();

    let mut target = Profile::default();
    serializer.decode_into(&bytes, &mut target).unwrap();
    assert_eq!(target, sample_profile());
}

#[test]
fn decode_into_leaves_target_on_failure() {
    let serializer = JsonSerializer;
    let mut target = sample_profile();

    assert!(serializer.decode_into(b"{not json", &mut target).is_err());
    assert_eq!(target, sample_profile());
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(matches!(
        JsonSerializer.decode(b"\xff\x00"),
        Err(SerializerError::Json(_))
    ));
    assert!(matches!(
        BitcodeSerializer.decode(b""),
        Err(SerializerError::Bitcode(_))
    ));
}

#[test]
fn type_mismatch_is_reported() {
    let bytes = JsonSerializer.encode_value(&json!({"id": "not a number"})).unwrap();
    assert!(JsonSerializer.decode_value::<Profile>(&bytes).is_err());
}

#[test]
fn registry_defaults_to_json() {
    let registry = SerializerRegistry::with_defaults();

    assert_eq!(registry.codes(), vec![JSON_SERIALIZER_CODE]);
    assert_eq!(registry.get(JSON_SERIALIZER_CODE).unwrap().name(), "json");
}

#[test]
fn registry_reports_unsupported_codes() {
    let registry = SerializerRegistry::with_defaults();

    let err = registry.get(BITCODE_SERIALIZER_CODE).err().unwrap();
    assert!(matches!(err, SerializerError::Unsupported(BITCODE_SERIALIZER_CODE)));
    assert_eq!(err.to_string(), "unsupported serializer: code 2");
}

#[test]
fn registry_accepts_additional_codecs() {
    let mut registry = SerializerRegistry::with_defaults();
    assert!(registry.register(Arc::new(BitcodeSerializer)).is_none());
    assert!(registry.register(Arc::new(BitcodeSerializer)).is_some());

    assert_eq!(
        registry.codes(),
        vec![JSON_SERIALIZER_CODE, BITCODE_SERIALIZER_CODE]
    );
    assert!(registry.contains(BITCODE_SERIALIZER_CODE));
}
