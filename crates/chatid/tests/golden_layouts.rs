use chatid::{
    AspectRatio, DeviceId, Error, MediaId, MediaReference, MediaType, MessageId, MessageType,
    NodeId, PushId, RawId, Root, StickerRef,
};

fn sample_root() -> Root {
    Root::new(
        NodeId::from_components(1000, 7),
        NodeId::from_components(2000, 9),
        5,
        3000,
    )
}

fn sample_media() -> MediaId {
    MediaId::from_components(4000, 11, AspectRatio::new(0.75), MediaType::IMAGE)
}

#[test]
fn root_hex_vector() {
    assert_eq!(
        sample_root().to_hex(),
        concat!(
            "01",
            "05", "00000000000007d0", "00000009",
            "05", "00000000000003e8", "00000007",
            "0000000000000bb8", "00000000", "0005", "00"
        )
    );
}

#[test]
fn text_form_is_lowercase_and_exact_width() {
    let hexes = [
        (NodeId::from_components(-1, u32::MAX).to_hex(), NodeId::RAW_LEN),
        (sample_root().to_hex(), Root::RAW_LEN),
        (
            MessageId::from_components(MessageType::Placeholder, sample_root(), -1, 0xffff, 0xab)
                .to_hex(),
            MessageId::RAW_LEN,
        ),
        (sample_media().to_hex(), MediaId::RAW_LEN),
        (
            MediaReference::from_components(1, 2, sample_media(), true).to_hex(),
            MediaReference::RAW_LEN,
        ),
        (
            StickerRef::from_components(1, 2, NodeId::ZERO, sample_media(), true).to_hex(),
            StickerRef::RAW_LEN,
        ),
        (
            PushId::from_components(NodeId::ZERO, [0xff; 4], 1, 2).to_hex(),
            PushId::RAW_LEN,
        ),
        (DeviceId::new(NodeId::ZERO, [0xab; 4]).to_hex(), DeviceId::RAW_LEN),
    ];
    for (hex, len) in hexes {
        assert_eq!(hex.len(), 2 * len);
        assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}

#[test]
fn raw_lengths() {
    assert_eq!(NodeId::RAW_LEN, 13);
    assert_eq!(Root::RAW_LEN, 42);
    assert_eq!(MessageId::RAW_LEN, 56);
    assert_eq!(MediaId::RAW_LEN, 19);
    assert_eq!(MediaReference::RAW_LEN, 31);
    assert_eq!(StickerRef::RAW_LEN, 44);
    assert_eq!(PushId::RAW_LEN, 30);
    assert_eq!(DeviceId::RAW_LEN, 18);
}

#[test]
fn every_truncation_fails() {
    let raw = MessageId::from_components(MessageType::Chat, sample_root(), 1, 2, 3).encode();
    for len in 0..raw.len() {
        match MessageId::decode(&raw[..len]) {
            Err(Error::TruncatedInput { .. }) => {}
            other => panic!("length {len}: expected truncation, got {other:?}"),
        }
    }
}

#[test]
fn uppercase_hex_is_accepted() {
    let root = sample_root();
    assert_eq!(root.to_hex().to_uppercase().parse::<Root>(), Ok(root));
}

#[test]
fn odd_length_hex_is_malformed() {
    assert!(matches!(
        "050".parse::<NodeId>(),
        Err(Error::MalformedField { field: "hex", .. })
    ));
}

#[test]
fn within_one_kind_bytes_sort_by_time() {
    let mut ids: Vec<_> = [300, 100, 200]
        .into_iter()
        .map(|ts| NodeId::from_components(ts, 0).to_bytes())
        .collect();
    ids.sort();
    let decoded: Vec<i64> = ids
        .iter()
        .map(|raw| NodeId::decode(raw).map(|n| n.timestamp()))
        .collect::<Result<_, _>>()
        .expect("decode");
    assert_eq!(decoded, [100, 200, 300]);
}

#[test]
fn byte_order_is_chronological_only_from_the_epoch() {
    let before = NodeId::from_components(-1, 0).to_bytes();
    let epoch = NodeId::from_components(0, 0).to_bytes();
    let after = NodeId::from_components(1, 0).to_bytes();
    assert!(epoch < after);
    // two's complement puts the sign bit first
    assert!(before > after);
}
