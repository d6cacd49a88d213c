use microrpc::constants::MAX_FRAME_LENGTH;
use microrpc::protocol::{ProtocolError, Request, Response, read_frame};
use tokio::io::AsyncWriteExt;

fn encoded_request(data: &[u8]) -> Vec<u8> {
    let mut request = Request::new("svc", "Echo");
    request.data = data.to_vec();
    request.calculate_lengths();
    request.encode()
}

#[tokio::test]
async fn reads_back_to_back_frames() {
    let first = encoded_request(b"first");
    let second = encoded_request(b"second payload");

    let mut stream = Vec::new();
    stream.extend_from_slice(&first);
    stream.extend_from_slice(&second);
    let mut reader = stream.as_slice();

    let a = read_frame(&mut reader, MAX_FRAME_LENGTH).await.unwrap();
    let b = read_frame(&mut reader, MAX_FRAME_LENGTH).await.unwrap();
    let end = read_frame(&mut reader, MAX_FRAME_LENGTH).await.unwrap();

    assert_eq!(a.as_deref(), Some(first.as_slice()));
    assert_eq!(b.as_deref(), Some(second.as_slice()));
    assert!(end.is_none());
}

#[tokio::test]
async fn reassembles_frames_split_across_writes() {
    let frame = encoded_request(b"split me");
    let (mut client, mut server) = tokio::io::duplex(4);

    let writer = tokio::spawn({
        let frame = frame.clone();
        async move {
            for chunk in frame.chunks(3) {
                client.write_all(chunk).await.unwrap();
            }
        }
    });

    let read = read_frame(&mut server, MAX_FRAME_LENGTH).await.unwrap();
    writer.await.unwrap();

    let request = Request::decode(&read.unwrap()).unwrap();
    assert_eq!(request.data, b"split me");
}

#[tokio::test]
async fn stream_ending_inside_prefix_is_truncated() {
    let frame = encoded_request(b"x");
    let mut reader = &frame[..5];

    let result = read_frame(&mut reader, MAX_FRAME_LENGTH).await;
    assert!(matches!(
        result,
        Err(ProtocolError::Truncated {
            expected: 8,
            actual: 5
        })
    ));
}

#[tokio::test]
async fn stream_ending_inside_body_is_an_io_error() {
    let frame = encoded_request(b"0123456789");
    let mut reader = &frame[..frame.len() - 4];

    let result = read_frame(&mut reader, MAX_FRAME_LENGTH).await;
    assert!(matches!(result, Err(ProtocolError::Io(_))));
}

#[tokio::test]
async fn oversized_frame_is_rejected_before_allocation() {
    let mut response = Response::new();
    response.data = vec![0u8; 128];
    response.calculate_lengths();
    let frame = response.encode();
    let mut reader = frame.as_slice();

    let result = read_frame(&mut reader, 64).await;
    assert!(matches!(
        result,
        Err(ProtocolError::FrameTooLarge { limit: 64, .. })
    ));
}
