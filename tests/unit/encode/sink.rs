use super::*;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: 10.0,
        macro_block_size: 8,
    }
}

#[test]
fn config_requires_block_aligned_size() {
    cfg(64, 48).validate().unwrap();
    assert!(matches!(
        cfg(60, 48).validate(),
        Err(ClipError::Validation(_))
    ));
    let unaligned = SinkConfig {
        macro_block_size: 1,
        ..cfg(61, 47)
    };
    unaligned.validate().unwrap();
    let bad_fps = SinkConfig {
        fps: 0.0,
        ..cfg(64, 48)
    };
    assert!(bad_fps.validate().is_err());
}

#[test]
fn in_memory_sink_captures_frames_through_shared_handle() {
    let sink = InMemorySink::new();
    let frames = sink.frames();
    let mut boxed: Box<dyn FrameSink> = Box::new(sink.clone());

    boxed.begin(cfg(16, 8)).unwrap();
    boxed.push_frame(0, &Frame::new(16, 8)).unwrap();
    boxed.push_frame(1, &Frame::new(16, 8)).unwrap();
    assert!(matches!(
        boxed.push_frame(2, &Frame::new(8, 8)),
        Err(ClipError::SizeMismatch(_))
    ));
    boxed.end().unwrap();

    assert!(sink.is_ended());
    assert_eq!(frames.lock().unwrap().len(), 2);
    assert_eq!(sink.config().unwrap().width, 16);
}

#[test]
fn closures_are_sink_factories() {
    let factory = |_: &Path| -> ClipResult<Box<dyn FrameSink>> { Ok(Box::new(InMemorySink::new())) };
    let mut sink = factory.create(Path::new("out.mp4")).unwrap();
    sink.begin(cfg(8, 8)).unwrap();
    sink.end().unwrap();
}
