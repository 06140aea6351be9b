use super::*;
use crate::media::source::MemoryFrameSource;

// Pixel (0, 0) carries the global frame index as (lo, hi, 7).
fn tagged(global: u64, w: u32, h: u32) -> Frame {
    let mut f = Frame::from_pixel(w, h, image::Rgb([0, 0, 0]));
    f.put_pixel(0, 0, image::Rgb([(global % 256) as u8, (global / 256) as u8, 7]));
    f
}

fn tag_of(f: &Frame) -> u64 {
    let p = f.get_pixel(0, 0);
    u64::from(p[0]) + 256 * u64::from(p[1])
}

fn source(first_global: u64, len: u64, fps: f64) -> MemoryFrameSource {
    let frames = (first_global..first_global + len)
        .map(|g| tagged(g, 4, 3))
        .collect();
    MemoryFrameSource::new(frames, fps).unwrap()
}

fn two_files() -> MultiStreamCapture<MemoryFrameSource> {
    MultiStreamCapture::from_sources(vec![source(0, 50, 10.0), source(50, 30, 10.0)]).unwrap()
}

#[test]
fn totals_and_properties() {
    let cap = two_files();
    assert_eq!(cap.total_frames(), 80);
    assert_eq!(cap.cumulative_frames(), &[50, 80]);
    assert_eq!(cap.get(CaptureProperty::FrameWidth).unwrap(), 4.0);
    assert_eq!(cap.get(CaptureProperty::FrameHeight).unwrap(), 3.0);
    assert_eq!(cap.get(CaptureProperty::Fps).unwrap(), 10.0);
    assert_eq!(cap.get(CaptureProperty::FrameCount).unwrap(), 80.0);
    assert_eq!(cap.get(CaptureProperty::PosFrames).unwrap(), 0.0);
    assert!(matches!(
        cap.get(CaptureProperty::FourCc),
        Err(ClipError::UnsupportedProperty(_))
    ));
    assert!(matches!(
        cap.get(CaptureProperty::PosMsec),
        Err(ClipError::UnsupportedProperty(_))
    ));
}

#[test]
fn every_seek_then_read_matches_concatenated_stream() {
    let mut cap = two_files();
    for f in 0..80 {
        cap.seek(f).unwrap();
        assert_eq!(cap.position(), f);
        let frame = cap.read().unwrap().expect("frame");
        assert_eq!(tag_of(&frame), f, "seek target {f}");
        assert_eq!(cap.last_read_frame(), Some(f));
    }
}

#[test]
fn reads_total_frames_then_ends() {
    let mut cap = two_files();
    for f in 0..80 {
        let frame = cap.read().unwrap().unwrap_or_else(|| panic!("read {f} failed"));
        assert_eq!(tag_of(&frame), f);
    }
    assert!(cap.read().unwrap().is_none());
    assert_eq!(cap.position(), 79);
}

#[test]
fn sequential_reads_cross_file_boundary() {
    let mut cap = two_files();
    cap.seek(45).unwrap();
    let tags: Vec<u64> = (0..10)
        .map(|_| tag_of(&cap.read().unwrap().unwrap()))
        .collect();
    assert_eq!(tags, (45..55).collect::<Vec<_>>());
    assert_eq!(cap.active_file_index(), 1);
}

#[test]
fn seek_back_into_first_file_after_crossing() {
    let mut cap = two_files();
    cap.seek(60).unwrap();
    assert_eq!(tag_of(&cap.read().unwrap().unwrap()), 60);
    cap.seek(3).unwrap();
    assert_eq!(cap.active_file_index(), 0);
    assert_eq!(tag_of(&cap.read().unwrap().unwrap()), 3);
}

#[test]
fn out_of_range_seeks_fail() {
    let mut cap = two_files();
    assert!(matches!(cap.seek(80), Err(ClipError::OutOfRange(_))));
    assert!(matches!(cap.seek(u64::MAX), Err(ClipError::OutOfRange(_))));
    assert!(matches!(
        cap.set(CaptureProperty::PosFrames, -1.0),
        Err(ClipError::OutOfRange(_))
    ));
    assert!(matches!(
        cap.set(CaptureProperty::PosFrames, 2.5),
        Err(ClipError::OutOfRange(_))
    ));
    assert!(matches!(
        cap.set(CaptureProperty::Fps, 25.0),
        Err(ClipError::UnsupportedProperty(_))
    ));
    cap.set(CaptureProperty::PosFrames, 79.0).unwrap();
    assert_eq!(tag_of(&cap.read().unwrap().unwrap()), 79);
    assert!(cap.read().unwrap().is_none());
}

#[test]
fn construction_rejects_empty_and_mismatched_lists() {
    assert!(matches!(
        MultiStreamCapture::<MemoryFrameSource>::from_sources(Vec::new()),
        Err(ClipError::Configuration(_))
    ));
    assert!(matches!(
        MultiStreamCapture::from_sources(vec![source(0, 5, 10.0), source(5, 5, 12.0)]),
        Err(ClipError::Configuration(_))
    ));
    let other_size = MemoryFrameSource::new(vec![tagged(0, 8, 3)], 10.0).unwrap();
    assert!(matches!(
        MultiStreamCapture::from_sources(vec![source(0, 5, 10.0), other_size]),
        Err(ClipError::Configuration(_))
    ));
    let empty: [&str; 0] = [];
    assert!(matches!(
        MultiStreamCapture::open(&empty),
        Err(ClipError::Configuration(_))
    ));
}

#[test]
fn open_fails_for_missing_file() {
    let err = MultiStreamCapture::open(&["/definitely/not/here.mp4"]).unwrap_err();
    assert!(matches!(err, ClipError::Configuration(_)));
}
