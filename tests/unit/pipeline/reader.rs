use super::*;
use crate::host::proxy::HostService;
use crate::host::raster::RasterHost;
use image::{Rgba, RgbaImage};

fn dot(x: u32, y: u32) -> RgbaImage {
    RgbaImage::from_fn(8, 6, |px, py| {
        if (px, py) == (x, y) {
            Rgba([1, 2, 3, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

fn read_all(
    layer: Vec<RgbaImage>,
    frames: &[FrameIndex],
    thickness: u32,
) -> (usize, Vec<FrameRecord>, PipelineStatus) {
    let (service, client) = HostService::new(RasterHost::new(layer).unwrap());
    let status = PipelineStatus::new();
    let out = RecordQueue::new();
    let read = std::thread::scope(|s| {
        let owner = s.spawn(move || service.run());
        let read = Reader::new(frames, thickness).run(
            &client,
            &status,
            &ProgressTracker::default(),
            &out,
        );
        drop(client);
        owner.join().unwrap();
        read
    });
    (read, out.drain(), status)
}

#[test]
fn pads_content_by_thickness_and_clips_to_canvas() {
    let frames = [FrameIndex(0), FrameIndex(1)];
    let (read, records, status) = read_all(vec![dot(4, 3), dot(0, 0)], &frames, 2);
    assert_eq!(read, 2);
    assert!(status.keep_running());

    assert_eq!(records[0].time, FrameIndex(0));
    assert_eq!(records[0].bounds, Rect::new(2, 1, 5, 5));
    assert!(records[0].mask.is_opaque(2, 2));
    assert_eq!(records[0].mask.opaque_count(), 1);

    assert_eq!(records[1].bounds, Rect::new(0, 0, 3, 3));
    assert!(records[1].mask.is_opaque(0, 0));
}

#[test]
fn empty_frame_still_produces_a_record() {
    let (read, records, _) = read_all(vec![RgbaImage::new(8, 6)], &[FrameIndex(0)], 3);
    assert_eq!(read, 1);
    assert!(records[0].bounds.is_empty());
    assert!(records[0].mask.is_empty());
}

#[test]
fn host_failure_stops_the_pipeline() {
    let frames = [FrameIndex(0), FrameIndex(5), FrameIndex(0)];
    let (read, records, status) = read_all(vec![dot(1, 1)], &frames, 1);
    assert_eq!(read, 1);
    assert_eq!(records.len(), 1);
    assert!(status.is_failed());
    assert!(status.reasons()[0].starts_with("read frame 5"));
}
