use super::*;
use crate::foundation::core::Rect;
use crate::host::proxy::HostService;
use crate::host::raster::RasterHost;
use crate::host::sink::FrameSink;
use image::RgbaImage;

const RED: [u8; 4] = [255, 0, 0, 255];

fn with_host<R>(
    host: RasterHost,
    f: impl FnOnce(&HostClient<RasterHost>) -> R,
) -> (R, RasterHost) {
    let (service, client) = HostService::new(host);
    std::thread::scope(|s| {
        let owner = s.spawn(move || service.run());
        let out = f(&client);
        drop(client);
        (out, owner.join().unwrap())
    })
}

fn ring_record(time: u64) -> BorderRecord {
    // 3x3 bounds at (1,1) with every pixel but the centre set.
    let mut data = vec![OpacityMask::OPAQUE; 9];
    data[4] = OpacityMask::TRANSPARENT;
    BorderRecord {
        delta: OpacityMask::new(3, data).unwrap(),
        time: FrameIndex(time),
        bounds: Rect::new(1, 1, 3, 3),
    }
}

fn queue(n: u64) -> RecordQueue<BorderRecord> {
    let q = RecordQueue::new();
    for t in 0..n {
        q.push(ring_record(t));
    }
    q
}

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "layer_border_writer_{tag}_{}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn commits_in_place_without_export() {
    let mut host = RasterHost::new(vec![RgbaImage::new(5, 5)]).unwrap();
    let target = host.create_surface("target").unwrap();
    let input = queue(3);
    let status = PipelineStatus::new();
    let opts = WriterOpts {
        color: RED,
        export_dir: None,
    };

    let pool = WriterPool::new(vec![target]).unwrap();
    let (report, host) = with_host(host, |client| {
        pool.run(client, &input, &status, &ProgressTracker::default(), &opts)
    });

    assert_eq!(report.written, 3);
    assert!(report.exported.is_empty());
    assert!(input.is_empty());
    // One refresh per iteration that had work.
    assert_eq!(host.refresh_count(), 3);

    let frame = &host.surface(target).unwrap().frames()[0];
    assert_eq!(frame.get_pixel(1, 1).0, RED);
    assert_eq!(frame.get_pixel(2, 2).0, [0; 4]);
    assert_eq!(frame.get_pixel(0, 0).0, [0; 4]);
}

#[test]
fn exports_every_frame_and_clears_targets() {
    let mut host = RasterHost::new(vec![RgbaImage::new(5, 5)]).unwrap();
    let targets = vec![
        host.create_surface("t0").unwrap(),
        host.create_surface("t1").unwrap(),
    ];
    let dir = scratch_dir("export");
    let input = queue(4);
    let status = PipelineStatus::new();
    let progress = ProgressTracker::new(4, None);
    let opts = WriterOpts {
        color: RED,
        export_dir: Some(dir.clone()),
    };

    let pool = WriterPool::new(targets.clone()).unwrap();
    let (report, host) = with_host(host, |client| {
        pool.run(client, &input, &status, &progress, &opts)
    });

    assert!(!status.is_failed(), "{:?}", status.reasons());
    assert_eq!(report.written, 4);
    assert_eq!(progress.steps_done(), 4);
    assert_eq!(host.refresh_count(), 2);

    let times: Vec<u64> = report.exported.iter().map(|(t, _)| t.0).collect();
    assert_eq!(times, vec![0, 1, 2, 3]);
    for (t, path) in &report.exported {
        assert_eq!(path, &dir.join(export_file_name(*t)));
        let img = image::open(path).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(1, 1).0, RED);
        assert_eq!(img.get_pixel(2, 2).0, [0; 4]);
    }
    for id in targets {
        let frame = &host.surface(id).unwrap().frames()[0];
        assert!(frame.pixels().all(|p| p.0 == [0; 4]));
    }

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn stopped_status_writes_nothing() {
    let mut host = RasterHost::new(vec![RgbaImage::new(5, 5)]).unwrap();
    let targets = vec![
        host.create_surface("t0").unwrap(),
        host.create_surface("t1").unwrap(),
        host.create_surface("t2").unwrap(),
    ];
    let input = queue(2);
    let status = PipelineStatus::new();
    status.stop_request();
    let opts = WriterOpts {
        color: RED,
        export_dir: None,
    };

    let pool = WriterPool::new(targets).unwrap();
    let (report, host) = with_host(host, |client| {
        pool.run(client, &input, &status, &ProgressTracker::default(), &opts)
    });
    assert_eq!(report.written, 0);
    assert_eq!(input.len(), 2);
    assert_eq!(host.refresh_count(), 0);
}

#[test]
fn failed_export_becomes_internal_stop() {
    let mut host = RasterHost::new(vec![RgbaImage::new(5, 5)]).unwrap();
    let target = host.create_surface("t0").unwrap();
    let missing = std::env::temp_dir().join(format!(
        "layer_border_writer_missing_{}/nested",
        std::process::id()
    ));
    let input = queue(3);
    let status = PipelineStatus::new();
    let opts = WriterOpts {
        color: RED,
        export_dir: Some(missing),
    };

    let pool = WriterPool::new(vec![target]).unwrap();
    let (report, _host) = with_host(host, |client| {
        pool.run(client, &input, &status, &ProgressTracker::default(), &opts)
    });
    assert!(status.is_failed());
    assert!(status.reasons()[0].starts_with("export frame 0"));
    assert!(report.exported.is_empty());
    // The worker stops pulling work after the failure.
    assert_eq!(report.written, 1);
    assert_eq!(input.len(), 2);
}

#[test]
fn empty_target_list_is_rejected() {
    assert!(matches!(
        WriterPool::new(Vec::new()),
        Err(BorderError::Validation(_))
    ));
}

#[test]
fn render_delta_paints_opaque_pixels_only() {
    let delta = OpacityMask::new(2, vec![0, 0xFF, 0xFF, 0]).unwrap();
    let rgba = render_delta(&delta, [1, 2, 3, 4]);
    assert_eq!(rgba, vec![0, 0, 0, 0, 1, 2, 3, 4, 1, 2, 3, 4, 0, 0, 0, 0]);
}
