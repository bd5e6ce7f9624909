use super::*;
use crate::growth::policy::GrowthPolicy;
use crate::growth::recipe::RecipePreset;
use crate::host::raster::RasterHost;
use crate::host::sink::FrameSink;
use crate::host::source::FrameSource;
use image::{Rgba, RgbaImage};

fn dot(w: u32, h: u32, x: u32, y: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |px, py| {
        if (px, py) == (x, y) {
            Rgba([200, 200, 200, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

#[test]
fn validate_rejects_unrunnable_options() {
    let recipe = Recipe::uniform(GrowthPolicy::AnyNeighbor, 2);

    let mut opts = BorderOpts::new(recipe.clone());
    opts.thickness = 3;
    assert!(matches!(Border::new(opts), Err(BorderError::Validation(_))));

    let mut opts = BorderOpts::new(recipe.clone());
    opts.targets = 0;
    assert!(Border::new(opts).is_err());

    let mut opts = BorderOpts::new(recipe.clone());
    opts.generators = Some(0);
    assert!(Border::new(opts).is_err());

    let opts = BorderOpts::new(recipe.clone()).with_timeline(FrameRange {
        start: FrameIndex(4),
        end: FrameIndex(4),
    });
    assert!(Border::new(opts).is_err());

    assert!(Border::new(BorderOpts::new(Recipe::default())).is_err());
    assert!(Border::new(BorderOpts::new(recipe)).is_ok());
}

#[test]
fn single_frame_run_leaves_border_on_the_target() {
    let host = RasterHost::new(vec![dot(7, 7, 3, 3)]).unwrap();
    let mut opts = BorderOpts::new(Recipe::from_preset(RecipePreset::Diamond, 1));
    opts.color = [255, 0, 0, 255];
    // Ignored without a timeline.
    opts.targets = 3;

    let (result, host) = Border::new(opts).unwrap().run(host);
    let report = result.unwrap();
    let surface = report.surface().expect("completed");
    assert_eq!(
        report.phases,
        vec![
            Phase::Setup,
            Phase::Extract,
            Phase::Grow,
            Phase::MakeTargets,
            Phase::Write,
            Phase::Finalize,
            Phase::Done,
        ]
    );
    assert_eq!(
        (report.frames_read, report.frames_grown, report.frames_written),
        (1, 1, 1)
    );
    assert_eq!(host.surface_ids(), vec![surface]);

    let frame = &host.surface(surface).unwrap().frames()[0];
    let red: Vec<(u32, u32)> = frame
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0 == [255, 0, 0, 255])
        .map(|(x, y, _)| (x, y))
        .collect();
    assert_eq!(red, vec![(3, 2), (2, 3), (4, 3), (3, 4)]);
}

#[test]
fn progress_counts_three_steps_per_frame() {
    let host = RasterHost::new(vec![dot(5, 5, 2, 2); 3]).unwrap();
    let timeline = host.timeline();
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let border = Border::new(
        BorderOpts::new(Recipe::uniform(GrowthPolicy::AnyNeighbor, 1)).with_timeline(timeline),
    )
    .unwrap()
    .with_progress(move |p| sink.lock().unwrap().push(*p));

    let (result, _host) = border.run(host);
    assert!(result.unwrap().is_completed());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 9);
    assert!(seen.iter().all(|p| p.steps_total == 9));
    let mut done: Vec<u64> = seen.iter().map(|p| p.steps_done).collect();
    done.sort_unstable();
    assert_eq!(done, (1..=9).collect::<Vec<_>>());
    assert_eq!(seen.iter().filter(|p| p.phase == Phase::Write).count(), 3);
}

#[test]
fn stop_before_run_rolls_back_setup() {
    let mut host = RasterHost::new(vec![dot(5, 5, 2, 2); 2]).unwrap();
    host.set_time(FrameIndex(1)).unwrap();
    let timeline = host.timeline();
    let border = Border::new(
        BorderOpts::new(Recipe::uniform(GrowthPolicy::AnyNeighbor, 1)).with_timeline(timeline),
    )
    .unwrap();
    border.status().stop_request();

    let (result, host) = border.run(host);
    let report = result.unwrap();
    assert_eq!(report.outcome, BorderOutcome::Cancelled);
    assert_eq!(report.phases, vec![Phase::Setup, Phase::Rollback]);
    assert_eq!(report.frames_read, 0);
    // Time restore and export directory removal.
    assert_eq!(report.rolled_back, 2);
    assert_eq!(host.current_time(), FrameIndex(1));
    assert!(host.surface_ids().is_empty());
}

#[test]
fn failed_target_creation_reports_reason() {
    struct NoSurfaces(RasterHost);

    impl FrameSource for NoSurfaces {
        fn canvas(&self) -> crate::foundation::core::Canvas {
            self.0.canvas()
        }
        fn current_time(&self) -> FrameIndex {
            self.0.current_time()
        }
        fn set_time(&mut self, time: FrameIndex) -> BorderResult<()> {
            self.0.set_time(time)
        }
        fn extract(
            &mut self,
            time: FrameIndex,
        ) -> BorderResult<(crate::foundation::core::OpacityMask, crate::foundation::core::Rect)>
        {
            self.0.extract(time)
        }
    }

    impl FrameSink for NoSurfaces {
        fn create_surface(&mut self, _name: &str) -> BorderResult<SurfaceId> {
            Err(BorderError::host("out of surfaces"))
        }
        fn remove_surface(&mut self, surface: SurfaceId) -> BorderResult<()> {
            self.0.remove_surface(surface)
        }
        fn commit(
            &mut self,
            surface: SurfaceId,
            rgba: &[u8],
            rect: crate::foundation::core::Rect,
        ) -> BorderResult<()> {
            self.0.commit(surface, rgba, rect)
        }
        fn refresh(&mut self) -> BorderResult<()> {
            self.0.refresh()
        }
        fn export_frame(&mut self, path: &std::path::Path, surface: SurfaceId) -> BorderResult<()> {
            self.0.export_frame(path, surface)
        }
        fn import_frames(
            &mut self,
            start: FrameIndex,
            paths: &[PathBuf],
        ) -> BorderResult<SurfaceId> {
            self.0.import_frames(start, paths)
        }
    }

    let host = NoSurfaces(RasterHost::new(vec![dot(5, 5, 2, 2)]).unwrap());
    let border = Border::new(BorderOpts::new(Recipe::uniform(GrowthPolicy::Always, 1))).unwrap();
    let (result, _host) = border.run(host);
    let report = result.unwrap();
    match &report.outcome {
        BorderOutcome::Failed { reasons } => {
            assert_eq!(reasons.len(), 1);
            assert!(reasons[0].starts_with("create target 0"), "{reasons:?}");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(report.phases.last(), Some(&Phase::Rollback));
    assert!(!report.phases.contains(&Phase::Write));
}
