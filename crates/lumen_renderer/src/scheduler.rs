//! Row-parallel render scheduling.
//!
//! Workers claim whole image rows from a shared atomic counter, render them
//! into disjoint slices of the framebuffer, and bump a second counter that
//! the calling thread polls to drive the progress display.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crate::progress::{format_duration, ProgressEstimator, ProgressSnapshot};
use crate::renderer::render_row;
use crate::{Camera, Color, Framebuffer, Hittable, RenderError, RenderResult};
use lumen_core::{RenderMode, RenderSettings};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// How long the coordinator sleeps between checks of the row counter.
pub const POLL_INTERVAL: Duration = Duration::from_millis(25);
/// Minimum time between two progress lines.
pub const REPORT_INTERVAL: Duration = Duration::from_millis(150);

/// Summary of a finished render written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub threads: usize,
    pub samples_per_pixel: u32,
    pub render_time: Duration,
    pub write_time: Duration,
    pub total_time: Duration,
}

/// Render `world` as seen by the configured camera.
///
/// Blocks until every row is finished. With `settings.seed` set, the result
/// is identical for any worker count.
pub fn render(world: &dyn Hittable, settings: &RenderSettings) -> RenderResult<Framebuffer> {
    settings.validate()?;

    let camera = Camera::new(&settings.camera);
    let threads = settings.thread_count();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|index| format!("lumen-render-{}", index))
        .build()?;

    let width = camera.image_width();
    let height = camera.image_height() as usize;
    let mut framebuffer = Framebuffer::new(width, camera.image_height(), camera.samples_per_pixel());

    let next_row = AtomicUsize::new(0);
    let rows_done = AtomicUsize::new(0);
    let workers_exited = AtomicUsize::new(0);

    {
        // Each row is claimed exactly once, so these locks are never contended
        let rows: Vec<Mutex<&mut [Color]>> = framebuffer.rows_mut().map(Mutex::new).collect();

        let job = RowJob {
            camera: &camera,
            world,
            mode: settings.mode,
            seed: settings.seed,
            rows: &rows,
            next_row: &next_row,
            rows_done: &rows_done,
        };

        pool.in_place_scope(|scope| {
            for _ in 0..threads {
                let job = &job;
                let exited = &workers_exited;
                scope.spawn(move |_| {
                    let _exit = WorkerExit(exited);
                    job.run();
                });
            }

            watch_progress(height, threads, &rows_done, &workers_exited, settings.show_progress);
        });
    }

    Ok(framebuffer)
}

/// Render and write the image as P3 to `path`.
///
/// If the file cannot be created the computed image is discarded and
/// [`RenderError::Output`] is returned.
pub fn render_to_file(
    world: &dyn Hittable,
    settings: &RenderSettings,
    path: impl AsRef<Path>,
) -> RenderResult<RenderReport> {
    let path = path.as_ref();
    let total_start = Instant::now();
    let camera = &settings.camera;
    let threads = settings.thread_count();

    log::info!("========== Render Settings =========");
    log::info!("Output: {}", path.display());
    log::info!("Resolution: {} x {}", camera.image_width, camera.image_height());
    log::info!("Samples/Pixel: {}", camera.samples_per_pixel);
    log::info!("Threads: {}", threads);
    if settings.mode == RenderMode::Normals {
        log::info!("Mode: normals");
    }
    log::info!("====================================");

    let render_start = Instant::now();
    let framebuffer = render(world, settings)?;
    let render_time = render_start.elapsed();

    let file = File::create(path).map_err(|source| {
        log::error!("Failed to open output file: {}", path.display());
        RenderError::Output {
            path: path.to_path_buf(),
            source,
        }
    })?;

    log::info!("Writing file...");
    let write_start = Instant::now();
    let show_progress = settings.show_progress;
    framebuffer
        .write_ppm_with_progress(BufWriter::new(file), |written, total| {
            report_write_progress(written, total, show_progress)
        })
        .map_err(|source| RenderError::Output {
            path: path.to_path_buf(),
            source,
        })?;
    if show_progress {
        eprintln!();
    }
    let write_time = write_start.elapsed();
    let total_time = total_start.elapsed();

    log::info!("============= Timing ===============");
    log::info!("Render: {}", format_duration(render_time));
    log::info!("Write:  {}", format_duration(write_time));
    log::info!("Total:  {}", format_duration(total_time));
    log::info!("====================================");
    log::info!("Done. Wrote: {}", path.display());

    Ok(RenderReport {
        output: path.to_path_buf(),
        width: framebuffer.width(),
        height: framebuffer.height(),
        threads,
        samples_per_pixel: framebuffer.samples_per_pixel(),
        render_time,
        write_time,
        total_time,
    })
}

/// Shared, read-only state of one render handed to every worker.
struct RowJob<'a, 'rows> {
    camera: &'a Camera,
    world: &'a dyn Hittable,
    mode: RenderMode,
    seed: Option<u64>,
    rows: &'a [Mutex<&'rows mut [Color]>],
    next_row: &'a AtomicUsize,
    rows_done: &'a AtomicUsize,
}

impl RowJob<'_, '_> {
    fn run(&self) {
        let mut worker_rng = None;

        loop {
            let j = self.next_row.fetch_add(1, Ordering::Relaxed);
            if j >= self.rows.len() {
                break;
            }

            let mut row_rng = None;
            let rng = rng_for_row(self.seed, j, &mut row_rng, &mut worker_rng);

            let mut row = self.rows[j].lock().unwrap_or_else(PoisonError::into_inner);
            render_row(self.camera, self.world, j as u32, self.mode, rng, &mut **row);
            drop(row);

            self.rows_done.fetch_add(1, Ordering::Release);
        }
    }
}

/// Counts workers that have left their loop, including by panicking.
struct WorkerExit<'a>(&'a AtomicUsize);

impl Drop for WorkerExit<'_> {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::Release);
    }
}

/// Generator for row `j`: freshly seeded per row when `seed` is set,
/// otherwise the worker's own entropy-seeded generator, created on first use.
fn rng_for_row<'r>(
    seed: Option<u64>,
    j: usize,
    row_rng: &'r mut Option<StdRng>,
    worker_rng: &'r mut Option<StdRng>,
) -> &'r mut StdRng {
    match seed {
        Some(seed) => row_rng.insert(StdRng::seed_from_u64(row_seed(seed, j))),
        None => worker_rng.get_or_insert_with(StdRng::from_entropy),
    }
}

/// Seed of the generator used for row `j`, independent of which worker renders it.
fn row_seed(seed: u64, j: usize) -> u64 {
    seed ^ (j as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Poll the row counter until all rows are done or every worker has exited.
fn watch_progress(
    total_rows: usize,
    workers: usize,
    rows_done: &AtomicUsize,
    workers_exited: &AtomicUsize,
    show_progress: bool,
) {
    let start = Instant::now();
    let mut estimator = ProgressEstimator::new(total_rows);
    let mut last_report = start;

    while rows_done.load(Ordering::Acquire) < total_rows && workers_exited.load(Ordering::Acquire) < workers {
        let now = Instant::now();
        if now.duration_since(last_report) >= REPORT_INTERVAL {
            last_report = now;
            let snapshot = estimator.observe(rows_done.load(Ordering::Acquire), start.elapsed());
            report_render_progress(&snapshot, show_progress);
        }

        thread::sleep(POLL_INTERVAL);
    }

    let finished = ProgressSnapshot {
        rows_done: rows_done.load(Ordering::Acquire),
        total_rows,
        elapsed: start.elapsed(),
        eta: Some(Duration::ZERO),
    };
    if show_progress {
        eprintln!("\r{}   ", finished);
    } else {
        log::debug!("{}", finished);
    }
}

fn report_render_progress(snapshot: &ProgressSnapshot, show_progress: bool) {
    if show_progress {
        eprint!("\r{}   ", snapshot);
        let _ = io::stderr().flush();
    } else {
        log::debug!("{}", snapshot);
    }
}

fn report_write_progress(written: u32, total: u32, show_progress: bool) {
    let percent = 100.0 * written as f64 / total.max(1) as f64;
    if show_progress {
        eprint!("\rWrite:  {:.1}% ({}/{} rows)   ", percent, written, total);
        let _ = io::stderr().flush();
    } else {
        log::debug!("Write: {:.1}% ({}/{} rows)", percent, written, total);
    }
}
