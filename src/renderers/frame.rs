// Copyright @yucwang 2026

use crate::core::rng::LcgRng;
use crate::core::sensor::Sensor;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector2f, Vector4f};
use crate::renderers::handle::RendererHandle;
use crate::renderers::renderer::{SampleId, ShadingState};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

// Keeps sub-pixel jitter independent of the shading streams for the same sample.
const PIXEL_JITTER_SALT: u64 = 0x5EED_F11A_B0A7_D00D;

/// Renders whole frames against one generation of a renderer handle.
pub struct FrameRenderer {
    block_size: usize,
    threads: usize,
    show_progress: bool,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameRenderer {
    pub fn new() -> Self {
        let threads = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self { block_size: 64, threads, show_progress: true }
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Takes one snapshot of `handle` and renders every pixel with it, so a
    /// commit during the pass only affects later frames.
    pub fn render(&self, handle: &RendererHandle, sensor: &dyn Sensor) -> Bitmap {
        let state = handle.snapshot();
        log::info!("Rendering {}x{} with {} (generation {}).",
                   sensor.width(), sensor.height(), handle.type_name(), handle.generation());
        let bitmap = self.render_state(state.as_ref(), sensor);
        log::info!("Frame finished.");
        bitmap
    }

    pub fn render_state(&self, state: &dyn ShadingState, sensor: &dyn Sensor) -> Bitmap {
        let (width, height) = (sensor.width(), sensor.height());
        if width == 0 || height == 0 {
            return Bitmap::new(0, 0);
        }
        let spp = state.samples_per_pixel().max(1);
        let inv_spp = 1.0 / spp as Float;
        let seed = state.random_seed() ^ PIXEL_JITTER_SALT;

        let block_size = self.block_size;
        let blocks_x = (width + block_size - 1) / block_size;
        let blocks_y = (height + block_size - 1) / block_size;
        let total_blocks = blocks_x * blocks_y;

        let progress = if self.show_progress {
            ProgressBar::new(total_blocks as u64)
        } else {
            ProgressBar::hidden()
        };
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} blocks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let next_block = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel::<(usize, usize, usize, usize, Vec<Vector4f>)>();
        let mut output = Bitmap::new(width, height);

        thread::scope(|scope| {
            for _ in 0..self.threads.min(total_blocks) {
                let next_block = Arc::clone(&next_block);
                let tx = tx.clone();
                scope.spawn(move || {
                    loop {
                        let block_index = next_block.fetch_add(1, Ordering::Relaxed);
                        if block_index >= total_blocks {
                            break;
                        }

                        let x0 = (block_index % blocks_x) * block_size;
                        let y0 = (block_index / blocks_x) * block_size;
                        let x1 = (x0 + block_size).min(width);
                        let y1 = (y0 + block_size).min(height);

                        let mut block = vec![Vector4f::zeros(); (x1 - x0) * (y1 - y0)];
                        for y in y0..y1 {
                            for x in x0..x1 {
                                let mut color = Vector4f::zeros();
                                for index in 0..spp {
                                    let sample = SampleId::new(x as u32, y as u32, index);
                                    let offset = if spp == 1 {
                                        Vector2f::new(0.5, 0.5)
                                    } else {
                                        LcgRng::for_sample(seed, sample.pixel, index).next_2d()
                                    };
                                    let u = Vector2f::new(
                                        (x as Float + offset.x) / width as Float,
                                        (y as Float + offset.y) / height as Float,
                                    );
                                    color += state.shade(&sensor.sample_ray(&u), sample);
                                }
                                block[(x - x0) + (x1 - x0) * (y - y0)] = color * inv_spp;
                            }
                        }
                        if tx.send((x0, y0, x1, y1, block)).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for _ in 0..total_blocks {
                if let Ok((x0, y0, x1, y1, block)) = rx.recv() {
                    for y in y0..y1 {
                        for x in x0..x1 {
                            output[(x, y)] = block[(x - x0) + (x1 - x0) * (y - y0)];
                        }
                    }
                    progress.inc(1);
                }
            }
        });
        progress.finish_and_clear();
        output
    }
}
