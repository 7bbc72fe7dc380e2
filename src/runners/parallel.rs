// Copyright @yucwang 2026

use crate::core::emitter::PhotonEmitter;
use crate::core::model::DustModel;
use crate::core::phase::PhaseFunction;
use crate::core::rng::LcgRng;
use crate::core::scatter::{ ScatterKernel, ScatterOutcome };
use crate::core::tally::RunTally;
use crate::core::trajectory::TrajectoryIntegrator;
use indicatif::{ ProgressBar, ProgressStyle };
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::{ mpsc, Arc };
use std::thread;

pub use super::runner::Runner;

const PHOTONS_PER_CHUNK: u64 = 4096;

/// Drives full photon lifetimes across worker threads. Photons are
/// independent, so the workers just pull chunks of photon ids off a
/// shared counter; each photon gets its own deterministically seeded
/// generator, so a run with the same seed reproduces the same histories
/// whatever the thread count.
pub struct ParallelRunner {
    emitter: Arc<dyn PhotonEmitter>,
    phase: Arc<dyn PhaseFunction>,
    integrator: Arc<dyn TrajectoryIntegrator>,
    kernel: ScatterKernel,
    photon_count: u64,
    seed: u64,
    map_width: usize,
    map_height: usize,
}

impl ParallelRunner {
    pub fn new(emitter: Arc<dyn PhotonEmitter>,
               phase: Arc<dyn PhaseFunction>,
               integrator: Arc<dyn TrajectoryIntegrator>,
               kernel: ScatterKernel,
               photon_count: u64,
               seed: u64) -> Self {
        Self {
            emitter,
            phase,
            integrator,
            kernel,
            photon_count,
            seed,
            map_width: 64,
            map_height: 32,
        }
    }

    pub fn with_exit_map_size(mut self, width: usize, height: usize) -> Self {
        self.map_width = width;
        self.map_height = height;
        self
    }

    fn trace_photon(&self, id: u64, model: &DustModel, tally: &mut RunTally) {
        let mut rng = LcgRng::for_photon(self.seed, id);
        let mut photon = self.emitter.emit(id, &mut rng);
        tally.emitted += 1;

        loop {
            match self.kernel.next_scatter(
                &mut photon,
                model,
                self.integrator.as_ref(),
                &mut rng,
                None,
            ) {
                Ok(ScatterOutcome::Scattered) => {
                    photon.num_scatters += 1;
                    photon.direction = self.phase.sample(&photon.direction, &mut rng);
                }
                Ok(outcome) => {
                    tally.record_exit(&photon, outcome);
                    return;
                }
                Err(err) => {
                    log::error!("photon {} abandoned: {:?}", id, err);
                    tally.anomalies += 1;
                    return;
                }
            }
        }
    }
}

impl Runner for ParallelRunner {
    fn run(&self, model: &DustModel) -> RunTally {
        let total_chunks = ((self.photon_count + PHOTONS_PER_CHUNK - 1) / PHOTONS_PER_CHUNK) as usize;
        let mut merged = RunTally::new(self.map_width, self.map_height);
        if total_chunks == 0 {
            return merged;
        }

        log::info!("transporting {} photons with seed {}.", self.photon_count, self.seed);

        let progress = ProgressBar::new(total_chunks as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} chunks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let next_chunk = Arc::new(AtomicUsize::new(0));
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let (tx, rx) = mpsc::channel::<RunTally>();

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_chunk = Arc::clone(&next_chunk);
                let tx = tx.clone();
                scope.spawn(move || {
                    loop {
                        let chunk_index = next_chunk.fetch_add(1, Ordering::Relaxed);
                        if chunk_index >= total_chunks {
                            break;
                        }

                        let first = chunk_index as u64 * PHOTONS_PER_CHUNK;
                        let last = (first + PHOTONS_PER_CHUNK).min(self.photon_count);
                        let mut tally = RunTally::new(self.map_width, self.map_height);
                        for id in first..last {
                            self.trace_photon(id, model, &mut tally);
                        }
                        if tx.send(tally).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for _ in 0..total_chunks {
                if let Ok(tally) = rx.recv() {
                    merged.merge(&tally);
                    progress.inc(1);
                }
            }
        });
        progress.finish_and_clear();

        log::info!(
            "run finished: {} escaped, {} terminated, {} anomalies.",
            merged.escaped, merged.terminated, merged.anomalies
        );
        merged
    }
}
