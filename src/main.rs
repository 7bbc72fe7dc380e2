// Copyright @yucwang 2026

#![allow(dead_code)]

use dustrt::core::scatter::ScatterKernel;
use dustrt::emitters::point::PointEmitter;
use dustrt::grids::traversal::GridWalker;
use dustrt::io::exr_utils;
use dustrt::io::model_loader::load_model;
use dustrt::io::png_utils;
use dustrt::core::phase::PhaseFunction;
use dustrt::phase::henyey_greenstein::HenyeyGreenstein;
use dustrt::phase::isotropic::Isotropic;
use dustrt::runners::parallel::{ ParallelRunner, Runner };

use console::style;
use std::env;
use std::sync::Arc;

fn main() {
    env::set_var("RUST_LOG", "info");
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <model.xml> <output.exr> [--photons N] [--seed N] [--max-scatters N] [--bins WxH] [--png PATH]", args[0]);
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = &args[2];
    let mut photons_override: Option<u64> = None;
    let mut seed_override: Option<u64> = None;
    let mut max_scatters_override: Option<u32> = None;
    let mut bins: (usize, usize) = (64, 32);
    let mut png_path: Option<String> = None;

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--photons" => {
                i += 1;
                photons_override = args.get(i).and_then(|v| v.parse::<u64>().ok());
            }
            "--seed" => {
                i += 1;
                seed_override = args.get(i).and_then(|v| v.parse::<u64>().ok());
            }
            "--max-scatters" => {
                i += 1;
                max_scatters_override = args.get(i).and_then(|v| v.parse::<u32>().ok());
            }
            "--bins" => {
                i += 1;
                if let Some(value) = args.get(i) {
                    let parts: Vec<&str> = value.split('x').collect();
                    if parts.len() == 2 {
                        if let (Ok(w), Ok(h)) = (parts[0].parse::<usize>(), parts[1].parse::<usize>()) {
                            bins = (w, h);
                        }
                    }
                }
            }
            "--png" => {
                i += 1;
                png_path = args.get(i).cloned();
            }
            _ => {}
        }
        i += 1;
    }

    let load_result = load_model(input_path)
        .expect("failed to load model");

    let mut model = load_result.model;
    if let Some(max_scatters) = max_scatters_override {
        model.set_max_scatters(max_scatters);
    }
    let photon_count = photons_override.or(load_result.photons).unwrap_or(100_000);
    let seed = seed_override.or(load_result.seed).unwrap_or(0);

    let phase: Arc<dyn PhaseFunction> = if load_result.asymmetry == 0.0 {
        Arc::new(Isotropic)
    } else {
        Arc::new(HenyeyGreenstein::new(load_result.asymmetry))
    };

    let runner = ParallelRunner::new(
        Arc::new(PointEmitter::new(load_result.source)),
        phase,
        Arc::new(GridWalker::new()),
        ScatterKernel::default(),
        photon_count,
        seed,
    )
    .with_exit_map_size(bins.0, bins.1);

    let tally = runner.run(&model);

    exr_utils::write_exr_to_file(&tally.exit_map, output_path);
    if let Some(path) = png_path {
        if let Err(e) = png_utils::write_png_to_file(&tally.exit_map, &path) {
            log::error!("{}", e);
        }
    }

    let escaped_fraction = if tally.emitted > 0 {
        tally.escaped_weight / tally.emitted as f64
    } else {
        0.0
    };
    println!(
        "{} {} photons: {} escaped (weight fraction {:.4}), {} hit the scatter budget, {} anomalies, {:.2} scatters on average.",
        style("done.").green(),
        tally.emitted,
        tally.escaped,
        escaped_fraction,
        tally.terminated,
        tally.anomalies,
        tally.mean_scatters()
    );
}
