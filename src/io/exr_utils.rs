// Copyright @yucwang 2026

use crate::core::tally::ExitMap;

use exr::prelude::*;

// Write the escaped-weight map as a grayscale RGB EXR image.
pub fn write_exr_to_file(map: &ExitMap, file_path: &str) {
    log::info!("Starting writing openexr image: {}.", file_path);

    let width = map.width();
    let height = map.height();
    let write_result = write_rgb_file(file_path, width, height, |x, y| {
        let value = map[(x, y)] as f32;
        (value, value, value)
    });
    match write_result {
        Ok(()) => println!("EXR written to: {}.", file_path),
        Err(e) => println!("EXR written error: {}.", e.to_string())
    }
}
