// Copyright @yucwang 2026

use crate::core::tally::ExitMap;
use crate::math::constants::Float;

// Tone mapped quick-look of the escaped-weight map.
pub fn write_png_to_file(map: &ExitMap, file_path: &str) -> Result<(), String> {
    let width = map.width();
    let height = map.height();
    if width == 0 || height == 0 {
        return Err("exit map is empty".to_string());
    }

    let peak = map.max_value();
    let scale = if peak > 0.0 { 1.0 / peak } else { 0.0 };

    let img = image::RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let value: Float = map[(x as usize, y as usize)] * scale;
        let level = (value.powf(1.0 / 2.2) * 255.0).round().clamp(0.0, 255.0) as u8;
        image::Rgb([level, level, level])
    });

    log::info!("Starting writing png image: {}.", file_path);
    img.save(file_path)
        .map_err(|e| format!("failed to write {}: {}", file_path, e))
}
